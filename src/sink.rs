//! Display event stream.
//!
//! Sessions describe everything a live display needs to know as a sequence of
//! [Event]s. Sinks only receive events, nothing is ever read back.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::Error;

/// Maximum length of a JSON encoded [Event].
const EVENT_JSON_SIZE: usize = 192;

/// A captured signal value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulated time in seconds.
    pub time: f64,
    /// Voltage in volts.
    pub voltage: f64,
}

/// Fixed-point word labels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    /// The word as an unsigned integer.
    pub integer: u64,
    /// The word as a fixed-point number.
    pub fixed_point: f64,
    pub nominator: i64,
    pub denominator: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Number of DAC input lines.
    SetDacResolution(u32),
    /// DAC full scale voltage.
    SetMaximumVoltage(f64),
    /// Number of bits of a fixed-point word.
    SetNumberOfBits(u32),
    SetBit(u32),
    ClearBit(u32),
    ClearAllBits,
    /// Intermediate DAC output during a conversion.
    ShowOutputVoltage(Sample),
    /// Append a sample to the captured signal.
    SaveSample(Sample),
    /// Discard all captured samples.
    ClearSamples,
    UpdateLabels(Labels),
}

/// Receiver of display events.
pub trait SampleSink {
    fn send(&mut self, event: Event);
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn send(&mut self, event: Event) {
        (**self).send(event)
    }
}

/// Forward events to two sinks.
#[derive(Clone, Debug, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: SampleSink, B: SampleSink> SampleSink for Tee<A, B> {
    fn send(&mut self, event: Event) {
        self.0.send(event);
        self.1.send(event);
    }
}

/// Log all events at trace level.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl SampleSink for LogSink {
    fn send(&mut self, event: Event) {
        log::trace!("{event:?}");
    }
}

/// Keeps the event history and the captured signal.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    events: Vec<Event>,
    samples: Vec<Sample>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Samples saved since the last [Event::ClearSamples].
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl SampleSink for Recorder {
    fn send(&mut self, event: Event) {
        match event {
            Event::SaveSample(sample) => self.samples.push(sample),
            Event::ClearSamples => self.samples.clear(),
            _ => {}
        }
        self.events.push(event);
    }
}

/// Writes one JSON object per event and line.
///
/// The first error is retained, later events are dropped.
#[derive(Debug)]
pub struct JsonLines<W> {
    writer: W,
    error: Option<Error>,
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn write(&mut self, event: &Event) -> Result<(), Error> {
        let line: heapless::String<EVENT_JSON_SIZE> =
            serde_json_core::to_string(event).or(Err(Error::Encode))?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Flush and return the writer, or the first error encountered.
    pub fn finish(mut self) -> Result<W, Error> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> SampleSink for JsonLines<W> {
    fn send(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write(&event) {
            log::warn!("Dropping events after {event:?}: {e}");
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder() {
        let mut rec = Recorder::new();
        let s = Sample {
            time: 0.5,
            voltage: 1.0,
        };
        rec.send(Event::SaveSample(s));
        rec.send(Event::SetBit(3));
        assert_eq!(rec.samples(), &[s]);
        rec.send(Event::ClearSamples);
        assert!(rec.samples().is_empty());
        assert_eq!(rec.events().len(), 3);
    }

    #[test]
    fn tee() {
        let mut a = Recorder::new();
        let mut b = Recorder::new();
        Tee(&mut a, Tee(&mut b, LogSink)).send(Event::ClearAllBits);
        assert_eq!(a.events(), &[Event::ClearAllBits]);
        assert_eq!(b.events(), &[Event::ClearAllBits]);
    }

    #[test]
    fn json_lines() {
        let mut sink = JsonLines::new(Vec::new());
        sink.send(Event::SetBit(4));
        sink.send(Event::ClearAllBits);
        sink.send(Event::SaveSample(Sample {
            time: 0.5,
            voltage: 2.5,
        }));
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], r#"{"SetBit":4}"#);
        assert_eq!(lines[1], r#""ClearAllBits""#);
        assert!(lines[2].starts_with(r#"{"SaveSample":{"time":"#));
        assert_eq!(lines.len(), 3);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn json_lines_error() {
        let mut sink = JsonLines::new(Broken);
        sink.send(Event::ClearSamples);
        sink.send(Event::ClearSamples);
        assert!(matches!(sink.finish(), Err(Error::Io(_))));
    }
}
