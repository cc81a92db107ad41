//! # Successive approximation ADC
//!
//! Digitizes the selected input signal (an ECG trace by default) and checks
//! whether the main heartbeat peak is visible in the captured samples.
//! Display events are written to stdout as JSON lines.
//!
//! Settings overrides are given as `path=value` arguments, see
//! [converter_lab::settings::AdcSettings].
use converter_lab::{
    assessment::{self, Assessment},
    pacing::{Pacer, ThreadPacing},
    settings::{self, AdcSettings},
    sink::{JsonLines, LogSink, Sample, Tee},
    Error,
};

fn main() -> Result<(), Error> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = AdcSettings::default();
    settings::apply(&mut settings, args.iter().map(String::as_str))?;
    log::info!("{settings:?}");

    let (mut adc, signal, duration) = settings.build()?;
    let mut pacer = Pacer::new(ThreadPacing, settings.pace_ms);
    let mut sink = Tee(JsonLines::new(std::io::stdout().lock()), LogSink);
    let conversions = adc.run(&signal, &mut sink, &mut pacer, duration)?;
    sink.0.finish().map(drop)?;

    match assessment::assess(conversions.into_iter().map(Sample::from)) {
        Assessment::Pass(sample) => log::info!(
            "Peak captured: {} V at {} s",
            sample.voltage,
            sample.time
        ),
        Assessment::Fail => {
            log::warn!("The peak at approximately 0.25 s was not captured");
            for hint in assessment::HINTS {
                log::warn!("Hint: {hint}");
            }
            log::warn!("Solution: {}", assessment::SOLUTION);
        }
    }
    Ok(())
}
