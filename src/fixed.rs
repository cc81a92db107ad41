//! Fixed-point word demonstration
use embedded_hal::delay::DelayNs;
use fixed_point::FixedPointDecoder;

use super::{
    pacing::Pacer,
    sink::{Event, Labels, SampleSink},
    Error,
};

/// Bit manipulation of a fixed-point word, reporting its interpretations.
#[derive(Clone, Debug)]
pub struct FixedPointSession {
    word: FixedPointDecoder,
}

impl FixedPointSession {
    pub fn new(word: FixedPointDecoder) -> Self {
        Self { word }
    }

    pub fn word(&self) -> &FixedPointDecoder {
        &self.word
    }

    pub fn labels(&self) -> Labels {
        let scale = self.word.scaling_factor();
        Labels {
            integer: self.word.raw(),
            fixed_point: self.word.decoded_value(),
            nominator: scale.nominator(),
            denominator: scale.denominator(),
        }
    }

    pub fn announce<K: SampleSink + ?Sized>(&self, sink: &mut K) {
        log::info!(
            "{} bit word scaled by {}",
            self.word.number_of_bits(),
            self.word.scaling_factor()
        );
        sink.send(Event::SetNumberOfBits(self.word.number_of_bits()));
        sink.send(Event::UpdateLabels(self.labels()));
    }

    fn update<K, D>(&self, event: Event, sink: &mut K, pacer: &mut Pacer<D>)
    where
        K: SampleSink + ?Sized,
        D: DelayNs,
    {
        let labels = self.labels();
        log::debug!("{event:?}: {} = {}", labels.integer, labels.fixed_point);
        sink.send(event);
        sink.send(Event::UpdateLabels(labels));
        pacer.wait();
    }

    pub fn set_bit<K, D>(
        &mut self,
        index: u32,
        sink: &mut K,
        pacer: &mut Pacer<D>,
    ) -> Result<(), Error>
    where
        K: SampleSink + ?Sized,
        D: DelayNs,
    {
        self.word.set_bit(index)?;
        self.update(Event::SetBit(index), sink, pacer);
        Ok(())
    }

    pub fn clear_bit<K, D>(
        &mut self,
        index: u32,
        sink: &mut K,
        pacer: &mut Pacer<D>,
    ) -> Result<(), Error>
    where
        K: SampleSink + ?Sized,
        D: DelayNs,
    {
        self.word.clear_bit(index)?;
        self.update(Event::ClearBit(index), sink, pacer);
        Ok(())
    }
}
