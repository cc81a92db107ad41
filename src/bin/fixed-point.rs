//! # Fixed-point arithmetic
//!
//! Sets and clears bits of a word and reports its value both as an unsigned
//! integer and as a fixed-point number. Display events are written to stdout
//! as JSON lines.
//!
//! Settings overrides are given as `path=value` arguments, see
//! [converter_lab::settings::FixedPointSettings].
use converter_lab::{
    pacing::{Pacer, ThreadPacing},
    settings::{self, FixedPointSettings},
    sink::{JsonLines, LogSink, Tee},
    Error,
};

fn main() -> Result<(), Error> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = FixedPointSettings::default();
    settings::apply(&mut settings, args.iter().map(String::as_str))?;
    log::info!("{settings:?}");

    let mut session = settings.build()?;
    let mut pacer = Pacer::new(ThreadPacing, settings.pace_ms);
    let mut sink = Tee(JsonLines::new(std::io::stdout().lock()), LogSink);
    session.announce(&mut sink);
    for &index in settings.set_bits.iter() {
        session.set_bit(index, &mut sink, &mut pacer)?;
    }
    for &index in settings.clear_bits.iter() {
        session.clear_bit(index, &mut sink, &mut pacer)?;
    }
    sink.0.finish().map(drop)?;

    let labels = session.labels();
    log::info!(
        "{} x {}/{} = {}",
        labels.integer,
        labels.nominator,
        labels.denominator,
        labels.fixed_point
    );
    Ok(())
}
