//! # R-2R DAC sweep
//!
//! Sets one DAC bit after the other until the output reaches full scale, then
//! clears all bits and starts over. Display events are written to stdout as
//! JSON lines.
//!
//! Settings overrides are given as `path=value` arguments, see
//! [converter_lab::settings::DacSweepSettings].
use converter_lab::{
    pacing::{Pacer, ThreadPacing},
    settings::{self, DacSweepSettings},
    sink::{JsonLines, LogSink, Tee},
    Error,
};

fn main() -> Result<(), Error> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = DacSweepSettings::default();
    settings::apply(&mut settings, args.iter().map(String::as_str))?;
    log::info!("{settings:?}");

    let mut sweep = settings.build()?;
    let mut pacer = Pacer::new(ThreadPacing, settings.pace_ms);
    let mut sink = Tee(JsonLines::new(std::io::stdout().lock()), LogSink);
    sweep.run(&mut sink, &mut pacer, settings.duration)?;
    sink.0.finish().map(drop)?;
    Ok(())
}
