use breathpace_core::catalog::format_clock;
use breathpace_core::{Config, Event, PhaseCycleEngine, PhaseCycleState, Session};
use clap::Args;
use tracing::info;

use crate::render;
use crate::ticker::{Pace, Ticker};

#[derive(Args, Debug)]
pub struct BreatheArgs {
    /// Pattern id (see `patterns list`); defaults to `breathing.pattern`
    #[arg(long, short)]
    pub pattern: Option<String>,
    /// Number of cycles; defaults to `breathing.cycles`
    #[arg(long, short)]
    pub cycles: Option<u32>,
    /// Tick without waiting between seconds
    #[arg(long)]
    pub fast: bool,
    /// Print one JSON object per tick
    #[arg(long)]
    pub json: bool,
}

fn print_update(json: bool, snap: &PhaseCycleState, events: &[Event]) {
    if json {
        match render::json_line(snap, events) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode snapshot"),
        }
        return;
    }
    for line in events.iter().filter_map(render::event_line) {
        println!("{line}");
    }
    if snap.running {
        println!("{}", render::breathing_line(snap));
    }
}

pub async fn run(args: BreatheArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = config.breathing_engine(args.pattern.as_deref(), args.cycles)?;
    let session_secs = engine.remaining_session_secs();
    info!(
        pattern = %engine.pattern().id,
        cycles = engine.total_cycles(),
        session_secs,
        "starting breathing session"
    );

    if !args.json {
        let pattern = engine.pattern();
        println!(
            "{} ({}) x {} cycles, {} total",
            pattern.name,
            render::timings(pattern),
            engine.total_cycles(),
            format_clock(u32::try_from(session_secs).unwrap_or(u32::MAX))
        );
    }

    let json = args.json;
    let mut session: Session<PhaseCycleEngine> = Session::new(engine);
    session.subscribe(move |snap: &PhaseCycleState, events: &[Event]| {
        print_update(json, snap, events);
    });

    let mut ticker = Ticker::new(Pace::new(config.ticker.interval_ms, args.fast));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    session.start();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                session.pause();
                break;
            }
            _ = ticker.tick() => {
                if session.tick().finished() {
                    break;
                }
            }
        }
    }
    Ok(())
}
