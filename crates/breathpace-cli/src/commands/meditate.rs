use std::cell::RefCell;
use std::rc::Rc;

use breathpace_core::{
    catalog, AmbientCue, AmbientObserver, Config, CountdownEngine, CountdownState, Event,
    Observer, Session,
};
use clap::Args;
use tracing::info;

use crate::render;
use crate::ticker::{Pace, Ticker};

#[derive(Args, Debug)]
pub struct MeditateArgs {
    /// Session length in minutes
    #[arg(long, short, conflicts_with = "seconds")]
    pub minutes: Option<u32>,
    /// Session length in seconds
    #[arg(long, short)]
    pub seconds: Option<u32>,
    /// Ambient sound id (rain, ocean, forest, night); unmutes playback
    #[arg(long)]
    pub sound: Option<String>,
    /// Keep ambient sound muted
    #[arg(long)]
    pub mute: bool,
    /// Tick without waiting between seconds
    #[arg(long)]
    pub fast: bool,
    /// Print one JSON object per tick
    #[arg(long)]
    pub json: bool,
}

impl MeditateArgs {
    fn duration_secs(&self) -> Option<u32> {
        self.minutes
            .map(|m| m.saturating_mul(60))
            .or(self.seconds)
    }
}

/// Prints cue changes, skipping the silence reported before anything played.
struct CuePrinter {
    ambient: Rc<RefCell<AmbientObserver>>,
    playing: bool,
    json: bool,
}

impl CuePrinter {
    fn flush(&mut self) {
        for cue in self.ambient.borrow_mut().drain_changes() {
            let is_play = matches!(cue, AmbientCue::Play { .. });
            if !is_play && !self.playing {
                continue;
            }
            self.playing = is_play;
            if self.json {
                if let Ok(line) = serde_json::to_string(&cue) {
                    println!("{line}");
                }
            } else {
                println!("{}", render::cue_line(&cue));
            }
        }
    }
}

fn print_update(json: bool, snap: &CountdownState, events: &[Event]) {
    if json {
        match render::json_line(snap, events) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode snapshot"),
        }
        return;
    }
    println!("{}", render::meditation_line(snap));
    for line in events.iter().filter_map(render::event_line) {
        println!("{line}");
    }
}

pub async fn run(args: MeditateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = config.meditation_engine(args.duration_secs())?;

    if let Some(sound) = &args.sound {
        if catalog::ambient_sound(sound).is_none() {
            return Err(format!("unknown ambient sound: {sound}").into());
        }
    }

    let mut observer = AmbientObserver::new(config.ambient_mixer());
    observer.update(|mixer| {
        if let Some(sound) = &args.sound {
            mixer.select(Some(sound.clone()));
            mixer.set_muted(false);
        }
        if args.mute {
            mixer.set_muted(true);
        }
    });
    info!(
        total_seconds = engine.total_seconds(),
        sound = ?observer.mixer().selected(),
        muted = observer.mixer().is_muted(),
        "starting meditation session"
    );

    let ambient = Rc::new(RefCell::new(observer));
    let mut cues = CuePrinter {
        ambient: Rc::clone(&ambient),
        playing: false,
        json: args.json,
    };

    let json = args.json;
    let mut session: Session<CountdownEngine> = Session::new(engine);
    session.subscribe(move |snap: &CountdownState, events: &[Event]| {
        ambient.borrow_mut().on_snapshot(snap, events);
    });
    session.subscribe(move |snap: &CountdownState, events: &[Event]| {
        print_update(json, snap, events);
    });

    let mut ticker = Ticker::new(Pace::new(config.ticker.interval_ms, args.fast));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    session.start();
    cues.flush();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                session.pause();
                cues.flush();
                break;
            }
            _ = ticker.tick() => {
                session.tick();
                cues.flush();
                if session.engine().is_completed() {
                    break;
                }
            }
        }
    }
    info!(
        completed = session.engine().is_completed(),
        cue = ?cues.ambient.borrow().current(),
        "meditation session ended"
    );
    Ok(())
}
