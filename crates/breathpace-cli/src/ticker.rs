//! The tick source. One tick per configured interval; the engines never see
//! wall-clock time.

use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    RealTime(Duration),
    /// Tick as fast as the loop runs. Used for previews and tests.
    Fast,
}

impl Pace {
    pub fn new(interval_ms: u64, fast: bool) -> Self {
        if fast {
            Pace::Fast
        } else {
            Pace::RealTime(Duration::from_millis(interval_ms.max(1)))
        }
    }
}

pub struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(pace: Pace) -> Self {
        let interval = match pace {
            Pace::RealTime(period) => {
                // First tick one period from now, not immediately.
                let mut interval = time::interval_at(time::Instant::now() + period, period);
                // A stalled host must not burst ticks to catch up.
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Some(interval)
            }
            Pace::Fast => None,
        };
        Self { interval }
    }

    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
    }
}
