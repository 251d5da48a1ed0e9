use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::workflow::Event;

/// Interval between countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A running one-second countdown feeding ticks into a session driver.
///
/// Each countdown carries a generation so the driver can drop ticks from a
/// countdown it has already replaced. Dropping the handle stops the task.
#[derive(Debug)]
pub(crate) struct Countdown {
    generation: u64,
    task: JoinHandle<()>,
}

impl Countdown {
    pub(crate) fn start(generation: u64, events: UnboundedSender<Event>) -> Self {
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if events.send(Event::Tick { generation }).is_err() {
                    break;
                }
            }
        });
        Self { generation, task }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
