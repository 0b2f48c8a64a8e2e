//! Repeating scheduler
//!
//! Calls the most recently supplied callback once per period on a tokio
//! task. The period is `Option<Duration>`: `None` disables the scheduler
//! until a period is set again. Swapping the callback never re-arms the
//! timer, changing the period always does. Dropping the scheduler aborts its
//! task.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

type Callback = Box<dyn FnMut() + Send + 'static>;

pub struct Scheduler {
    callback: Arc<Mutex<Callback>>,
    period_tx: watch::Sender<Option<Duration>>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn a scheduler on the current tokio runtime
    pub fn spawn<F>(callback: F, period: Option<Duration>) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let callback: Arc<Mutex<Callback>> = Arc::new(Mutex::new(Box::new(callback)));
        let (period_tx, period_rx) = watch::channel(period);
        let handle = tokio::spawn(run(Arc::clone(&callback), period_rx));

        Self { callback, period_tx, handle }
    }

    /// Replace the callback used by the next tick
    pub fn set_callback<F>(&self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        match self.callback.lock() {
            Ok(mut slot) => *slot = Box::new(callback),
            Err(poisoned) => {
                error!("Scheduler callback slot was poisoned, replacing callback");
                *poisoned.into_inner() = Box::new(callback);
                self.callback.clear_poison();
            }
        }
    }

    /// Change the period; a no-op when it is unchanged
    pub fn set_period(&self, period: Option<Duration>) {
        self.period_tx.send_if_modified(|current| {
            if *current == period {
                false
            } else {
                debug!("Scheduler period changed: {:?} -> {:?}", current, period);
                *current = period;
                true
            }
        });
    }

    pub fn period(&self) -> Option<Duration> {
        *self.period_tx.borrow()
    }

    pub fn is_enabled(&self) -> bool {
        self.period().is_some()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(callback: Arc<Mutex<Callback>>, mut period_rx: watch::Receiver<Option<Duration>>) {
    loop {
        let period = *period_rx.borrow_and_update();

        match period {
            None => {
                // Disabled, wait to be re-enabled
                if period_rx.changed().await.is_err() {
                    return;
                }
            }
            Some(period) => {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = interval.tick() => invoke(&callback),
                        changed = period_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        }
    }
}

fn invoke(callback: &Mutex<Callback>) {
    match callback.lock() {
        Ok(mut callback) => (*callback)(),
        Err(_) => error!("Scheduler callback slot is poisoned, skipping tick"),
    }
}
