use anyhow::{anyhow, Result};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use log::debug;
use std::time::Duration;

/// Periodic callback scheduler.
pub trait Scheduler {
    type Handle;

    fn schedule_periodic(&mut self, interval: Duration) -> Result<Self::Handle>;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Fixed-interval ticker. Running exactly when it holds a scheduler handle.
#[derive(Debug)]
pub struct Animator<H> {
    interval: Duration,
    handle: Option<H>,
}

impl<H> Animator<H> {
    pub fn new(interval: Duration) -> Self {
        Self { interval, handle: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start<S>(&mut self, scheduler: &mut S) -> Result<()>
    where
        S: Scheduler<Handle = H>,
    {
        if self.handle.is_none() {
            self.handle = Some(scheduler.schedule_periodic(self.interval)?);
            debug!("animator started ({:?} ticks)", self.interval);
        }
        Ok(())
    }

    pub fn stop<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
            debug!("animator stopped");
        }
    }
}

/// Timer expiries collected during a calloop dispatch.
#[derive(Debug, Default)]
pub struct TickQueue {
    due: u32,
}

impl TickQueue {
    pub fn push(&mut self) {
        self.due += 1;
    }

    pub fn pending(&self) -> u32 {
        self.due
    }

    /// Takes every expiry collected so far.
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.due)
    }
}

/// [`Scheduler`] backed by calloop timers.
///
/// Timers only record expiries in the [`TickQueue`]; the owner of the event
/// loop drains it after `dispatch` and runs the ticks itself, so a tick may
/// cancel its own timer.
pub struct LoopScheduler {
    handle: LoopHandle<'static, TickQueue>,
}

impl LoopScheduler {
    pub fn new(handle: LoopHandle<'static, TickQueue>) -> Self {
        Self { handle }
    }
}

impl Scheduler for LoopScheduler {
    type Handle = RegistrationToken;

    fn schedule_periodic(&mut self, interval: Duration) -> Result<RegistrationToken> {
        self.handle
            .insert_source(Timer::from_duration(interval), move |_, _, ticks| {
                ticks.push();
                TimeoutAction::ToDuration(interval)
            })
            .map_err(|e| anyhow!("Failed to schedule timer: {}", e.error))
    }

    fn cancel(&mut self, handle: RegistrationToken) {
        self.handle.remove(handle);
    }
}
