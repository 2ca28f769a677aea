//! Cancellable timers feeding the actor
//!
//! Each timer slot carries a generation. Arming or cancelling bumps it, and
//! a fire is only delivered if its generation still matches, so a fire that
//! raced with a cancel is dropped.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    Gravity,
    LockDelay,
    LineClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerFire {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Slot {
    /// Abort the running task and invalidate fires already in flight
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_live(&self, generation: u64) -> bool {
        self.task.is_some() && self.generation == generation
    }
}

pub(crate) struct Timers {
    fires: mpsc::UnboundedSender<TimerFire>,
    gravity_interval: watch::Sender<Duration>,
    gravity: Slot,
    lock_delay: Slot,
    line_clear: Slot,
}

impl Timers {
    pub fn new(gravity_interval: Duration) -> (Self, mpsc::UnboundedReceiver<TimerFire>) {
        let (fires, rx) = mpsc::unbounded_channel();
        let (gravity_interval, _) = watch::channel(gravity_interval);
        let timers = Self {
            fires,
            gravity_interval,
            gravity: Slot::default(),
            lock_delay: Slot::default(),
            line_clear: Slot::default(),
        };
        (timers, rx)
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Slot {
        match kind {
            TimerKind::Gravity => &mut self.gravity,
            TimerKind::LockDelay => &mut self.lock_delay,
            TimerKind::LineClear => &mut self.line_clear,
        }
    }

    /// (Re)start a one-shot timer
    pub fn arm(&mut self, kind: TimerKind, delay: Duration) {
        let fires = self.fires.clone();
        let slot = self.slot(kind);
        slot.cancel();
        let generation = slot.generation;
        slot.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fires.send(TimerFire { kind, generation });
        }));
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.slot(kind).cancel();
    }

    /// Update the gravity interval; the ticker picks it up on its next cycle
    pub fn set_gravity_interval(&self, interval: Duration) {
        self.gravity_interval.send_if_modified(|current| {
            if *current == interval {
                return false;
            }
            *current = interval;
            true
        });
    }

    /// (Re)start the gravity ticker from a full interval
    pub fn start_gravity(&mut self, interval: Duration) {
        self.set_gravity_interval(interval);
        let fires = self.fires.clone();
        let interval_rx = self.gravity_interval.subscribe();
        let slot = &mut self.gravity;
        slot.cancel();
        let generation = slot.generation;
        slot.task = Some(tokio::spawn(async move {
            loop {
                let period = *interval_rx.borrow();
                tokio::time::sleep(period).await;
                let fire = TimerFire {
                    kind: TimerKind::Gravity,
                    generation,
                };
                if fires.send(fire).is_err() {
                    break;
                }
            }
        }));
    }

    /// Whether a fire is still current. One-shot slots are spent by it.
    pub fn accept(&mut self, fire: TimerFire) -> bool {
        let slot = self.slot(fire.kind);
        if !slot.is_live(fire.generation) {
            return false;
        }
        if fire.kind != TimerKind::Gravity {
            slot.task = None;
        }
        true
    }

    pub fn cancel_all(&mut self) {
        self.gravity.cancel();
        self.lock_delay.cancel();
        self.line_clear.cancel();
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(elapsed: Duration, ms: u64) {
        let expected = Duration::from_millis(ms);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(5),
            "elapsed {:?}, expected about {:?}",
            elapsed,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_once() {
        let (mut timers, mut rx) = Timers::new(Duration::from_millis(500));
        timers.arm(TimerKind::LockDelay, Duration::from_millis(100));
        let fire = rx.recv().await.unwrap();
        assert_eq!(fire.kind, TimerKind::LockDelay);
        assert!(timers.accept(fire));
        assert!(!timers.accept(fire));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_invalidates_old_fire() {
        let (mut timers, mut rx) = Timers::new(Duration::from_millis(500));
        timers.arm(TimerKind::LineClear, Duration::from_millis(10));
        let stale = rx.recv().await.unwrap();
        timers.arm(TimerKind::LineClear, Duration::from_millis(10));
        assert!(!timers.accept(stale));
        let fresh = rx.recv().await.unwrap();
        assert!(timers.accept(fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gravity_follows_interval_updates() {
        let (mut timers, mut rx) = Timers::new(Duration::from_millis(500));
        let start = tokio::time::Instant::now();
        timers.start_gravity(Duration::from_millis(500));

        let fire = rx.recv().await.unwrap();
        assert!(timers.accept(fire));
        assert_near(start.elapsed(), 500);

        // The cycle already under way keeps its period.
        timers.set_gravity_interval(Duration::from_millis(100));
        let fire = rx.recv().await.unwrap();
        assert!(timers.accept(fire));
        assert_near(start.elapsed(), 1000);

        let fire = rx.recv().await.unwrap();
        assert!(timers.accept(fire));
        assert_near(start.elapsed(), 1100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_gravity_is_rejected() {
        let (mut timers, mut rx) = Timers::new(Duration::from_millis(50));
        timers.start_gravity(Duration::from_millis(50));
        let fire = rx.recv().await.unwrap();
        timers.cancel(TimerKind::Gravity);
        assert!(!timers.accept(fire));
    }
}
