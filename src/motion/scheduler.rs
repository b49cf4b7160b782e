use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use super::{defaults, MotionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

static NEXT_TIMER: AtomicU64 = AtomicU64::new(1);

impl TimerId {
    pub fn next() -> Self {
        TimerId(NEXT_TIMER.fetch_add(1, Ordering::Relaxed))
    }
}

pub type TimeoutFn = Box<dyn FnOnce() + Send>;
pub type IntervalFn = Box<dyn FnMut() + Send>;

/// Timer collaborator. Callbacks are always invoked without any scheduler
/// lock held, so they may schedule or clear timers themselves.
pub trait Scheduler: Send + Sync {
    fn set_timeout(&self, delay: Duration, f: TimeoutFn) -> Result<TimerId, MotionError>;

    /// Fires every `period`, measured from the moment of registration.
    fn set_interval(&self, period: Duration, f: IntervalFn) -> Result<TimerId, MotionError>;

    /// Runs `f` once per display frame until cleared with the returned id.
    /// Falls back to an interval of the registered frame period.
    fn request_frames(&self, f: IntervalFn) -> Result<TimerId, MotionError> {
        self.set_interval(defaults().frame_interval, f)
    }

    /// Cancels a timer. Unknown or already fired ids are ignored.
    fn clear(&self, id: TimerId);

    /// Monotonic time from a fixed origin. Never goes backwards.
    fn now(&self) -> Duration;
}

enum Job {
    Once(TimeoutFn),
    Repeat { period: Duration, f: IntervalFn },
}

struct Pending {
    id: TimerId,
    due: Duration,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    seq: u64,
    queue: Vec<Pending>,
    // interval currently executing, so that clear() from inside it sticks
    running: Option<(TimerId, bool)>,
}

/// Virtual-clock scheduler. Nothing fires until [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers that are registered and not yet fired or cleared.
    pub fn outstanding(&self) -> usize {
        let state = self.state.lock().expect("should be able to lock scheduler");
        let running = matches!(state.running, Some((_, false)));
        state.queue.len() + usize::from(running)
    }

    fn push(&self, id: TimerId, due: Duration, job: Job) {
        let mut state = self.state.lock().expect("should be able to lock scheduler");
        state.seq += 1;
        let seq = state.seq;
        state.queue.push(Pending { id, due, seq, job });
    }

    fn pop_due(&self, until: Duration) -> Option<Pending> {
        let mut state = self.state.lock().expect("should be able to lock scheduler");
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let pending = state.queue.swap_remove(index);
        state.now = pending.due;
        Some(pending)
    }

    /// Moves the clock forward, firing everything that falls due in order.
    pub fn advance(&self, by: Duration) {
        let until = self.now() + by;
        while let Some(Pending { id, due, job, .. }) = self.pop_due(until) {
            match job {
                Job::Once(f) => f(),
                Job::Repeat { period, mut f } => {
                    self.state
                        .lock()
                        .expect("should be able to lock scheduler")
                        .running = Some((id, false));
                    f();
                    let cleared = {
                        let mut state = self.state.lock().expect("should be able to lock scheduler");
                        let cleared = matches!(state.running, Some((_, true)));
                        state.running = None;
                        cleared
                    };
                    if !cleared {
                        self.push(id, due + period, Job::Repeat { period, f });
                    }
                }
            }
        }
        self.state
            .lock()
            .expect("should be able to lock scheduler")
            .now = until;
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay: Duration, f: TimeoutFn) -> Result<TimerId, MotionError> {
        let id = TimerId::next();
        let due = self.now() + delay;
        self.push(id, due, Job::Once(f));
        Ok(id)
    }

    fn set_interval(&self, period: Duration, f: IntervalFn) -> Result<TimerId, MotionError> {
        if period.is_zero() {
            return Err(MotionError::Scheduler("zero interval period".to_string()));
        }
        let id = TimerId::next();
        let due = self.now() + period;
        self.push(id, due, Job::Repeat { period, f });
        Ok(id)
    }

    fn clear(&self, id: TimerId) {
        let removed = {
            let mut state = self.state.lock().expect("should be able to lock scheduler");
            let (removed, kept): (Vec<_>, Vec<_>) =
                std::mem::take(&mut state.queue).into_iter().partition(|p| p.id == id);
            state.queue = kept;
            if let Some((running, cleared)) = state.running.as_mut() {
                if *running == id {
                    *cleared = true;
                }
            }
            removed
        };
        // callbacks may own handles whose drop clears more timers
        drop(removed);
    }

    fn now(&self) -> Duration {
        self.state
            .lock()
            .expect("should be able to lock scheduler")
            .now
    }
}
