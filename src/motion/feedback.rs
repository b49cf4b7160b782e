//! Two-state confirmation flag that reverts on its own.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use super::{Scheduler, TimerId};

#[derive(Default)]
struct FlagState {
    value: bool,
    pending: Option<TimerId>,
    // bumped on every trigger so a stale revert can tell it was superseded
    generation: u64,
}

struct Flag {
    state: Mutex<FlagState>,
    scheduler: Arc<dyn Scheduler>,
    on_change: Box<dyn Fn(bool) + Send + Sync>,
}

impl Flag {
    fn revert(&self, generation: u64) {
        let changed = {
            let mut state = self.state.lock().expect("should be able to lock flag");
            if state.generation != generation {
                return;
            }
            state.pending = None;
            std::mem::replace(&mut state.value, false)
        };
        if changed {
            (self.on_change)(false);
        }
    }

    fn cancel(&self) {
        let pending = {
            let mut state = self.state.lock().expect("should be able to lock flag");
            state.generation += 1;
            state.pending.take()
        };
        if let Some(id) = pending {
            self.scheduler.clear(id);
        }
    }
}

impl Drop for Flag {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Idle/confirmed flag for copy buttons.
///
/// Re-triggering while confirmed restarts the revert delay instead of
/// queueing another revert.
#[derive(Clone)]
pub struct TransientFlag {
    inner: Arc<Flag>,
}

impl TransientFlag {
    /// `on_change` sees every transition, on the caller's stack for the
    /// rise and on the scheduler's for the fall.
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        on_change: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Flag {
                state: Mutex::new(FlagState::default()),
                scheduler,
                on_change: Box::new(on_change),
            }),
        }
    }

    pub fn is_set(&self) -> bool {
        self.inner
            .state
            .lock()
            .expect("should be able to lock flag")
            .value
    }

    pub fn trigger(&self, revert_after: Duration) {
        let (generation, superseded, rose) = {
            let mut state = self.inner.state.lock().expect("should be able to lock flag");
            state.generation += 1;
            let rose = !std::mem::replace(&mut state.value, true);
            (state.generation, state.pending.take(), rose)
        };
        if let Some(id) = superseded {
            self.inner.scheduler.clear(id);
        }
        if rose {
            (self.inner.on_change)(true);
        }

        let weak: Weak<Flag> = Arc::downgrade(&self.inner);
        let scheduled = self.inner.scheduler.set_timeout(
            revert_after,
            Box::new(move || {
                if let Some(flag) = weak.upgrade() {
                    flag.revert(generation);
                }
            }),
        );
        match scheduled {
            Ok(id) => {
                let mut state = self.inner.state.lock().expect("should be able to lock flag");
                if state.generation == generation {
                    state.pending = Some(id);
                }
            }
            // the confirmation just stays up; nothing to surface
            Err(e) => log::warn!("feedback revert not scheduled: {e}"),
        }
    }

    /// Drops a pending revert. Used on the owner's teardown path.
    pub fn dispose(&self) {
        self.inner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ManualScheduler;

    fn flag(sched: &ManualScheduler) -> (TransientFlag, Arc<Mutex<Vec<(Duration, bool)>>>) {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let c = changes.clone();
        let s = sched.clone();
        let flag = TransientFlag::new(Arc::new(sched.clone()), move |v| {
            c.lock().unwrap().push((s.now(), v))
        });
        (flag, changes)
    }

    #[test]
    fn test_trigger_sets_then_reverts() {
        let sched = ManualScheduler::new();
        let (email, changes) = flag(&sched);
        email.trigger(Duration::from_millis(2000));
        assert!(email.is_set());
        sched.advance(Duration::from_millis(1999));
        assert!(email.is_set());
        sched.advance(Duration::from_millis(1));
        assert!(!email.is_set());
        assert_eq!(
            *changes.lock().unwrap(),
            vec![
                (Duration::ZERO, true),
                (Duration::from_millis(2000), false)
            ]
        );
        assert_eq!(sched.outstanding(), 0);
    }

    #[test]
    fn test_retrigger_debounces_revert() {
        let sched = ManualScheduler::new();
        let (email, changes) = flag(&sched);
        email.trigger(Duration::from_millis(2000));
        sched.advance(Duration::from_millis(1500));
        email.trigger(Duration::from_millis(2000));
        assert_eq!(sched.outstanding(), 1);

        sched.advance(Duration::from_millis(1000));
        assert!(email.is_set());
        sched.advance(Duration::from_millis(1000));
        assert!(!email.is_set());

        let changes = changes.lock().unwrap();
        let reverts = changes.iter().filter(|(_, v)| !*v).collect::<Vec<_>>();
        assert_eq!(reverts, vec![&(Duration::from_millis(3500), false)]);
        assert_eq!(changes.iter().filter(|(_, v)| *v).count(), 1);
    }

    #[test]
    fn test_dispose_cancels_pending_revert() {
        let sched = ManualScheduler::new();
        let (phone, changes) = flag(&sched);
        phone.trigger(Duration::from_millis(2000));
        phone.dispose();
        phone.dispose();
        assert_eq!(sched.outstanding(), 0);
        sched.advance(Duration::from_secs(5));
        assert_eq!(changes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_flags_are_independent() {
        let sched = ManualScheduler::new();
        let (email, _) = flag(&sched);
        let (phone, _) = flag(&sched);
        email.trigger(Duration::from_millis(2000));
        sched.advance(Duration::from_millis(1000));
        phone.trigger(Duration::from_millis(2000));
        sched.advance(Duration::from_millis(1000));
        assert!(!email.is_set());
        assert!(phone.is_set());
    }
}
