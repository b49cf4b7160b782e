//! Loading counter shown before the page mounts.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use crate::motion::{Ease, Scheduler, TimerId};

#[derive(Debug, Clone, PartialEq)]
pub struct PreloadSpec {
    /// Time for the counter to go from 0 to 100.
    pub duration: Duration,
    pub step: Duration,
    /// Pause at 100 before completion, long enough for the exit fade.
    pub hold: Duration,
    pub ease: Ease,
}

impl Default for PreloadSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2000),
            step: Duration::from_millis(20),
            hold: Duration::from_millis(500),
            ease: Ease::Power2InOut,
        }
    }
}

type Complete = Box<dyn FnOnce() + Send>;

struct Progress {
    spec: PreloadSpec,
    started: Duration,
    percent: u8,
    ticker: Option<TimerId>,
    hold: Option<TimerId>,
    on_complete: Option<Complete>,
}

struct Loader {
    state: Mutex<Progress>,
    scheduler: Arc<dyn Scheduler>,
    on_progress: Box<dyn Fn(u8) + Send + Sync>,
}

impl Loader {
    fn step(self: &Arc<Self>) {
        let (percent, done) = {
            let mut state = self.state.lock().expect("should be able to lock preloader");
            let elapsed = self.scheduler.now().saturating_sub(state.started);
            let t = elapsed.as_secs_f64() / state.spec.duration.as_secs_f64().max(f64::EPSILON);
            let percent = (state.spec.ease.apply(t) * 100.0).round() as u8;
            let percent = percent.max(state.percent).min(100);
            state.percent = percent;
            let done = if percent == 100 { state.ticker.take() } else { None };
            (percent, done)
        };
        (self.on_progress)(percent);
        if let Some(ticker) = done {
            self.scheduler.clear(ticker);
            self.schedule_completion();
        }
    }

    fn schedule_completion(self: &Arc<Self>) {
        let hold = self
            .state
            .lock()
            .expect("should be able to lock preloader")
            .spec
            .hold;
        let weak: Weak<Loader> = Arc::downgrade(self);
        let scheduled = self.scheduler.set_timeout(
            hold,
            Box::new(move || {
                if let Some(loader) = weak.upgrade() {
                    loader.complete();
                }
            }),
        );
        match scheduled {
            Ok(id) => {
                self.state
                    .lock()
                    .expect("should be able to lock preloader")
                    .hold = Some(id)
            }
            Err(e) => {
                log::warn!("preloader hold skipped: {e}");
                self.complete();
            }
        }
    }

    fn complete(&self) {
        let on_complete = {
            let mut state = self.state.lock().expect("should be able to lock preloader");
            state.hold = None;
            state.on_complete.take()
        };
        if let Some(f) = on_complete {
            log::debug!("preloader complete");
            f();
        }
    }

    fn cancel(&self) {
        let timers = {
            let mut state = self.state.lock().expect("should be able to lock preloader");
            state.on_complete = None;
            [state.ticker.take(), state.hold.take()]
        };
        for id in timers.into_iter().flatten() {
            self.scheduler.clear(id);
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Handle to a running loading counter.
#[derive(Clone)]
pub struct LoadProgress {
    inner: Arc<Loader>,
}

impl LoadProgress {
    /// Starts counting. `on_complete` runs exactly once, after the counter
    /// reaches 100 and the hold elapses, unless cancelled first.
    pub fn start(
        scheduler: Arc<dyn Scheduler>,
        spec: PreloadSpec,
        on_progress: impl Fn(u8) + Send + Sync + 'static,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> Self {
        let step = spec.step;
        let loader = Arc::new(Loader {
            state: Mutex::new(Progress {
                spec,
                started: scheduler.now(),
                percent: 0,
                ticker: None,
                hold: None,
                on_complete: Some(Box::new(on_complete)),
            }),
            scheduler: scheduler.clone(),
            on_progress: Box::new(on_progress),
        });
        let weak = Arc::downgrade(&loader);
        match scheduler.set_interval(
            step,
            Box::new(move || {
                if let Some(loader) = weak.upgrade() {
                    loader.step();
                }
            }),
        ) {
            Ok(id) => {
                loader
                    .state
                    .lock()
                    .expect("should be able to lock preloader")
                    .ticker = Some(id)
            }
            Err(e) => {
                // never keep the page behind the loader
                log::warn!("preloader counter skipped: {e}");
                loader.complete();
            }
        }
        Self { inner: loader }
    }

    pub fn percent(&self) -> u8 {
        self.inner
            .state
            .lock()
            .expect("should be able to lock preloader")
            .percent
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ManualScheduler;

    fn start(
        sched: &ManualScheduler,
    ) -> (LoadProgress, Arc<Mutex<Vec<u8>>>, Arc<Mutex<usize>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Mutex::new(0));
        let (s, d) = (seen.clone(), done.clone());
        let progress = LoadProgress::start(
            Arc::new(sched.clone()),
            PreloadSpec::default(),
            move |p| s.lock().unwrap().push(p),
            move || *d.lock().unwrap() += 1,
        );
        (progress, seen, done)
    }

    #[test]
    fn test_counts_to_100_then_completes_once() {
        let sched = ManualScheduler::new();
        let (progress, seen, done) = start(&sched);

        sched.advance(Duration::from_millis(2000));
        assert_eq!(progress.percent(), 100);
        assert_eq!(*done.lock().unwrap(), 0);
        let seen = seen.lock().unwrap().clone();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100));

        sched.advance(Duration::from_millis(500));
        assert_eq!(*done.lock().unwrap(), 1);
        sched.advance(Duration::from_secs(10));
        assert_eq!(*done.lock().unwrap(), 1);
        assert_eq!(sched.outstanding(), 0);
    }

    #[test]
    fn test_cancel_prevents_completion() {
        let sched = ManualScheduler::new();
        let (progress, _, done) = start(&sched);
        sched.advance(Duration::from_millis(700));
        progress.cancel();
        assert_eq!(sched.outstanding(), 0);
        sched.advance(Duration::from_secs(5));
        assert_eq!(*done.lock().unwrap(), 0);
    }
}
