use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{MotionError, Scheduler, TargetId, Timeline, TimerId, ToggleAction, VisualState};

/// Where sampled styles go.
pub trait StyleSink: Send + Sync {
    fn apply(&self, target: TargetId, state: VisualState);
}

impl<F> StyleSink for F
where
    F: Fn(TargetId, VisualState) + Send + Sync,
{
    fn apply(&self, target: TargetId, state: VisualState) {
        self(target, state)
    }
}

struct PlayerState {
    timeline: Timeline,
    frame: Option<TimerId>,
    last_frame: Duration,
}

/// Runs a [`Timeline`] on a frame interval while it is playing and pushes
/// each sample into a [`StyleSink`].
#[derive(Clone)]
pub struct Player {
    state: Arc<Mutex<PlayerState>>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn StyleSink>,
}

impl Player {
    pub fn new(scheduler: Arc<dyn Scheduler>, timeline: Timeline, sink: Arc<dyn StyleSink>) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlayerState {
                timeline,
                frame: None,
                last_frame: Duration::ZERO,
            })),
            scheduler,
            sink,
        }
    }

    pub fn with_timeline<R>(&self, f: impl FnOnce(&Timeline) -> R) -> R {
        f(&self.state.lock().expect("should be able to lock player").timeline)
    }

    /// Whether a frame timer is currently registered.
    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .expect("should be able to lock player")
            .frame
            .is_some()
    }

    /// Pushes the current sample to the sink.
    pub fn render(&self) {
        let samples = self.with_timeline(Timeline::sample);
        for (target, state) in samples {
            self.sink.apply(target, state);
        }
    }

    pub fn apply(&self, action: ToggleAction) -> Result<(), MotionError> {
        self.control(|timeline| timeline.apply(action))
    }

    /// Runs a control operation on the timeline, renders, and starts the
    /// frame timer if the timeline is now playing.
    pub fn control(&self, f: impl FnOnce(&mut Timeline)) -> Result<(), MotionError> {
        let start_frames = {
            let mut state = self.state.lock().expect("should be able to lock player");
            f(&mut state.timeline);
            let start = state.timeline.is_active() && state.frame.is_none();
            if start {
                state.last_frame = self.scheduler.now();
            }
            start
        };
        self.render();
        if start_frames {
            let player = self.clone();
            let id = self
                .scheduler
                .request_frames(Box::new(move || player.tick()))?;
            self.state
                .lock()
                .expect("should be able to lock player")
                .frame = Some(id);
        }
        Ok(())
    }

    fn tick(&self) {
        let (samples, finished) = {
            let mut state = self.state.lock().expect("should be able to lock player");
            if state.timeline.is_killed() {
                return;
            }
            let now = self.scheduler.now();
            let dt = now.saturating_sub(state.last_frame).as_secs_f64();
            state.last_frame = now;
            let active = state.timeline.advance(dt);
            let finished = if active { None } else { state.frame.take() };
            (state.timeline.sample(), finished)
        };
        if let Some(id) = finished {
            self.scheduler.clear(id);
        }
        for (target, state) in samples {
            self.sink.apply(target, state);
        }
    }

    /// Kills the timeline and drops the frame timer. Safe to call twice.
    pub fn stop(&self) {
        let frame = {
            let mut state = self.state.lock().expect("should be able to lock player");
            state.timeline.kill();
            state.frame.take()
        };
        if let Some(id) = frame {
            self.scheduler.clear(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{ManualScheduler, Position, TimelineBuilder, TweenSpec};

    fn pulse() -> Timeline {
        TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(VisualState::RESTING, VisualState::RESTING.with_scale(1.3))
                    .duration(0.2)
                    .yoyo(1),
                Position::Append,
            )
            .build()
    }

    #[test]
    fn test_frames_run_only_while_playing() {
        let sched = ManualScheduler::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        let player = Player::new(
            Arc::new(sched.clone()),
            pulse(),
            Arc::new(move |_: TargetId, v: VisualState| s.lock().unwrap().push(v.scale)),
        );
        assert!(!player.is_running());
        player.apply(ToggleAction::Play).unwrap();
        assert!(player.is_running());
        assert_eq!(sched.outstanding(), 1);

        sched.advance(Duration::from_millis(1000));
        assert!(!player.is_running());
        assert_eq!(sched.outstanding(), 0);

        let seen = seen.lock().unwrap();
        assert!(seen.iter().any(|s| *s > 1.2));
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn test_stop_clears_frame_timer() {
        let sched = ManualScheduler::new();
        let player = Player::new(Arc::new(sched.clone()), pulse(), Arc::new(|_: TargetId, _: VisualState| {}));
        player.apply(ToggleAction::Play).unwrap();
        player.stop();
        player.stop();
        assert_eq!(sched.outstanding(), 0);
        assert!(player.with_timeline(Timeline::is_killed));
    }
}
