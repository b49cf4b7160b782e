//! Repeating spawner for short-lived decorative particles.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use rand::{Rng, RngCore};

use super::{
    Ease, MotionError, Position, Scheduler, TargetId, Timeline, TimelineBuilder, TimerId,
    TweenSpec, VisualState,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EmitterSpec {
    pub interval: Duration,
    /// Horizontal spawn band, percent of the container width.
    pub left: (f64, f64),
    /// Vertical spawn band, percent of the container height.
    pub top: (f64, f64),
    /// Travel in px over the particle's life.
    pub displacement: (f64, f64),
    /// Life in seconds.
    pub duration: f64,
    pub ease: Ease,
}

impl EmitterSpec {
    /// One star every four seconds in the upper half, streaking down-right.
    pub fn shooting_stars() -> Self {
        Self {
            interval: Duration::from_millis(4000),
            left: (0.0, 100.0),
            top: (0.0, 50.0),
            displacement: (250.0, 120.0),
            duration: 1.8,
            ease: Ease::Power2Out,
        }
    }

    fn trajectory(&self) -> Timeline {
        let (dx, dy) = self.displacement;
        TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(
                    VisualState::RESTING,
                    VisualState::RESTING.with_x(dx).with_y(dy).with_opacity(0.0),
                )
                .duration(self.duration)
                .ease(self.ease),
                Position::Append,
            )
            .build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,
    /// Percent of container width.
    pub left: f64,
    /// Percent of container height.
    pub top: f64,
    pub state: VisualState,
}

/// The container particles live in.
///
/// Implementations must tolerate calls after the container is gone.
pub trait ParticleLayer: Send + Sync {
    fn is_attached(&self) -> bool;
    fn spawn(&self, particle: Particle);
    fn update(&self, id: u64, state: VisualState);
    fn remove(&self, id: u64);
}

struct Live {
    id: u64,
    timeline: Timeline,
}

struct EmitterState {
    live: Vec<Live>,
    tick: Option<TimerId>,
    frame: Option<TimerId>,
    last_frame: Duration,
    next_id: u64,
    random: Box<dyn RngCore + Send>,
}

/// Uniform pick in `[low, high)`; a degenerate band yields `low`.
fn within(random: &mut (impl Rng + ?Sized), (low, high): (f64, f64)) -> f64 {
    if low < high {
        random.gen_range(low..high)
    } else {
        low
    }
}

struct Emitter {
    spec: EmitterSpec,
    state: Mutex<EmitterState>,
    scheduler: Arc<dyn Scheduler>,
    layer: Arc<dyn ParticleLayer>,
}

impl Emitter {
    fn spawn(self: &Arc<Self>) {
        if !self.layer.is_attached() {
            log::trace!("particle skipped: {}", MotionError::MissingTarget);
            return;
        }
        let (particle, start_frames) = {
            let mut state = self.state.lock().expect("should be able to lock emitter");
            let left = within(&mut *state.random, self.spec.left);
            let top = within(&mut *state.random, self.spec.top);
            state.next_id += 1;
            let id = state.next_id;
            let mut timeline = self.spec.trajectory();
            timeline.play();
            state.live.push(Live { id, timeline });
            let start_frames = state.frame.is_none();
            if start_frames {
                state.last_frame = self.scheduler.now();
            }
            (
                Particle {
                    id,
                    left,
                    top,
                    state: VisualState::RESTING,
                },
                start_frames,
            )
        };
        self.layer.spawn(particle);
        if start_frames {
            let weak = Arc::downgrade(self);
            let frame = Box::new(move || {
                if let Some(emitter) = weak.upgrade() {
                    emitter.frame();
                }
            });
            match self.scheduler.request_frames(frame) {
                Ok(id) => {
                    self.state
                        .lock()
                        .expect("should be able to lock emitter")
                        .frame = Some(id)
                }
                Err(e) => {
                    log::warn!("particle animation skipped: {e}");
                    let ids = {
                        let mut state = self.state.lock().expect("should be able to lock emitter");
                        state.live.drain(..).map(|l| l.id).collect::<Vec<_>>()
                    };
                    for id in ids {
                        self.layer.remove(id);
                    }
                }
            }
        }
    }

    fn frame(&self) {
        let (updates, finished, frame) = {
            let mut state = self.state.lock().expect("should be able to lock emitter");
            let now = self.scheduler.now();
            let dt = now.saturating_sub(state.last_frame).as_secs_f64();
            state.last_frame = now;
            let mut updates = Vec::new();
            let mut finished = Vec::new();
            for live in state.live.iter_mut() {
                let active = live.timeline.advance(dt);
                if active {
                    if let Some((_, s)) = live.timeline.sample().first() {
                        updates.push((live.id, *s));
                    }
                } else {
                    finished.push(live.id);
                }
            }
            state.live.retain(|l| !finished.contains(&l.id));
            let frame = if state.live.is_empty() {
                state.frame.take()
            } else {
                None
            };
            (updates, finished, frame)
        };
        if let Some(id) = frame {
            self.scheduler.clear(id);
        }
        for (id, s) in updates {
            self.layer.update(id, s);
        }
        // removal follows the particle's own completion
        for id in finished {
            self.layer.remove(id);
        }
    }

    fn stop_ticks(&self) -> bool {
        let tick = self
            .state
            .lock()
            .expect("should be able to lock emitter")
            .tick
            .take();
        match tick {
            Some(id) => {
                self.scheduler.clear(id);
                true
            }
            None => false,
        }
    }
}

impl Drop for Emitter {
    fn drop(&mut self) {
        self.stop_ticks();
        let (frame, ids) = {
            let mut state = self.state.lock().expect("should be able to lock emitter");
            let ids = state.live.drain(..).map(|l| l.id).collect::<Vec<_>>();
            (state.frame.take(), ids)
        };
        if let Some(id) = frame {
            self.scheduler.clear(id);
        }
        for id in ids {
            self.layer.remove(id);
        }
    }
}

/// Owned by the section running the emitter.
#[derive(Clone, Default)]
pub struct EmitterHandle {
    inner: Option<Arc<Emitter>>,
}

impl EmitterHandle {
    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|e| {
            e.state
                .lock()
                .expect("should be able to lock emitter")
                .tick
                .is_some()
        })
    }

    /// Particles currently alive.
    pub fn resident(&self) -> usize {
        self.inner.as_ref().map_or(0, |e| {
            e.state
                .lock()
                .expect("should be able to lock emitter")
                .live
                .len()
        })
    }

    /// Stops spawning. Particles already in flight finish on their own.
    pub fn stop(&self) {
        if let Some(emitter) = &self.inner {
            if emitter.stop_ticks() {
                log::debug!("particle emitter stopped");
            }
        }
    }
}

/// Starts spawning one particle per `spec.interval` into `layer`.
pub fn start(
    scheduler: Arc<dyn Scheduler>,
    layer: Arc<dyn ParticleLayer>,
    spec: EmitterSpec,
    random: impl Rng + Send + 'static,
) -> EmitterHandle {
    let interval = spec.interval;
    let emitter = Arc::new(Emitter {
        spec,
        state: Mutex::new(EmitterState {
            live: Vec::new(),
            tick: None,
            frame: None,
            last_frame: Duration::ZERO,
            next_id: 0,
            random: Box::new(random),
        }),
        scheduler: scheduler.clone(),
        layer,
    });
    let weak: Weak<Emitter> = Arc::downgrade(&emitter);
    let tick = scheduler.set_interval(
        interval,
        Box::new(move || {
            if let Some(emitter) = weak.upgrade() {
                emitter.spawn();
            }
        }),
    );
    match tick {
        Ok(id) => {
            emitter
                .state
                .lock()
                .expect("should be able to lock emitter")
                .tick = Some(id);
            log::debug!("particle emitter started");
            EmitterHandle {
                inner: Some(emitter),
            }
        }
        Err(e) => {
            log::warn!("particle emitter not started: {e}");
            EmitterHandle::default()
        }
    }
}
