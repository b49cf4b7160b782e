//! Browser-side implementations of the motion collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leptos::{
    ev, html,
    leptos_dom::helpers::{
        request_animation_frame_with_handle, AnimationFrameRequestHandle, IntervalHandle,
        TimeoutHandle, WindowListenerHandle,
    },
    prelude::*,
};

use crate::motion::{
    emitter::{Particle, ParticleLayer},
    scheduler::{IntervalFn, TimeoutFn},
    viewport::ObserveFn,
    ElementRect, MotionError, ObserverId, Scheduler, StyleSink, TargetId, TimerId, Viewport,
    VisualState,
};

enum Handle {
    Timeout(TimeoutHandle),
    Interval(IntervalHandle),
    Frame(AnimationFrameRequestHandle),
}

impl Handle {
    fn clear(self) {
        match self {
            Handle::Timeout(h) => h.clear(),
            Handle::Interval(h) => h.clear(),
            Handle::Frame(h) => h.cancel(),
        }
    }
}

type Timers = Arc<Mutex<HashMap<TimerId, Handle>>>;

/// Requests the next frame for `id`. After each frame the request is renewed
/// unless the callback, or anyone else, cleared `id` meanwhile.
fn request_frame(
    id: TimerId,
    timers: Timers,
    f: Arc<Mutex<IntervalFn>>,
) -> Result<(), MotionError> {
    let handle = request_animation_frame_with_handle({
        let timers = timers.clone();
        move || {
            (f.lock().expect("should be able to lock frame callback"))();
            let live = timers
                .lock()
                .expect("should be able to lock timers")
                .contains_key(&id);
            if live {
                if let Err(e) = request_frame(id, timers.clone(), f) {
                    log::warn!("frame loop ended: {e}");
                    timers
                        .lock()
                        .expect("should be able to lock timers")
                        .remove(&id);
                }
            }
        }
    })
    .map_err(|e| MotionError::Scheduler(format!("{e:?}")))?;
    timers
        .lock()
        .expect("should be able to lock timers")
        .insert(id, Handle::Frame(handle));
    Ok(())
}

/// Timers on the window event loop, frames on `requestAnimationFrame`, and
/// time from `performance.now()`.
#[derive(Default)]
pub struct BrowserScheduler {
    timers: Timers,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for BrowserScheduler {
    fn set_timeout(&self, delay: Duration, f: TimeoutFn) -> Result<TimerId, MotionError> {
        let id = TimerId::next();
        let timers = self.timers.clone();
        let handle = set_timeout_with_handle(
            move || {
                timers
                    .lock()
                    .expect("should be able to lock timers")
                    .remove(&id);
                f();
            },
            delay,
        )
        .map_err(|e| MotionError::Scheduler(format!("{e:?}")))?;
        self.timers
            .lock()
            .expect("should be able to lock timers")
            .insert(id, Handle::Timeout(handle));
        Ok(id)
    }

    fn set_interval(&self, period: Duration, f: IntervalFn) -> Result<TimerId, MotionError> {
        if period.is_zero() {
            return Err(MotionError::Scheduler("zero interval".to_string()));
        }
        let id = TimerId::next();
        let f = Mutex::new(f);
        let handle = set_interval_with_handle(
            move || (f.lock().expect("should be able to lock interval"))(),
            period,
        )
        .map_err(|e| MotionError::Scheduler(format!("{e:?}")))?;
        self.timers
            .lock()
            .expect("should be able to lock timers")
            .insert(id, Handle::Interval(handle));
        Ok(id)
    }

    fn request_frames(&self, f: IntervalFn) -> Result<TimerId, MotionError> {
        let id = TimerId::next();
        request_frame(id, self.timers.clone(), Arc::new(Mutex::new(f)))?;
        Ok(id)
    }

    fn clear(&self, id: TimerId) {
        let handle = self
            .timers
            .lock()
            .expect("should be able to lock timers")
            .remove(&id);
        if let Some(handle) = handle {
            handle.clear();
        }
    }

    fn now(&self) -> Duration {
        // milliseconds since navigation start, unaffected by wall clock changes
        let millis = window()
            .performance()
            .map(|p| p.now())
            .unwrap_or_default();
        Duration::from_secs_f64(millis.max(0.0) / 1000.0)
    }
}

fn sample(node: &NodeRef<html::Section>) -> Result<(ElementRect, f64), MotionError> {
    let el = node
        .try_get_untracked()
        .flatten()
        .ok_or(MotionError::MissingTarget)?;
    let rect = el.get_bounding_client_rect();
    let height = window()
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .ok_or_else(|| MotionError::Observer("viewport height unavailable".to_string()))?;
    Ok((ElementRect::new(rect.top(), rect.bottom()), height))
}

/// Samples section bounds on window scroll and resize.
#[derive(Default)]
pub struct BrowserViewport {
    listeners: Mutex<HashMap<ObserverId, [WindowListenerHandle; 2]>>,
}

impl BrowserViewport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Viewport for BrowserViewport {
    type Target = NodeRef<html::Section>;

    fn observe(&self, target: &Self::Target, f: ObserveFn) -> Result<ObserverId, MotionError> {
        let node = *target;
        let (rect, height) = sample(&node)?;
        let id = ObserverId::next();
        let f = Arc::new(Mutex::new(f));
        (f.lock().expect("should be able to lock observer"))(rect, height);

        let notify = move || {
            if let Ok((rect, height)) = sample(&node) {
                (f.lock().expect("should be able to lock observer"))(rect, height);
            }
        };
        let on_scroll = window_event_listener(ev::scroll, {
            let notify = notify.clone();
            move |_| notify()
        });
        let on_resize = window_event_listener(ev::resize, move |_| notify());
        self.listeners
            .lock()
            .expect("should be able to lock listeners")
            .insert(id, [on_scroll, on_resize]);
        Ok(id)
    }

    fn unobserve(&self, id: ObserverId) {
        let handles = self
            .listeners
            .lock()
            .expect("should be able to lock listeners")
            .remove(&id);
        for handle in handles.into_iter().flatten() {
            handle.remove();
        }
    }
}

/// Routes samples into per-target style signals.
pub fn signal_sink(styles: Vec<RwSignal<VisualState>>) -> Arc<dyn StyleSink> {
    Arc::new(move |target: TargetId, state: VisualState| {
        if let Some(style) = styles.get(target.0) {
            // the section may already be gone
            style.try_set(state);
        }
    })
}

/// A rendered particle.
#[derive(Clone)]
pub struct Star {
    pub id: u64,
    pub left: f64,
    pub top: f64,
    pub style: ArcRwSignal<VisualState>,
}

/// Particle container backed by a signal list.
pub struct SignalLayer {
    pub container: NodeRef<html::Div>,
    pub stars: RwSignal<Vec<Star>>,
}

impl ParticleLayer for SignalLayer {
    fn is_attached(&self) -> bool {
        self.container.try_get_untracked().flatten().is_some() && !self.stars.is_disposed()
    }

    fn spawn(&self, particle: Particle) {
        self.stars.try_update(|stars| {
            stars.push(Star {
                id: particle.id,
                left: particle.left,
                top: particle.top,
                style: ArcRwSignal::new(particle.state),
            })
        });
    }

    fn update(&self, id: u64, state: VisualState) {
        let style = self
            .stars
            .try_with_untracked(|stars| {
                stars
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.style.clone())
            })
            .flatten();
        if let Some(style) = style {
            style.set(state);
        }
    }

    fn remove(&self, id: u64) {
        self.stars.try_update(|stars| stars.retain(|s| s.id != id));
    }
}

/// Shared collaborators for every animated section, provided as context.
#[derive(Clone)]
pub struct MotionRuntime {
    pub scheduler: Arc<BrowserScheduler>,
    pub viewport: Arc<BrowserViewport>,
}

impl MotionRuntime {
    pub fn new() -> Self {
        Self {
            scheduler: Arc::new(BrowserScheduler::new()),
            viewport: Arc::new(BrowserViewport::new()),
        }
    }

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.scheduler.clone()
    }
}

impl Default for MotionRuntime {
    fn default() -> Self {
        Self::new()
    }
}
