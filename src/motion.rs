//! Scroll-triggered animation engine used by every page section.
//!
//! The engine is platform independent: timers come from a [`Scheduler`],
//! element positions from a [`Viewport`], and sampled styles leave through a
//! [`StyleSink`]. The browser implementations of those seams live in
//! `app::browser`; the manual ones here drive the tests.

pub mod controller;
pub mod easing;
pub mod emitter;
pub mod feedback;
pub mod player;
pub mod scheduler;
pub mod style;
pub mod timeline;
pub mod trigger;
pub mod viewport;

use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

pub use controller::{arm, AnimationHandle, SectionAnimation};
pub use easing::Ease;
pub use player::StyleSink;
pub use scheduler::{ManualScheduler, Scheduler, TimerId};
pub use style::VisualState;
pub use timeline::{Position, TargetId, Timeline, TimelineBuilder, TweenSpec};
pub use trigger::{Anchor, RevealPhase, ToggleAction, ToggleActions, TriggerSpec};
pub use viewport::{ElementRect, ManualViewport, ObserverId, Viewport};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("animation target is not attached")]
    MissingTarget,
    #[error("scheduler refused timer: {0}")]
    Scheduler(String),
    #[error("viewport observer failed: {0}")]
    Observer(String),
    #[error("unknown ease: {0}")]
    UnknownEase(String),
    #[error("invalid trigger anchor: {0}")]
    InvalidAnchor(String),
    #[error("invalid toggle action: {0}")]
    InvalidToggleAction(String),
    #[error("invalid timeline position: {0}")]
    InvalidPosition(String),
}

/// Engine-wide defaults, fixed at registration.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionDefaults {
    /// Period of the frame timer that advances playing timelines.
    pub frame_interval: Duration,
    /// Tween duration in seconds when a tween does not set one.
    pub duration: f64,
    pub ease: Ease,
}

impl Default for MotionDefaults {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            duration: 0.5,
            ease: Ease::Power1Out,
        }
    }
}

static REGISTERED: OnceLock<MotionDefaults> = OnceLock::new();

/// Registers the engine once per process. Later calls are no-ops and
/// return `false`.
pub fn register(defaults: MotionDefaults) -> bool {
    let mut first = false;
    REGISTERED.get_or_init(|| {
        first = true;
        log::debug!("motion engine registered: {defaults:?}");
        defaults
    });
    first
}

/// Engine defaults, registering the stock ones if nothing registered yet.
pub fn defaults() -> &'static MotionDefaults {
    REGISTERED.get_or_init(|| {
        log::debug!("motion engine registered with stock defaults");
        MotionDefaults::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_is_idempotent() {
        let first = defaults().clone();
        assert!(!register(MotionDefaults {
            frame_interval: Duration::from_millis(1),
            ..MotionDefaults::default()
        }));
        assert_eq!(defaults(), &first);
    }

    #[test]
    fn test_stock_defaults() {
        let d = MotionDefaults::default();
        assert_eq!(d.frame_interval, Duration::from_millis(16));
        assert_eq!(d.duration, 0.5);
        assert_eq!(d.ease, Ease::Power1Out);
    }
}
