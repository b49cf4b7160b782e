//! Section mount controller: ties a section's entrance [`Timeline`] to a
//! viewport observer and releases both on teardown.

use std::sync::{Arc, Mutex};

use super::{
    defaults,
    player::Player,
    trigger::{ScrollTrigger, TriggerEvent},
    ElementRect, MotionError, ObserverId, RevealPhase, Scheduler, StyleSink, Timeline, TriggerSpec,
    Viewport,
};

/// Everything a section needs to arm its entrance.
#[derive(Debug, Clone)]
pub struct SectionAnimation {
    pub trigger: TriggerSpec,
    pub timeline: Timeline,
}

struct Armed {
    trigger: ScrollTrigger,
    phase: RevealPhase,
    observer: Option<ObserverId>,
    /// Set once a `once` trigger has entered.
    spent: bool,
    released: bool,
}

struct ArmedSection {
    state: Mutex<Armed>,
    player: Player,
    unobserve: Box<dyn Fn(ObserverId) + Send + Sync>,
}

impl ArmedSection {
    fn on_sample(&self, rect: ElementRect, viewport_height: f64) {
        let (actions, unobserve) = {
            let mut state = self.state.lock().expect("should be able to lock section");
            if state.released || state.spent {
                return;
            }
            let events = state.trigger.update(&rect, viewport_height);
            let spec = *state.trigger.spec();
            let actions = events
                .iter()
                .map(|event| {
                    log::debug!("section trigger {event:?}");
                    spec.actions.action_for(*event)
                })
                .collect::<Vec<_>>();
            for action in &actions {
                state.phase = state.phase.after(*action);
            }
            let unobserve = if spec.once && events.contains(&TriggerEvent::Enter) {
                state.spent = true;
                state.observer.take()
            } else {
                None
            };
            (actions, unobserve)
        };
        if let Some(id) = unobserve {
            (self.unobserve)(id);
        }
        for action in actions {
            if let Err(e) = self.player.apply(action) {
                log::warn!("section animation skipped: {e}");
            }
        }
    }

    fn release(&self) -> bool {
        let observer = {
            let mut state = self.state.lock().expect("should be able to lock section");
            if state.released {
                return false;
            }
            state.released = true;
            state.observer.take()
        };
        if let Some(id) = observer {
            (self.unobserve)(id);
        }
        self.player.stop();
        true
    }
}

impl Drop for ArmedSection {
    fn drop(&mut self) {
        self.release();
    }
}

/// Owned by the section that armed it. Release with [`AnimationHandle::disarm`]
/// on the section's teardown path; dropping the last clone also releases.
#[derive(Clone, Default)]
pub struct AnimationHandle {
    inner: Option<Arc<ArmedSection>>,
}

impl AnimationHandle {
    /// A handle that owns nothing. Disarming it does nothing.
    pub fn inert() -> Self {
        Self::default()
    }

    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether the handle still holds live resources.
    pub fn is_armed(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| {
            !inner
                .state
                .lock()
                .expect("should be able to lock section")
                .released
        })
    }

    pub fn phase(&self) -> RevealPhase {
        self.inner
            .as_ref()
            .map(|inner| {
                inner
                    .state
                    .lock()
                    .expect("should be able to lock section")
                    .phase
            })
            .unwrap_or_default()
    }

    /// Cancels the observer and kills the timeline in one step. Idempotent.
    pub fn disarm(&self) {
        if let Some(inner) = &self.inner {
            if inner.release() {
                log::debug!("section animation disarmed");
            }
        }
    }
}

/// Arms a section's entrance animation against `root`.
///
/// The timeline's initial states are rendered at once. A missing root, or a
/// viewport that cannot observe it, yields an inert handle.
pub fn arm<V>(
    viewport: Arc<V>,
    scheduler: Arc<dyn Scheduler>,
    root: Option<&V::Target>,
    animation: SectionAnimation,
    sink: Arc<dyn StyleSink>,
) -> AnimationHandle
where
    V: Viewport + 'static,
{
    // registration has to precede the first timeline
    defaults();

    let Some(root) = root else {
        log::debug!("section animation not armed: {}", MotionError::MissingTarget);
        return AnimationHandle::inert();
    };

    let player = Player::new(scheduler, animation.timeline, sink);
    player.render();

    let section = Arc::new(ArmedSection {
        state: Mutex::new(Armed {
            trigger: ScrollTrigger::new(animation.trigger),
            phase: RevealPhase::default(),
            observer: None,
            spent: false,
            released: false,
        }),
        player,
        unobserve: {
            let viewport = viewport.clone();
            Box::new(move |id| viewport.unobserve(id))
        },
    });

    let weak = Arc::downgrade(&section);
    let observed = viewport.observe(
        root,
        Box::new(move |rect, height| {
            if let Some(section) = weak.upgrade() {
                section.on_sample(rect, height);
            }
        }),
    );
    match observed {
        Ok(id) => {
            let mut state = section.state.lock().expect("should be able to lock section");
            if state.spent || state.released {
                drop(state);
                viewport.unobserve(id);
            } else {
                state.observer = Some(id);
            }
        }
        Err(e) => {
            log::warn!("section animation not armed: {e}");
            section.release();
            return AnimationHandle::inert();
        }
    }
    log::debug!("section animation armed");

    AnimationHandle {
        inner: Some(section),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{
        Ease, ManualScheduler, ManualViewport, Position, TargetId, TimelineBuilder, TweenSpec,
        VisualState,
    };
    use std::collections::HashMap;
    use std::time::Duration;

    type Styles = Arc<Mutex<HashMap<TargetId, VisualState>>>;

    fn cards() -> Timeline {
        TimelineBuilder::new()
            .from_to(
                TargetId::range(0, 3),
                TweenSpec::from_to(
                    VisualState::RESTING.with_opacity(0.0).with_y(60.0).with_blur(10.0),
                    VisualState::RESTING,
                )
                .duration(1.0)
                .stagger(0.2)
                .ease(Ease::Power3Out),
                Position::Append,
            )
            .build()
    }

    fn reversible() -> TriggerSpec {
        TriggerSpec::default()
            .start("top 80%".parse().unwrap())
            .end("bottom 20%".parse().unwrap())
            .actions("play none none reverse".parse().unwrap())
    }

    fn setup() -> (ManualViewport, ManualScheduler, Styles, Arc<dyn StyleSink>) {
        let viewport = ManualViewport::new(1000.0);
        viewport.place("education", 2000.0, 900.0);
        let styles: Styles = Arc::new(Mutex::new(HashMap::new()));
        let s = styles.clone();
        let sink: Arc<dyn StyleSink> = Arc::new(move |t: TargetId, v: VisualState| {
            s.lock().unwrap().insert(t, v);
        });
        (viewport, ManualScheduler::new(), styles, sink)
    }

    fn arm_education(
        viewport: &ManualViewport,
        sched: &ManualScheduler,
        sink: Arc<dyn StyleSink>,
        trigger: TriggerSpec,
    ) -> AnimationHandle {
        arm(
            Arc::new(viewport.clone()),
            Arc::new(sched.clone()),
            Some(&"education"),
            SectionAnimation {
                trigger,
                timeline: cards(),
            },
            sink,
        )
    }

    #[test]
    fn test_mount_then_unmount_leaves_nothing() {
        let (viewport, sched, _, sink) = setup();
        let handle = arm_education(&viewport, &sched, sink, reversible());
        assert_eq!(viewport.active_observers(), 1);
        handle.disarm();
        assert_eq!(viewport.active_observers(), 0);
        assert_eq!(sched.outstanding(), 0);
        assert!(!handle.is_armed());
    }

    #[test]
    fn test_unmount_mid_animation_cancels_frames() {
        let (viewport, sched, styles, sink) = setup();
        let handle = arm_education(&viewport, &sched, sink, reversible());
        viewport.scroll_to(1500.0);
        assert_eq!(handle.phase(), RevealPhase::Revealed);
        sched.advance(Duration::from_millis(100));
        assert_eq!(sched.outstanding(), 1);

        handle.disarm();
        handle.disarm();
        assert_eq!(sched.outstanding(), 0);
        assert_eq!(viewport.active_observers(), 0);

        let before = styles.lock().unwrap().clone();
        sched.advance(Duration::from_secs(5));
        viewport.scroll_to(0.0);
        assert_eq!(*styles.lock().unwrap(), before);
    }

    #[test]
    fn test_initial_states_rendered_at_arm() {
        let (viewport, sched, styles, sink) = setup();
        let _handle = arm_education(&viewport, &sched, sink, reversible());
        let styles = styles.lock().unwrap();
        assert_eq!(styles.len(), 3);
        assert!(styles.values().all(|s| s.opacity == 0.0 && s.blur == 10.0));
    }

    #[test]
    fn test_reverse_on_exit_restores_initial_state_once_per_cycle() {
        let (viewport, sched, styles, sink) = setup();
        let handle = arm_education(&viewport, &sched, sink, reversible());
        let initial = styles.lock().unwrap().clone();

        for _ in 0..2 {
            viewport.scroll_to(1500.0);
            sched.advance(Duration::from_secs(2));
            assert_eq!(handle.phase(), RevealPhase::Revealed);
            assert!(styles
                .lock()
                .unwrap()
                .values()
                .all(|s| *s == VisualState::RESTING));

            viewport.scroll_to(0.0);
            assert_eq!(handle.phase(), RevealPhase::Hidden);
            sched.advance(Duration::from_secs(2));
            assert_eq!(*styles.lock().unwrap(), initial);
            assert_eq!(sched.outstanding(), 0);
        }
        handle.disarm();
    }

    #[test]
    fn test_play_once_section_never_reverses() {
        let (viewport, sched, styles, sink) = setup();
        let trigger = TriggerSpec::default().start("top 80%".parse().unwrap()).once();
        let handle = arm_education(&viewport, &sched, sink, trigger);
        viewport.scroll_to(1500.0);
        assert_eq!(viewport.active_observers(), 0);
        sched.advance(Duration::from_secs(2));
        viewport.scroll_to(0.0);
        sched.advance(Duration::from_secs(2));
        assert_eq!(handle.phase(), RevealPhase::Revealed);
        assert!(styles
            .lock()
            .unwrap()
            .values()
            .all(|s| *s == VisualState::RESTING));
        handle.disarm();
        assert_eq!(sched.outstanding(), 0);
    }

    #[test]
    fn test_already_visible_section_plays_at_arm() {
        let (viewport, sched, _, sink) = setup();
        viewport.place("hero", 0.0, 800.0);
        let handle = arm(
            Arc::new(viewport.clone()),
            Arc::new(sched.clone()),
            Some(&"hero"),
            SectionAnimation {
                trigger: TriggerSpec::default().once(),
                timeline: cards(),
            },
            sink,
        );
        assert_eq!(handle.phase(), RevealPhase::Revealed);
        assert_eq!(viewport.active_observers(), 0);
        assert_eq!(sched.outstanding(), 1);
        sched.advance(Duration::from_secs(2));
        assert_eq!(sched.outstanding(), 0);
    }

    #[test]
    fn test_missing_root_is_inert() {
        let (viewport, sched, styles, sink) = setup();
        let handle = arm::<ManualViewport>(
            Arc::new(viewport.clone()),
            Arc::new(sched.clone()),
            None,
            SectionAnimation {
                trigger: reversible(),
                timeline: cards(),
            },
            sink,
        );
        assert!(handle.is_inert());
        handle.disarm();
        assert_eq!(viewport.active_observers(), 0);
        assert!(styles.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unobservable_root_is_inert() {
        let (viewport, sched, _, sink) = setup();
        let handle = arm(
            Arc::new(viewport.clone()),
            Arc::new(sched.clone()),
            Some(&"detached"),
            SectionAnimation {
                trigger: reversible(),
                timeline: cards(),
            },
            sink,
        );
        assert!(handle.is_inert());
        assert_eq!(sched.outstanding(), 0);
    }

    #[test]
    fn test_dropping_last_handle_releases() {
        let (viewport, sched, _, sink) = setup();
        let handle = arm_education(&viewport, &sched, sink, reversible());
        viewport.scroll_to(1500.0);
        drop(handle);
        assert_eq!(viewport.active_observers(), 0);
        assert_eq!(sched.outstanding(), 0);
    }
}
