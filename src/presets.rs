//! Entrance animations and effect settings for each page section.
//!
//! Target ids are assigned in document order within a section.

use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use crate::motion::{
    MotionError, Position, SectionAnimation, TargetId, Timeline, TimelineBuilder, TriggerSpec,
    TweenSpec, VisualState,
};

/// How long a copy button stays in its confirmed state.
pub const COPY_REVERT: Duration = Duration::from_millis(2000);

pub const FLOATING_DOTS: usize = 15;
/// Fixed so that server and browser scatter the dots identically.
pub const FLOATING_DOT_SEED: u64 = 0x00C0_FFEE;

fn lit<T: FromStr<Err = MotionError>>(s: &str) -> T {
    s.parse().expect("preset literals should parse")
}

fn hidden_below(y: f64) -> VisualState {
    VisualState::RESTING.with_opacity(0.0).with_y(y)
}

fn revealed_once() -> TriggerSpec {
    TriggerSpec::default().start(lit("top 80%")).once()
}

/// Plays as soon as the page mounts; the hero is already in view.
pub fn hero() -> SectionAnimation {
    SectionAnimation {
        trigger: TriggerSpec::default().once(),
        timeline: TimelineBuilder::new()
            .from_to(
                TargetId::range(0, 3),
                TweenSpec::from_to(hidden_below(40.0), VisualState::RESTING)
                    .duration(0.9)
                    .ease(lit("power3.out"))
                    .stagger(0.15),
                Position::Append,
            )
            .from_to(
                [TargetId(3)],
                TweenSpec::from_to(
                    VisualState::RESTING.with_opacity(0.0).with_scale(0.9),
                    VisualState::RESTING,
                )
                .duration(0.6),
                lit("-=0.3"),
            )
            .build(),
    }
}

pub fn about() -> SectionAnimation {
    SectionAnimation {
        trigger: revealed_once(),
        timeline: TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(hidden_below(50.0), VisualState::RESTING).duration(0.8),
                Position::Append,
            )
            .from_to(
                TargetId::range(1, 3),
                TweenSpec::from_to(hidden_below(30.0), VisualState::RESTING)
                    .duration(0.6)
                    .stagger(0.15),
                lit("-=0.4"),
            )
            .build(),
    }
}

/// Cards blur in on the way down and reverse out when scrolled back above.
pub fn education(cards: usize) -> SectionAnimation {
    SectionAnimation {
        trigger: TriggerSpec::default()
            .start(lit("top 80%"))
            .end(lit("bottom 20%"))
            .actions(lit("play none none reverse")),
        timeline: TimelineBuilder::new()
            .from_to(
                TargetId::range(0, cards),
                TweenSpec::from_to(hidden_below(60.0).with_blur(10.0), VisualState::RESTING)
                    .duration(1.0)
                    .ease(lit("power3.out"))
                    .stagger(0.2),
                Position::Append,
            )
            .build(),
    }
}

pub fn projects(cards: usize) -> SectionAnimation {
    SectionAnimation {
        trigger: revealed_once(),
        timeline: TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(hidden_below(50.0), VisualState::RESTING).duration(0.8),
                Position::Append,
            )
            .from_to(
                TargetId::range(1, cards),
                TweenSpec::from_to(
                    hidden_below(40.0).with_scale(0.95),
                    VisualState::RESTING,
                )
                .duration(0.7)
                .ease(lit("power2.out"))
                .stagger(0.15),
                lit("-=0.4"),
            )
            .build(),
    }
}

/// Title, contact box, then the social icons, each overlapping the
/// previous step by 0.4s. Targets: 0 title, 1 box, 2.. icons.
pub fn contact(icons: usize) -> SectionAnimation {
    SectionAnimation {
        trigger: revealed_once(),
        timeline: TimelineBuilder::new()
            .from_to(
                [TargetId(0)],
                TweenSpec::from_to(hidden_below(50.0), VisualState::RESTING).duration(0.8),
                Position::Append,
            )
            .from_to(
                [TargetId(1)],
                TweenSpec::from_to(hidden_below(30.0), VisualState::RESTING).duration(0.6),
                lit("-=0.4"),
            )
            .from_to(
                TargetId::range(2, icons),
                TweenSpec::from_to(
                    VisualState::RESTING.with_opacity(0.0).with_scale(0.5),
                    VisualState::RESTING,
                )
                .stagger(0.1),
                lit("-=0.4"),
            )
            .build(),
    }
}

/// Confirmation pulse on a copy button.
pub fn copy_pulse() -> Timeline {
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

/// Animation delay and duration of a floating dot, in seconds.
pub fn floating_dot_timing(random: &mut impl Rng) -> (f64, f64) {
    (random.gen_range(0.0..3.0), random.gen_range(3.0..5.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{
        arm, trigger::Edge, Anchor, ManualScheduler, ManualViewport, StyleSink, ToggleAction,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::Arc;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sections() -> Vec<(&'static str, SectionAnimation)> {
        vec![
            ("hero", hero()),
            ("about", about()),
            ("education", education(3)),
            ("projects", projects(3)),
            ("contact", contact(2)),
        ]
    }

    #[test]
    fn test_contact_steps_overlap() {
        // 0.8 + (0.6 - 0.4) + (0.5 + 0.1 - 0.4) with two icons
        let contact = contact(2);
        assert!(close(contact.timeline.duration(), 1.2));
        assert!(contact.trigger.once);
        assert_eq!(contact.trigger.start, Anchor::new(Edge::Top, 0.8));
    }

    #[test]
    fn test_education_reverses_out() {
        let education = education(3);
        assert!(close(education.timeline.duration(), 1.4));
        assert!(education.trigger.is_reversible());
        assert!(!education.trigger.once);
        assert_eq!(education.trigger.end, Anchor::new(Edge::Bottom, 0.2));
        assert_eq!(education.trigger.actions.on_leave_back, ToggleAction::Reverse);
        assert_eq!(education.trigger.actions.on_enter_back, ToggleAction::None);
        let initial = education.timeline.initial_states();
        assert_eq!(initial.len(), 3);
        assert!(initial
            .iter()
            .all(|(_, s)| *s == VisualState::RESTING.with_opacity(0.0).with_y(60.0).with_blur(10.0)));
    }

    #[test]
    fn test_pulse_returns_to_rest() {
        let pulse = copy_pulse();
        assert!(close(pulse.duration(), 0.4));
        let mut pulse = pulse;
        pulse.play();
        pulse.advance(0.2);
        assert!(close(pulse.sample()[0].1.scale, 1.3));
        pulse.advance(0.2);
        assert!(close(pulse.sample()[0].1.scale, 1.0));
    }

    #[test]
    fn test_every_section_starts_hidden() {
        for animation in [hero(), about(), projects(3)] {
            assert!(animation
                .timeline
                .initial_states()
                .iter()
                .all(|(_, s)| s.opacity == 0.0));
        }
    }

    #[test]
    fn test_every_section_unmounts_cleanly() {
        for scroll in [0.0, 1500.0] {
            for (name, animation) in sections() {
                let viewport = ManualViewport::new(1000.0);
                viewport.place(name, 2000.0, 900.0);
                let sched = ManualScheduler::new();
                let sink: Arc<dyn StyleSink> = Arc::new(|_: TargetId, _: VisualState| {});
                let handle = arm(
                    Arc::new(viewport.clone()),
                    Arc::new(sched.clone()),
                    Some(&name),
                    animation,
                    sink,
                );
                assert!(!handle.is_inert(), "{name}");
                viewport.scroll_to(scroll);
                handle.disarm();
                assert_eq!(viewport.active_observers(), 0, "{name} at {scroll}");
                assert_eq!(sched.outstanding(), 0, "{name} at {scroll}");
            }
        }
    }

    #[test]
    fn test_floating_dot_timing_bounds() {
        let mut random = StdRng::seed_from_u64(FLOATING_DOT_SEED);
        for _ in 0..FLOATING_DOTS {
            let (delay, duration) = floating_dot_timing(&mut random);
            assert!((0.0..3.0).contains(&delay));
            assert!((3.0..5.0).contains(&duration));
        }
    }

    #[test]
    fn test_floating_dots_repeat_for_same_seed() {
        let mut server = StdRng::seed_from_u64(FLOATING_DOT_SEED);
        let mut client = StdRng::seed_from_u64(FLOATING_DOT_SEED);
        for _ in 0..FLOATING_DOTS {
            assert_eq!(
                floating_dot_timing(&mut server),
                floating_dot_timing(&mut client)
            );
        }
    }
}
