use leptos::{html, prelude::*};

use crate::motion::{self, AnimationHandle, SectionAnimation, VisualState};

use super::browser::{signal_sink, MotionRuntime};

/// Arms `animation` against `root` once the section is in the DOM and
/// disarms it when the section is torn down.
///
/// Returns one style signal per animation target, already holding the
/// target's pre-entrance state so the server render matches the first
/// client frame.
pub fn use_reveal(
    root: NodeRef<html::Section>,
    animation: SectionAnimation,
) -> Vec<RwSignal<VisualState>> {
    let initial = animation.timeline.initial_states();
    let count = initial.iter().map(|(t, _)| t.0 + 1).max().unwrap_or(0);
    let mut states = vec![VisualState::RESTING; count];
    for (target, state) in initial {
        states[target.0] = state;
    }
    let styles = states.into_iter().map(RwSignal::new).collect::<Vec<_>>();

    let runtime = expect_context::<MotionRuntime>();
    let handle = StoredValue::new(AnimationHandle::inert());
    Effect::new({
        let styles = styles.clone();
        move |_| {
            let armed = motion::arm(
                runtime.viewport.clone(),
                runtime.scheduler(),
                Some(&root),
                animation.clone(),
                signal_sink(styles.clone()),
            );
            handle.set_value(armed);
        }
    });
    on_cleanup(move || {
        handle.try_with_value(AnimationHandle::disarm);
    });

    styles
}

/// Inline style for one animated element.
pub fn style_of(style: RwSignal<VisualState>) -> impl Fn() -> String + Send + Sync + Copy + 'static {
    move || style.get().to_css()
}
