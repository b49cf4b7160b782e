use leptos::prelude::*;

use crate::content::OWNER;
use crate::preload::{LoadProgress, PreloadSpec};

use super::browser::MotionRuntime;

/// Full-screen loading counter. Calls `on_complete` once the counter has
/// reached 100 and faded out.
#[component]
pub fn Preloader(#[prop(into)] on_complete: Callback<()>) -> impl IntoView {
    let percent = RwSignal::new(0u8);
    let progress = StoredValue::new(None::<LoadProgress>);
    let runtime = expect_context::<MotionRuntime>();

    Effect::new(move |_| {
        let loader = LoadProgress::start(
            runtime.scheduler(),
            PreloadSpec::default(),
            move |p| {
                percent.try_set(p);
            },
            move || on_complete.run(()),
        );
        progress.set_value(Some(loader));
    });
    on_cleanup(move || {
        progress.try_with_value(|p| p.as_ref().map(LoadProgress::cancel));
    });

    view! {
        <div class=move || {
            if percent.get() >= 100 { "preloader opacity-0" } else { "preloader" }
        }>
            <p class="text-sm tracking-[0.3em] uppercase text-muted mb-4">{OWNER}</p>
            <span class="text-6xl font-bold text-gradient tabular-nums">
                {move || format!("{}%", percent.get())}
            </span>
            <div class="mt-6 h-0.5 w-48 bg-muted/20 overflow-hidden rounded-full">
                <div
                    class="h-full bg-primary"
                    style=move || format!("width: {}%;", percent.get())
                ></div>
            </div>
        </div>
    }
}
