use std::sync::Arc;

use leptos::{html, prelude::*};
use leptos_use::{use_clipboard, UseClipboardReturn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::content::{ChannelKind, ContactChannel, EMAIL, PHONE, SOCIALS};
use crate::motion::{
    emitter::{self, EmitterHandle, EmitterSpec},
    feedback::TransientFlag,
    player::Player,
    Timeline, VisualState,
};
use crate::presets;

use super::browser::{signal_sink, MotionRuntime, SignalLayer, Star};
use super::reveal::{style_of, use_reveal};

#[component]
pub fn Contact() -> impl IntoView {
    let root = NodeRef::<html::Section>::new();
    let styles = use_reveal(root, presets::contact(SOCIALS.len()));
    let (title, panel) = (styles[0], styles[1]);

    view! {
        <section node_ref=root id="contact" class="section relative overflow-hidden">
            <ShootingStars />
            <FloatingDots />
            <h2 class="section-title relative" style=style_of(title)>
                "Get In "
                <span class="text-gradient">"Touch"</span>
            </h2>
            <div class="relative max-w-xl mx-auto glass rounded-3xl p-8 space-y-4" style=style_of(panel)>
                <p class="text-center text-muted mb-6">
                    "Open to internships, collaborations and a good conversation about motion on the web."
                </p>
                <CopyRow channel=EMAIL />
                <CopyRow channel=PHONE />
            </div>
            <div class="relative flex justify-center gap-6 mt-10">
                {SOCIALS
                    .iter()
                    .zip(styles.into_iter().skip(2))
                    .map(|(social, style)| {
                        view! {
                            <a
                                href=social.href
                                target="_blank"
                                rel="noopener noreferrer"
                                aria-label=social.label
                                class="social-icon"
                                style=style_of(style)
                            >
                                <i class=social.icon></i>
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

/// A contact line whose button copies the value and confirms for a moment.
#[component]
fn CopyRow(channel: ContactChannel) -> impl IntoView {
    let runtime = expect_context::<MotionRuntime>();
    let copied = RwSignal::new(false);
    let pulse = RwSignal::new(VisualState::RESTING);
    let feedback = StoredValue::new(None::<(TransientFlag, Player)>);
    let UseClipboardReturn { copy, .. } = use_clipboard();

    Effect::new(move |_| {
        let flag = TransientFlag::new(runtime.scheduler(), move |value| {
            copied.try_set(value);
        });
        let player = Player::new(
            runtime.scheduler(),
            presets::copy_pulse(),
            signal_sink(vec![pulse]),
        );
        feedback.set_value(Some((flag, player)));
    });
    on_cleanup(move || {
        if let Some(Some((flag, player))) = feedback.try_get_value() {
            flag.dispose();
            player.stop();
        }
    });

    let on_copy = move |_| {
        // the outcome of the write is not reported back
        copy(channel.copy_text);
        let Some((flag, player)) = feedback.get_value() else {
            return;
        };
        flag.trigger(presets::COPY_REVERT);
        if let Err(e) = player.control(Timeline::restart) {
            log::warn!("copy pulse skipped: {e}");
        }
    };

    let (icon, label) = match channel.kind {
        ChannelKind::Email => ("✉", "Copy email"),
        ChannelKind::Phone => ("☎", "Copy phone number"),
    };

    view! {
        <div class="flex items-center justify-between gap-4 rounded-xl bg-white/5 px-4 py-3">
            <a href=channel.href class="flex items-center gap-3 hover:text-primary transition-colors">
                <span class="text-xl">{icon}</span>
                <span class="font-medium">{channel.display}</span>
            </a>
            <button
                class=move || if copied.get() { "copy-btn copy-btn-done" } else { "copy-btn" }
                aria-label=label
                on:click=on_copy
            >
                <span class="inline-block" style=style_of(pulse)>
                    {move || if copied.get() { "✓" } else { "⧉" }}
                </span>
            </button>
        </div>
    }
}

#[component]
fn ShootingStars() -> impl IntoView {
    let runtime = expect_context::<MotionRuntime>();
    let container = NodeRef::<html::Div>::new();
    let stars = RwSignal::new(Vec::<Star>::new());
    let handle = StoredValue::new(EmitterHandle::default());

    Effect::new(move |_| {
        let layer = Arc::new(SignalLayer { container, stars });
        handle.set_value(emitter::start(
            runtime.scheduler(),
            layer,
            EmitterSpec::shooting_stars(),
            StdRng::seed_from_u64(clock_seed()),
        ));
    });
    on_cleanup(move || {
        handle.try_with_value(EmitterHandle::stop);
    });

    view! {
        <div node_ref=container class="absolute inset-0 pointer-events-none" aria-hidden="true">
            <For
                each=move || stars.get()
                key=|star| star.id
                children=move |star| {
                    let Star { left, top, style, .. } = star;
                    view! {
                        <span
                            class="shooting-star"
                            style=move || {
                                format!("left: {left}%; top: {top}%; {}", style.get().to_css())
                            }
                        ></span>
                    }
                }
            />
        </div>
    }
}

fn clock_seed() -> u64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default() as u64
}

#[component]
fn FloatingDots() -> impl IntoView {
    let mut random = StdRng::seed_from_u64(presets::FLOATING_DOT_SEED);
    let dots = (0..presets::FLOATING_DOTS)
        .map(|_| {
            let left: f64 = random.gen_range(0.0..100.0);
            let top: f64 = random.gen_range(0.0..100.0);
            let (delay, duration) = presets::floating_dot_timing(&mut random);
            format!(
                "left: {left:.2}%; top: {top:.2}%; animation-delay: {delay:.2}s; animation-duration: {duration:.2}s;"
            )
        })
        .collect::<Vec<_>>();

    view! {
        <div class="absolute inset-0 pointer-events-none" aria-hidden="true">
            {dots
                .into_iter()
                .map(|style| view! { <span class="floating-dot animate-float" style=style></span> })
                .collect_view()}
        </div>
    }
}
