use leptos::{html, prelude::*};

use crate::content::{HERO_TAGLINE, OWNER, ROLE};
use crate::presets;

use super::reveal::{style_of, use_reveal};

#[component]
pub fn Hero() -> impl IntoView {
    let root = NodeRef::<html::Section>::new();
    let styles = use_reveal(root, presets::hero());

    view! {
        <section
            node_ref=root
            id="home"
            class="relative min-h-screen flex flex-col items-center justify-center px-6 text-center overflow-hidden"
        >
            <div class="hero-glow"></div>
            <p class="text-sm tracking-[0.3em] uppercase text-primary mb-4" style=style_of(styles[0])>
                "Hello, I'm"
            </p>
            <h1 class="text-5xl md:text-7xl font-bold mb-6 text-gradient" style=style_of(styles[1])>
                {OWNER}
            </h1>
            <p class="max-w-2xl text-lg md:text-xl text-muted mb-10" style=style_of(styles[2])>
                {ROLE} <br /> {HERO_TAGLINE}
            </p>
            <div class="flex gap-4" style=style_of(styles[3])>
                <a href="#projects" class="btn-primary">
                    "View my work"
                </a>
                <a href="#contact" class="btn-ghost">
                    "Get in touch"
                </a>
            </div>
        </section>
    }
}
