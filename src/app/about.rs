use leptos::{html, prelude::*};

use crate::content::{ABOUT, SKILLS};
use crate::presets;

use super::reveal::{style_of, use_reveal};

#[component]
pub fn About() -> impl IntoView {
    let root = NodeRef::<html::Section>::new();
    let styles = use_reveal(root, presets::about());

    view! {
        <section node_ref=root id="about" class="section">
            <h2 class="section-title" style=style_of(styles[0])>
                "About "
                <span class="text-gradient">"Me"</span>
            </h2>
            <div class="max-w-3xl mx-auto space-y-4 text-lg text-muted">
                <p style=style_of(styles[1])>{ABOUT[0]}</p>
                <p style=style_of(styles[2])>{ABOUT[1]}</p>
            </div>
            <ul class="flex flex-wrap justify-center gap-3 mt-10" style=style_of(styles[3])>
                {SKILLS
                    .iter()
                    .map(|skill| view! { <li class="glass px-4 py-2 rounded-full text-sm">{*skill}</li> })
                    .collect_view()}
            </ul>
        </section>
    }
}
