use leptos::{html, prelude::*};

use crate::content::{EducationEntry, EDUCATION};
use crate::motion::VisualState;
use crate::presets;

use super::reveal::{style_of, use_reveal};

#[component]
pub fn Education() -> impl IntoView {
    let root = NodeRef::<html::Section>::new();
    let styles = use_reveal(root, presets::education(EDUCATION.len()));

    view! {
        <section node_ref=root id="education" class="section">
            <h2 class="section-title">
                "My "
                <span class="text-gradient">"Education"</span>
            </h2>
            <div class="relative max-w-4xl mx-auto">
                <div class="absolute left-4 md:left-1/2 top-0 bottom-0 w-px bg-gradient-to-b from-primary via-accent to-transparent"></div>
                {EDUCATION
                    .iter()
                    .zip(styles)
                    .enumerate()
                    .map(|(i, (entry, style))| view! { <EducationCard entry=*entry reveal=style index=i /> })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
fn EducationCard(entry: EducationEntry, reveal: RwSignal<VisualState>, index: usize) -> impl IntoView {
    let side = if index % 2 == 0 { "md:mr-auto md:pr-12" } else { "md:ml-auto md:pl-12" };
    let marker = if entry.is_current { "timeline-dot timeline-dot-current" } else { "timeline-dot" };

    view! {
        <div class=format!("relative pl-12 md:pl-0 md:w-1/2 mb-12 {side}") style=style_of(reveal)>
            <span class=marker></span>
            <div class="glass rounded-2xl p-6 hover:scale-[1.02] transition-transform">
                <div class="flex items-start gap-4">
                    {entry
                        .logo
                        .map(|src| {
                            view! {
                                <img
                                    src=src
                                    alt=entry.institution
                                    class="w-14 h-14 rounded-xl object-contain bg-white/5 p-1"
                                />
                            }
                        })}
                    <div class="flex-1">
                        <span class="text-xs font-semibold text-primary">{entry.period}</span>
                        <h3 class="text-xl font-bold mt-1">{entry.title}</h3>
                        {entry
                            .subtitle
                            .map(|s| view! { <p class="text-sm text-accent">{s}</p> })}
                        <p class="mt-2 text-muted">{entry.institution}</p>
                        <p class="text-sm text-muted/70">{entry.location}</p>
                        <span class=if entry.is_current {
                            "badge badge-current"
                        } else {
                            "badge"
                        }>{entry.status}</span>
                    </div>
                </div>
            </div>
        </div>
    }
}
