use leptos::{html, prelude::*};

use crate::content::PROJECTS;
use crate::presets;

use super::reveal::{style_of, use_reveal};

#[component]
pub fn Projects() -> impl IntoView {
    let root = NodeRef::<html::Section>::new();
    let styles = use_reveal(root, presets::projects(PROJECTS.len()));

    view! {
        <section node_ref=root id="projects" class="section">
            <h2 class="section-title" style=style_of(styles[0])>
                "Featured "
                <span class="text-gradient">"Projects"</span>
            </h2>
            <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3 max-w-6xl mx-auto">
                {PROJECTS
                    .iter()
                    .zip(styles.into_iter().skip(1))
                    .map(|(project, style)| {
                        view! {
                            <article
                                class="glass rounded-2xl p-6 flex flex-col hover:-translate-y-1 transition-transform"
                                style=style_of(style)
                            >
                                <h3 class="text-xl font-bold mb-2">{project.title}</h3>
                                <p class="text-muted flex-1">{project.summary}</p>
                                <ul class="flex flex-wrap gap-2 mt-4">
                                    {project
                                        .stack
                                        .iter()
                                        .map(|tech| {
                                            view! {
                                                <li class="text-xs px-2 py-1 rounded bg-primary/10 text-primary">
                                                    {*tech}
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                                {project
                                    .href
                                    .map(|href| {
                                        view! {
                                            <a
                                                href=href
                                                target="_blank"
                                                rel="noopener noreferrer"
                                                class="mt-4 text-sm text-accent hover:underline"
                                            >
                                                "View source →"
                                            </a>
                                        }
                                    })}
                            </article>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
