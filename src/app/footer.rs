use leptos::prelude::*;

use crate::content::{copyright, BUILD_TIME, SOCIALS};

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="border-t border-white/10 py-8 px-6">
            <div class="max-w-6xl mx-auto flex flex-col md:flex-row items-center justify-between gap-4 text-sm text-muted">
                <p>{copyright()}</p>
                <nav class="flex gap-4">
                    <a href="#home" class="hover:text-primary">"Home"</a>
                    <a href="#about" class="hover:text-primary">"About"</a>
                    <a href="#education" class="hover:text-primary">"Education"</a>
                    <a href="#projects" class="hover:text-primary">"Projects"</a>
                    <a href="#contact" class="hover:text-primary">"Contact"</a>
                </nav>
                <div class="flex gap-3 text-lg">
                    {SOCIALS
                        .iter()
                        .map(|s| {
                            view! {
                                <a
                                    href=s.href
                                    target="_blank"
                                    rel="noopener noreferrer"
                                    aria-label=s.label
                                    class="hover:text-primary"
                                >
                                    <i class=s.icon></i>
                                </a>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
            <p class="text-center text-xs text-muted/60 mt-4">
                {format!("Built {BUILD_TIME}")}
            </p>
        </footer>
    }
}
