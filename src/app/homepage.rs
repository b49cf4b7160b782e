use leptos::prelude::*;
use leptos_meta::Title;

use super::{
    about::About, contact::Contact, education::Education, footer::Footer, hero::Hero,
    preloader::Preloader, projects::Projects,
};

/// The whole site. Sections mount only after the preloader finishes, so
/// each one arms its entrance against a laid-out page.
#[component]
pub fn HomePage() -> impl IntoView {
    let (loading, set_loading) = signal(true);

    view! {
        <Title text="Portfolio" />
        <Show
            when=move || !loading.get()
            fallback=move || view! { <Preloader on_complete=move |_| set_loading.set(false) /> }
        >
            <main class="flex flex-col overflow-x-hidden">
                <Hero />
                <About />
                <Education />
                <Projects />
                <Contact />
                <Footer />
            </main>
        </Show>
    }
}
