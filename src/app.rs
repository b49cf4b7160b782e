mod about;
mod browser;
mod contact;
mod education;
mod footer;
mod hero;
mod homepage;
mod preloader;
mod projects;
mod reveal;

use homepage::HomePage;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{components::*, path};

use crate::content::{structured_data, HERO_TAGLINE, OWNER};

pub use browser::MotionRuntime;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <meta name="color-scheme" content="dark" />
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico" />
                <link rel="stylesheet" id="leptos" href="/pkg/portfolio-site.css" />
                <link
                    rel="stylesheet"
                    href="https://cdn.jsdelivr.net/gh/devicons/devicon@latest/devicon.min.css"
                />
                <MetaTags />
            </head>
            <body class="bg-background text-foreground font-sans antialiased">
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();
    provide_context(MotionRuntime::new());

    view! {
        <Title formatter=|title| format!("{OWNER} - {title}") />
        <Meta name="description" content=HERO_TAGLINE />
        <Script type_="application/ld+json">{structured_data().to_string()}</Script>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=path!("/") view=HomePage />
            </Routes>
        </Router>
    }
}
