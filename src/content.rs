//! Fixed page content. Everything here is literal data created at load
//! time and never mutated.

use serde::Serialize;

pub const OWNER: &str = "Achref Abidi";
pub const ROLE: &str = "Computer Science & Multimedia Engineering Student";

/// Fixed at build time so the server render and the hydrated page agree.
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const BUILD_YEAR: &str = env!("BUILD_YEAR");

pub fn copyright() -> String {
    format!("© {BUILD_YEAR} {OWNER}. All rights reserved.")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EducationEntry {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub institution: &'static str,
    pub location: &'static str,
    pub period: &'static str,
    pub status: &'static str,
    pub is_current: bool,
    /// Path of the institution logo under the site root.
    pub logo: Option<&'static str>,
}

pub const EDUCATION: [EducationEntry; 3] = [
    EducationEntry {
        title: "Computer Science and Multimedia Engineering",
        subtitle: None,
        institution: "Higher Institute of Arts and Multimedia Manouba",
        location: "Manouba Campus",
        period: "2023 - Present",
        status: "Expected graduation: June 2026",
        is_current: true,
        logo: Some("/assets/isamm-logo.png"),
    },
    EducationEntry {
        title: "Bachelor of Information Technology",
        subtitle: Some("Development of Information Systems"),
        institution: "Higher Institute of Technological Studies",
        location: "Jendouba",
        period: "2023",
        status: "Graduated",
        is_current: false,
        logo: Some("/assets/iset-logo.png"),
    },
    EducationEntry {
        title: "Baccalaureate of Experimental Science",
        subtitle: None,
        institution: "Liberty High School",
        location: "Jendouba",
        period: "2020",
        status: "Completed",
        is_current: false,
        logo: None,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Phone,
}

/// A contact line with a copy button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactChannel {
    pub kind: ChannelKind,
    /// Text shown on the page.
    pub display: &'static str,
    /// Text written to the clipboard.
    pub copy_text: &'static str,
    pub href: &'static str,
}

pub const EMAIL: ContactChannel = ContactChannel {
    kind: ChannelKind::Email,
    display: "abidi.achref030@gmail.com",
    copy_text: "abidi.achref030@gmail.com",
    href: "mailto:abidi.achref030@gmail.com",
};

pub const PHONE: ContactChannel = ContactChannel {
    kind: ChannelKind::Phone,
    display: "+216 93 020 718",
    copy_text: "+21693020718",
    href: "tel:+21693020718",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub label: &'static str,
    pub href: &'static str,
    /// Icon font class.
    pub icon: &'static str,
}

pub const SOCIALS: [SocialLink; 2] = [
    SocialLink {
        label: "GitHub",
        href: "https://github.com/Achref9",
        icon: "devicon-github-plain",
    },
    SocialLink {
        label: "LinkedIn",
        href: "https://www.linkedin.com/in/achref-abidi-/",
        icon: "devicon-linkedin-plain",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub summary: &'static str,
    pub stack: &'static [&'static str],
    pub href: Option<&'static str>,
}

pub const PROJECTS: [Project; 3] = [
    Project {
        title: "Portfolio",
        summary: "This site: a single page of scroll-revealed sections with a small animation engine underneath.",
        stack: &["Rust", "Leptos", "Tailwind CSS"],
        href: Some("https://github.com/Achref9"),
    },
    Project {
        title: "Information System Dashboard",
        summary: "Final-year bachelor project: management dashboard for an information system, from data model to web front end.",
        stack: &["TypeScript", "React", "SQL"],
        href: None,
    },
    Project {
        title: "Interactive Media Experiments",
        summary: "Multimedia coursework exploring motion design, 3D scenes and interactive storytelling in the browser.",
        stack: &["JavaScript", "WebGL", "Blender"],
        href: None,
    },
];

pub const HERO_TAGLINE: &str = "Engineering student crafting interactive, animated experiences for the web.";

pub const ABOUT: [&str; 2] = [
    "I am a Computer Science and Multimedia engineering student in Manouba, finishing my degree in 2026.",
    "I like the place where software meets design: interfaces that move with intent, and the code that keeps them fast.",
];

pub const SKILLS: [&str; 8] = [
    "Rust",
    "TypeScript",
    "React",
    "Leptos",
    "SQL",
    "Motion design",
    "UI/UX",
    "Git",
];

/// schema.org `Person` for the document head.
pub fn structured_data() -> serde_json::Value {
    serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": OWNER,
        "jobTitle": ROLE,
        "email": EMAIL.href,
        "telephone": PHONE.copy_text,
        "sameAs": SOCIALS.iter().map(|s| s.href).collect::<Vec<_>>(),
        "alumniOf": EDUCATION
            .iter()
            .filter(|e| !e.is_current)
            .map(|e| serde_json::json!({ "@type": "EducationalOrganization", "name": e.institution }))
            .collect::<Vec<_>>(),
    })
}
