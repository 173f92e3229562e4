// Template rendering: ResumeDocument → visual tree.
// Renderers are pure functions; they never touch the editor session.

pub mod creative;
pub mod executive;
pub mod html;
pub mod modern;
pub mod node;

use serde::{Deserialize, Serialize};

use crate::models::resume::{is_present, ResumeDocument};
use node::{el, Element, Node};

/// Id of the element wrapping the live preview; the export action rasterizes it.
pub const PREVIEW_ELEMENT_ID: &str = "resume-preview";

/// The closed set of layouts. Unknown tags fall back to `Modern`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    #[default]
    Modern,
    Creative,
    Executive,
}

impl TemplateId {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "creative" => TemplateId::Creative,
            "executive" => TemplateId::Executive,
            _ => TemplateId::Modern,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Creative => "creative",
            TemplateId::Executive => "executive",
        }
    }
}

/// Renders the document with the chosen layout.
pub fn render(document: &ResumeDocument, template: TemplateId) -> Node {
    match template {
        TemplateId::Creative => creative::render(document),
        TemplateId::Executive => executive::render(document),
        TemplateId::Modern => modern::render(document),
    }
}

/// Renders the layout inside the preview card, wrapped by the element the
/// export action looks up.
pub fn render_preview(document: &ResumeDocument, template: TemplateId) -> Node {
    let card = el("div")
        .class("card overflow-hidden")
        .child(
            el("div").class("card-header").child(
                el("h3")
                    .class("card-title flex items-center justify-between")
                    .text("Resume Preview")
                    .child(
                        el("span")
                            .class("badge badge-secondary capitalize")
                            .text(format!("{} Template", template.as_str())),
                    ),
            ),
        )
        .child(
            el("div")
                .class("card-content p-0 max-h-[800px] overflow-y-auto")
                .child(render(document, template)),
        );

    el("div").id(PREVIEW_ELEMENT_ID).child(card).into()
}

/// Full HTML page for the preview, titled after the person.
pub fn render_page_html(document: &ResumeDocument, template: TemplateId) -> String {
    let title = if is_present(&document.personal_info.name) {
        format!("{} — Resume", document.personal_info.name.trim())
    } else {
        "Resume".to_string()
    };
    html::to_html_document(&title, &render_preview(document, template))
}

/// Contact items that are present, in display order: email, phone, address.
pub(crate) fn contact_items(document: &ResumeDocument) -> Vec<(&'static str, &str)> {
    let info = &document.personal_info;
    [
        ("Email", info.email.as_str()),
        ("Phone", info.phone.as_str()),
        ("Address", info.address.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| is_present(value))
    .collect()
}

/// The person's name, or `fallback` when blank.
pub(crate) fn display_name<'a>(document: &'a ResumeDocument, fallback: &'a str) -> &'a str {
    if is_present(&document.personal_info.name) {
        &document.personal_info.name
    } else {
        fallback
    }
}

/// Skills with blank entries removed.
pub(crate) fn visible_skills(document: &ResumeDocument) -> impl Iterator<Item = &str> {
    document
        .skills
        .iter()
        .map(String::as_str)
        .filter(|s| is_present(s))
}

/// Position + company block shared by the experience rows of every layout.
pub(crate) fn heading_pair(
    title: &str,
    title_class: &str,
    subtitle: &str,
    subtitle_class: &str,
) -> Element {
    el("div")
        .child(el("h3").class(title_class).text(title))
        .child(el("p").class(subtitle_class).text(subtitle))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo, ResumeDocument};

    /// Jane Doe, one job, one degree, two skills, a summary.
    pub fn jane_doe() -> ResumeDocument {
        ResumeDocument {
            personal_info: PersonalInfo {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-0100".to_string(),
                address: String::new(),
            },
            education: vec![EducationEntry {
                id: "1".to_string(),
                school: "State U".to_string(),
                degree: "BSc".to_string(),
                year: "2018".to_string(),
            }],
            experience: vec![ExperienceEntry {
                id: "1".to_string(),
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                duration: "2019 - 2024".to_string(),
                description: "Built things.".to_string(),
            }],
            skills: vec!["Go".to_string(), "Rust".to_string()],
            summary: "A skilled engineer.".to_string(),
        }
    }
}
