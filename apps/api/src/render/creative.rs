//! Creative layout: one card per section, accent colors, badge-style dates.
//!
//! List sections are gated on list length only, so placeholder entries still
//! produce (empty-looking) cards. The modern layout hides them.

use crate::models::resume::{is_present, ResumeDocument};
use crate::render::node::{el, Element, Node};
use crate::render::{contact_items, display_name, heading_pair, visible_skills};

const CARD: &str = "mb-8 bg-white p-6 rounded-lg shadow-sm";
const OUTLINE_BADGE: &str = "badge badge-outline text-purple-600 border-purple-300";

pub fn render(document: &ResumeDocument) -> Node {
    let contacts = contact_items(document)
        .into_iter()
        .map(|(_, value)| el("span").text(value));

    let header = el("div")
        .class("text-center mb-8 bg-white p-6 rounded-lg shadow-sm")
        .child(
            el("h1")
                .class("text-4xl font-bold bg-gradient-to-r from-purple-600 to-pink-600 bg-clip-text text-transparent mb-2")
                .text(display_name(document, "Your Name")),
        )
        .child(
            el("div")
                .class("flex flex-wrap justify-center gap-4 text-gray-600")
                .children(contacts),
        );

    el("div")
        .class("bg-gradient-to-br from-purple-50 to-pink-50 p-8 shadow-lg rounded-lg min-h-[800px]")
        .child(header)
        .child_opt(about_card(document))
        .child_opt(experience_card(document))
        .child_opt(education_card(document))
        .child_opt(skills_card(document))
        .into()
}

fn card(title: &str) -> Element {
    el("div").class(CARD).child(
        el("h2")
            .class("text-xl font-bold text-purple-600 mb-3")
            .text(title),
    )
}

fn about_card(document: &ResumeDocument) -> Option<Element> {
    is_present(&document.summary).then(|| {
        card("✨ ABOUT ME").child(
            el("p")
                .class("text-gray-700 leading-relaxed")
                .text(document.summary.as_str()),
        )
    })
}

fn experience_card(document: &ResumeDocument) -> Option<Element> {
    if document.experience.is_empty() {
        return None;
    }

    let rows = document.experience.iter().map(|exp| {
        let description = is_present(&exp.description).then(|| {
            el("p")
                .class("text-gray-700 text-sm")
                .text(exp.description.as_str())
        });

        el("div")
            .class("border-l-4 border-purple-300 pl-4")
            .child(
                el("div")
                    .class("flex justify-between mb-2")
                    .child(heading_pair(
                        &exp.position,
                        "font-bold text-gray-900",
                        &exp.company,
                        "text-purple-600 font-medium",
                    ))
                    .child(el("span").class(OUTLINE_BADGE).text(exp.duration.as_str())),
            )
            .child_opt(description)
    });

    Some(card("🚀 EXPERIENCE").child(el("div").class("space-y-4").children(rows)))
}

fn education_card(document: &ResumeDocument) -> Option<Element> {
    if document.education.is_empty() {
        return None;
    }

    let rows = document.education.iter().map(|edu| {
        el("div")
            .class("flex justify-between")
            .child(heading_pair(
                &edu.degree,
                "font-bold text-gray-900",
                &edu.school,
                "text-gray-700",
            ))
            .child(el("span").class(OUTLINE_BADGE).text(edu.year.as_str()))
    });

    Some(card("🎓 EDUCATION").child(el("div").class("space-y-3").children(rows)))
}

fn skills_card(document: &ResumeDocument) -> Option<Element> {
    if document.skills.is_empty() {
        return None;
    }

    let badges = visible_skills(document).map(|skill| {
        el("span")
            .class("badge bg-gradient-to-r from-purple-600 to-pink-600 text-white")
            .text(skill)
    });

    Some(card("💎 SKILLS").child(el("div").class("flex flex-wrap gap-2").children(badges)))
}
