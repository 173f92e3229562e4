//! Modern layout: centered header, bordered section headings, tag-style skills.
//!
//! Sections are gated on field content: a list made only of blank entries is
//! hidden just like a missing one.

use crate::models::resume::{is_present, ResumeDocument};
use crate::render::node::{el, Element, Node};
use crate::render::{contact_items, display_name, heading_pair, visible_skills};

pub fn render(document: &ResumeDocument) -> Node {
    let contacts = contact_items(document)
        .into_iter()
        .map(|(_, value)| el("span").text(value));

    let header = el("div")
        .class("text-center mb-8")
        .child(
            el("h1")
                .class("text-4xl font-bold text-gray-900 mb-2")
                .text(display_name(document, "Your Name")),
        )
        .child(
            el("div")
                .class("flex flex-wrap justify-center gap-4 text-gray-600")
                .children(contacts),
        );

    el("div")
        .class("bg-white p-8 shadow-lg rounded-lg min-h-[800px]")
        .child(header)
        .child_opt(summary_section(document))
        .child_opt(experience_section(document))
        .child_opt(education_section(document))
        .child_opt(skills_section(document))
        .into()
}

fn section(title: &str) -> Element {
    el("div").class("mb-8").child(
        el("h2")
            .class("text-xl font-bold text-blue-600 mb-3 border-b-2 border-blue-600 pb-1")
            .text(title),
    )
}

fn summary_section(document: &ResumeDocument) -> Option<Element> {
    if !is_present(&document.summary) {
        return None;
    }
    Some(
        section("PROFESSIONAL SUMMARY").child(
            el("p")
                .class("text-gray-700 leading-relaxed")
                .text(document.summary.as_str()),
        ),
    )
}

fn experience_section(document: &ResumeDocument) -> Option<Element> {
    if !document.experience.iter().any(|e| e.exists()) {
        return None;
    }

    let rows = document.experience.iter().map(|exp| {
        let description = is_present(&exp.description).then(|| {
            el("p")
                .class("text-gray-700 text-sm")
                .text(exp.description.as_str())
        });

        el("div")
            .child(
                el("div")
                    .class("flex justify-between mb-2")
                    .child(heading_pair(
                        &exp.position,
                        "font-bold text-gray-900",
                        &exp.company,
                        "text-blue-600 font-medium",
                    ))
                    .child(
                        el("span")
                            .class("text-gray-600 text-sm text-right")
                            .text(exp.duration.as_str()),
                    ),
            )
            .child_opt(description)
    });

    Some(section("WORK EXPERIENCE").children(rows))
}

fn education_section(document: &ResumeDocument) -> Option<Element> {
    if !document.education.iter().any(|e| e.exists()) {
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
            .child(
                el("span")
                    .class("text-gray-600 text-sm")
                    .text(edu.year.as_str()),
            )
    });

    Some(section("EDUCATION").children(rows))
}

fn skills_section(document: &ResumeDocument) -> Option<Element> {
    let tags: Vec<Element> = visible_skills(document)
        .map(|skill| {
            el("span")
                .class("badge badge-secondary bg-blue-100 text-blue-800")
                .text(skill)
        })
        .collect();

    if tags.is_empty() {
        return None;
    }
    Some(section("SKILLS").child(el("div").class("flex flex-wrap gap-2").children(tags)))
}
