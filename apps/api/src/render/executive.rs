//! Executive layout: formal two-column contact block, uppercase section labels,
//! justified body text, separators between experience entries.

use crate::models::resume::{is_present, ResumeDocument};
use crate::render::node::{el, Element, Node};
use crate::render::{contact_items, display_name, heading_pair, visible_skills};

pub fn render(document: &ResumeDocument) -> Node {
    let contacts = contact_items(document).into_iter().map(|(label, value)| {
        // Address spans both columns.
        let class = if label == "Address" { "col-span-2" } else { "" };
        el("div").class(class).text(format!("{label}: {value}"))
    });

    let header = el("div")
        .class("mb-8")
        .child(
            el("h1")
                .class("text-4xl font-bold text-gray-900 mb-4 tracking-wide")
                .text(display_name(document, "YOUR NAME")),
        )
        .child(
            el("div")
                .class("grid grid-cols-2 gap-4 text-gray-600 text-sm")
                .children(contacts),
        );

    el("div")
        .class("bg-white p-8 shadow-lg rounded-lg min-h-[800px] border-t-4 border-gray-900")
        .child(header)
        .child(separator("mb-8"))
        .child_opt(summary_section(document))
        .child_opt(experience_section(document))
        .child_opt(education_section(document))
        .child_opt(competencies_section(document))
        .into()
}

fn separator(class: &str) -> Element {
    let class = format!("separator {class}");
    el("hr").class(class.trim())
}

fn section(label: &str) -> Element {
    el("div").class("mb-8").child(
        el("h2")
            .class("text-lg font-bold text-gray-900 mb-3 uppercase tracking-wide")
            .text(label),
    )
}

fn summary_section(document: &ResumeDocument) -> Option<Element> {
    is_present(&document.summary).then(|| {
        section("Executive Summary").child(
            el("p")
                .class("text-gray-700 leading-relaxed text-justify")
                .text(document.summary.as_str()),
        )
    })
}

fn experience_section(document: &ResumeDocument) -> Option<Element> {
    if document.experience.is_empty() {
        return None;
    }

    let last = document.experience.len() - 1;
    let rows = document.experience.iter().enumerate().map(|(index, exp)| {
        let description = is_present(&exp.description).then(|| {
            el("p")
                .class("text-gray-700 leading-relaxed text-justify")
                .text(exp.description.as_str())
        });

        el("div")
            .child(
                el("div")
                    .class("flex justify-between items-start mb-2")
                    .child(heading_pair(
                        &exp.position,
                        "font-bold text-gray-900 text-lg",
                        &exp.company,
                        "text-gray-700 font-medium",
                    ))
                    .child(
                        el("div")
                            .class("text-right text-gray-600 font-medium")
                            .text(exp.duration.as_str()),
                    ),
            )
            .child_opt(description)
            .child_opt((index < last).then(|| separator("mt-4")))
    });

    Some(section("Professional Experience").child(el("div").class("space-y-6").children(rows)))
}

fn education_section(document: &ResumeDocument) -> Option<Element> {
    if document.education.is_empty() {
        return None;
    }

    let rows = document.education.iter().map(|edu| {
        el("div")
            .class("flex justify-between items-start")
            .child(heading_pair(
                &edu.degree,
                "font-bold text-gray-900",
                &edu.school,
                "text-gray-700",
            ))
            .child(
                el("span")
                    .class("text-gray-600 font-medium")
                    .text(edu.year.as_str()),
            )
    });

    Some(section("Education").child(el("div").class("space-y-3").children(rows)))
}

fn competencies_section(document: &ResumeDocument) -> Option<Element> {
    if document.skills.is_empty() {
        return None;
    }

    let items = visible_skills(document).map(|skill| el("div").class("text-sm text-gray-700").text(skill));

    Some(section("Core Competencies").child(el("div").class("grid grid-cols-2 gap-2").children(items)))
}
