//! Resume document model, the single aggregate edited during a session.
//!
//! Every edit is a pure transformation: `apply` takes `&self` and returns a new
//! document, leaving the original untouched. The editor swaps the value in
//! under its write lock.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Id given to the placeholder entries of a fresh document.
const INITIAL_ENTRY_ID: &str = "1";

#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("{section} entry '{id}' not found")]
    EntryNotFound { section: &'static str, id: String },

    #[error("skill index {index} out of range (len {len})")]
    SkillIndexOutOfRange { index: usize, len: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalField {
    Name,
    Email,
    Phone,
    Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update for an education entry. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub year: Option<String>,
}

/// Partial update for an experience entry. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

/// The full resume. Serialized in camelCase, which is also the body shipped
/// to the persistence endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// A single edit, as submitted by the editing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DocumentEdit {
    SetPersonal { field: PersonalField, value: String },
    AddEducation,
    UpdateEducation { id: String, patch: EducationPatch },
    RemoveEducation { id: String },
    AddExperience,
    UpdateExperience { id: String, patch: ExperiencePatch },
    RemoveExperience { id: String },
    AddSkill,
    SetSkill { index: usize, value: String },
    RemoveSkill { index: usize },
    SetSummary { value: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Existence predicates
// ────────────────────────────────────────────────────────────────────────────

/// True when the text carries something other than whitespace.
pub fn is_present(text: &str) -> bool {
    !text.trim().is_empty()
}

impl EducationEntry {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            school: String::new(),
            degree: String::new(),
            year: String::new(),
        }
    }

    /// An entry exists once any of its fields is non-blank.
    pub fn exists(&self) -> bool {
        [&self.school, &self.degree, &self.year]
            .into_iter()
            .any(|f| is_present(f))
    }

    fn patched(&self, patch: &EducationPatch) -> Self {
        Self {
            id: self.id.clone(),
            school: patch.school.clone().unwrap_or_else(|| self.school.clone()),
            degree: patch.degree.clone().unwrap_or_else(|| self.degree.clone()),
            year: patch.year.clone().unwrap_or_else(|| self.year.clone()),
        }
    }
}

impl ExperienceEntry {
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            company: String::new(),
            position: String::new(),
            duration: String::new(),
            description: String::new(),
        }
    }

    /// An entry exists once any of its fields is non-blank.
    pub fn exists(&self) -> bool {
        [&self.company, &self.position, &self.duration, &self.description]
            .into_iter()
            .any(|f| is_present(f))
    }

    fn patched(&self, patch: &ExperiencePatch) -> Self {
        Self {
            id: self.id.clone(),
            company: patch.company.clone().unwrap_or_else(|| self.company.clone()),
            position: patch.position.clone().unwrap_or_else(|| self.position.clone()),
            duration: patch.duration.clone().unwrap_or_else(|| self.duration.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
        }
    }
}

fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Document operations
// ────────────────────────────────────────────────────────────────────────────

impl Default for ResumeDocument {
    /// A fresh document: one blank education entry, one blank experience
    /// entry, one blank skill.
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            education: vec![EducationEntry::blank(INITIAL_ENTRY_ID)],
            experience: vec![ExperienceEntry::blank(INITIAL_ENTRY_ID)],
            skills: vec![String::new()],
            summary: String::new(),
        }
    }
}

impl ResumeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one edit and returns the resulting document.
    pub fn apply(&self, edit: &DocumentEdit) -> Result<Self, DocumentError> {
        match edit {
            DocumentEdit::SetPersonal { field, value } => Ok(self.set_personal(*field, value)),
            DocumentEdit::AddEducation => Ok(self.add_education()),
            DocumentEdit::UpdateEducation { id, patch } => self.update_education(id, patch),
            DocumentEdit::RemoveEducation { id } => self.remove_education(id),
            DocumentEdit::AddExperience => Ok(self.add_experience()),
            DocumentEdit::UpdateExperience { id, patch } => self.update_experience(id, patch),
            DocumentEdit::RemoveExperience { id } => self.remove_experience(id),
            DocumentEdit::AddSkill => Ok(self.add_skill()),
            DocumentEdit::SetSkill { index, value } => self.set_skill(*index, value),
            DocumentEdit::RemoveSkill { index } => self.remove_skill(*index),
            DocumentEdit::SetSummary { value } => Ok(self.set_summary(value)),
        }
    }

    pub fn set_personal(&self, field: PersonalField, value: &str) -> Self {
        let mut personal_info = self.personal_info.clone();
        let slot = match field {
            PersonalField::Name => &mut personal_info.name,
            PersonalField::Email => &mut personal_info.email,
            PersonalField::Phone => &mut personal_info.phone,
            PersonalField::Address => &mut personal_info.address,
        };
        *slot = value.to_string();
        Self {
            personal_info,
            ..self.clone()
        }
    }

    pub fn set_summary(&self, value: &str) -> Self {
        Self {
            summary: value.to_string(),
            ..self.clone()
        }
    }

    pub fn add_education(&self) -> Self {
        let mut education = self.education.clone();
        education.push(EducationEntry::blank(new_entry_id()));
        Self {
            education,
            ..self.clone()
        }
    }

    pub fn update_education(&self, id: &str, patch: &EducationPatch) -> Result<Self, DocumentError> {
        let index = position_of(&self.education, id, |e| &e.id, "education")?;
        let mut education = self.education.clone();
        education[index] = self.education[index].patched(patch);
        Ok(Self {
            education,
            ..self.clone()
        })
    }

    pub fn remove_education(&self, id: &str) -> Result<Self, DocumentError> {
        let index = position_of(&self.education, id, |e| &e.id, "education")?;
        let mut education = self.education.clone();
        education.remove(index);
        if education.is_empty() {
            education.push(EducationEntry::blank(new_entry_id()));
        }
        Ok(Self {
            education,
            ..self.clone()
        })
    }

    pub fn add_experience(&self) -> Self {
        let mut experience = self.experience.clone();
        experience.push(ExperienceEntry::blank(new_entry_id()));
        Self {
            experience,
            ..self.clone()
        }
    }

    pub fn update_experience(
        &self,
        id: &str,
        patch: &ExperiencePatch,
    ) -> Result<Self, DocumentError> {
        let index = position_of(&self.experience, id, |e| &e.id, "experience")?;
        let mut experience = self.experience.clone();
        experience[index] = self.experience[index].patched(patch);
        Ok(Self {
            experience,
            ..self.clone()
        })
    }

    pub fn remove_experience(&self, id: &str) -> Result<Self, DocumentError> {
        let index = position_of(&self.experience, id, |e| &e.id, "experience")?;
        let mut experience = self.experience.clone();
        experience.remove(index);
        if experience.is_empty() {
            experience.push(ExperienceEntry::blank(new_entry_id()));
        }
        Ok(Self {
            experience,
            ..self.clone()
        })
    }

    pub fn add_skill(&self) -> Self {
        let mut skills = self.skills.clone();
        skills.push(String::new());
        Self {
            skills,
            ..self.clone()
        }
    }

    pub fn set_skill(&self, index: usize, value: &str) -> Result<Self, DocumentError> {
        self.check_skill_index(index)?;
        let mut skills = self.skills.clone();
        skills[index] = value.to_string();
        Ok(Self {
            skills,
            ..self.clone()
        })
    }

    pub fn remove_skill(&self, index: usize) -> Result<Self, DocumentError> {
        self.check_skill_index(index)?;
        let mut skills = self.skills.clone();
        skills.remove(index);
        if skills.is_empty() {
            skills.push(String::new());
        }
        Ok(Self {
            skills,
            ..self.clone()
        })
    }

    fn check_skill_index(&self, index: usize) -> Result<(), DocumentError> {
        if index < self.skills.len() {
            Ok(())
        } else {
            Err(DocumentError::SkillIndexOutOfRange {
                index,
                len: self.skills.len(),
            })
        }
    }
}

fn position_of<T>(
    entries: &[T],
    id: &str,
    id_of: impl Fn(&T) -> &String,
    section: &'static str,
) -> Result<usize, DocumentError> {
    entries
        .iter()
        .position(|e| id_of(e) == id)
        .ok_or_else(|| DocumentError::EntryNotFound {
            section,
            id: id.to_string(),
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
