//! Audit entries for sensitive portal actions.

use crate::beneficiary::BeneficiaryId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Beneficiary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Review,
    Create,
    Update,
}

/// Who may read the entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    #[default]
    Internal,
}

/// An immutable log record of a search, registration or profile change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub description: String,
    pub subject_name: String,
    pub subject_kind: SubjectKind,
    pub action: AuditAction,
    pub subject_id: Option<BeneficiaryId>,
    pub note: Option<String>,
    pub visibility: Visibility,
}

impl AuditEntry {
    /// An internal entry about a beneficiary with no id or note attached.
    pub fn new(
        description: impl Into<String>,
        subject_name: impl Into<String>,
        action: AuditAction,
    ) -> Self {
        Self {
            description: description.into(),
            subject_name: subject_name.into(),
            subject_kind: SubjectKind::Beneficiary,
            action,
            subject_id: None,
            note: None,
            visibility: Visibility::default(),
        }
    }

    pub fn with_subject(mut self, id: BeneficiaryId) -> Self {
        self.subject_id = Some(id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}
