//! Folding a lookup result into the parent section of the form.

use crate::{
    models::parent::{ParentDraft, ParentRecord},
    services::lookup::LookupResult,
};

pub const NOT_FOUND_GUIDANCE: &str = "Parent not found. You may enter details manually.";
pub const LOOKUP_FAILED: &str = "Error fetching parent data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational; the operator can carry on.
    Guidance,
    Error,
}

/// A message attached to the form for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn guidance(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Guidance,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Merged {
    pub parent: ParentDraft,
    pub notice: Option<Notice>,
}

/// Merges a lookup result into the parent draft.
///
/// `Found` overwrites the fields the registry owns and nothing else; the CNIC,
/// username, password, gender, date of birth and picture keep their local
/// values. `NotFound` and `Error` leave the draft untouched and only attach a
/// notice. The student draft is never an input: lookups cannot reach it.
pub fn merge(parent: ParentDraft, result: &LookupResult) -> Merged {
    match result {
        LookupResult::Found(record) => Merged {
            parent: apply_record(parent, record),
            notice: None,
        },
        LookupResult::NotFound => Merged {
            parent,
            notice: Some(Notice::guidance(NOT_FOUND_GUIDANCE)),
        },
        LookupResult::Error(e) => {
            tracing::debug!("Keeping parent draft after failed lookup: {}", e);
            Merged {
                parent,
                notice: Some(Notice::error(LOOKUP_FAILED)),
            }
        }
    }
}

fn apply_record(mut parent: ParentDraft, record: &ParentRecord) -> ParentDraft {
    parent.full_name = record.full_name.clone();
    parent.phone_number = record.phone_number.clone().unwrap_or_default();
    parent.email = record.email.clone().unwrap_or_default();
    parent.address = record.address.clone().unwrap_or_default();
    parent.relation = record.relation.clone();
    parent.occupation = record.occupation.clone();
    parent.qualification = record.qualification.clone();
    parent.status = record.status;
    parent.child_ids = record.child_ids.clone();
    parent.linked = true;
    parent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::models::parent::RecordStatus;

    fn typed_draft() -> ParentDraft {
        ParentDraft {
            cnic: "12345-6789012-3".into(),
            full_name: "Typed Name".into(),
            username: "akhan".into(),
            password: "s3cret".into(),
            phone_number: "0300-1111111".into(),
            address: "House 1".into(),
            relation: "Father".into(),
            ..ParentDraft::default()
        }
    }

    fn ali_khan() -> ParentRecord {
        ParentRecord {
            cnic: "12345-6789012-3".into(),
            full_name: "Ali Khan".into(),
            phone_number: None,
            email: Some("ali@example.com".into()),
            address: Some("Street 9, Lahore".into()),
            relation: "Father".into(),
            occupation: "Engineer".into(),
            qualification: "BSc".into(),
            status: RecordStatus::Blocked,
            child_ids: vec!["s1".into()],
        }
    }

    #[test]
    fn found_overwrites_only_registry_owned_fields() {
        let before = typed_draft();
        let merged = merge(before.clone(), &LookupResult::Found(ali_khan()));
        let after = merged.parent;

        assert_eq!(after.full_name, "Ali Khan");
        assert_eq!(after.phone_number, "");
        assert_eq!(after.email, "ali@example.com");
        assert_eq!(after.status, RecordStatus::Blocked);
        assert_eq!(after.child_ids, vec!["s1"]);
        assert!(after.linked);

        assert_eq!(after.cnic, before.cnic);
        assert_eq!(after.username, before.username);
        assert_eq!(after.password, before.password);
        assert_eq!(after.gender, before.gender);
        assert!(merged.notice.is_none());
    }

    #[test]
    fn negative_results_leave_the_draft_alone() {
        let before = typed_draft();

        let merged = merge(before.clone(), &LookupResult::NotFound);
        assert_eq!(merged.parent, before);
        assert_eq!(merged.notice, Some(Notice::guidance(NOT_FOUND_GUIDANCE)));

        let failed = LookupResult::Error(LookupError::Transport("connection refused".into()));
        let merged = merge(before.clone(), &failed);
        assert_eq!(merged.parent, before);
        assert_eq!(merged.notice, Some(Notice::error(LOOKUP_FAILED)));

        // Idempotent: merging again changes nothing.
        let again = merge(merged.parent.clone(), &failed);
        assert_eq!(again.parent, before);
    }
}
