use serde::{Deserialize, Serialize};

/// Class reference data owned by the class-listing service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassRef {
    pub id: String,
    pub name: String,
}

impl ClassRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Offered when the class listing cannot be fetched.
pub fn fallback_classes() -> Vec<ClassRef> {
    (1..=4)
        .map(|n| ClassRef::new(n.to_string(), format!("Class {n}")))
        .collect()
}
