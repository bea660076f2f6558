use std::fmt;

use bytes::Bytes;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::parent::RecordStatus;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// An attached profile picture. The content is opaque here; only the file
/// name travels in registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ProfileImage {
    pub file_name: String,
    pub content: Option<Bytes>,
}

impl From<String> for ProfileImage {
    fn from(file_name: String) -> Self {
        Self {
            file_name,
            content: None,
        }
    }
}

impl From<ProfileImage> for String {
    fn from(image: ProfileImage) -> Self {
        image.file_name
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Student section of the registration form. Nothing here is persisted
/// until the compound submission succeeds.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentDraft {
    /// Known only when editing an existing student.
    pub id: Option<String>,
    pub full_name: String,
    pub username: String,
    pub password: String,
    pub phone_number: String,
    pub email: String,
    pub gender: Gender,
    pub dob: Option<NaiveDate>,
    pub profile_image: Option<ProfileImage>,
    pub address: String,
    pub emergency_contact: String,
    pub roll_number: String,
    pub class_id: String,
    pub admission_date: NaiveDate,
    pub status: RecordStatus,
    #[serde(skip)]
    father: String,
}

impl Default for StudentDraft {
    fn default() -> Self {
        Self {
            id: None,
            full_name: String::new(),
            username: String::new(),
            password: String::new(),
            phone_number: String::new(),
            email: String::new(),
            gender: Gender::default(),
            dob: None,
            profile_image: None,
            address: String::new(),
            emergency_contact: String::new(),
            roll_number: String::new(),
            class_id: String::new(),
            admission_date: today(),
            status: RecordStatus::default(),
            father: String::new(),
        }
    }
}

impl StudentDraft {
    /// Draft with the account fields filled in and everything else blank.
    pub fn new(
        full_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// CNIC of the parent this student was last linked to.
    pub fn father(&self) -> &str {
        &self.father
    }

    pub(crate) fn link_father(&mut self, cnic: &str) {
        self.father = cnic.to_string();
    }
}

impl fmt::Debug for StudentDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudentDraft")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("roll_number", &self.roll_number)
            .field("class_id", &self.class_id)
            .field("admission_date", &self.admission_date)
            .field("father", &self.father)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// A student as stored by the registration service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub full_name: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub phone_number: String,
    pub email: String,
    pub gender: Gender,
    pub dob: Option<NaiveDate>,
    pub profile_image: Option<String>,
    pub address: String,
    pub emergency_contact: String,
    pub roll_number: String,
    pub class_id: String,
    pub admission_date: NaiveDate,
    pub father_id: String,
    pub status: RecordStatus,
}

/// One page of the student listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPage {
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub students: Vec<StudentRecord>,
}
