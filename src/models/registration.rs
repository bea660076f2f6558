use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::parent::RecordStatus;
use crate::models::student::Gender;

/// Student half of a compound submission. Identifier and password keys are
/// absent when they must not be changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub full_name: String,
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cnic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub gender: Gender,
    pub dob: Option<NaiveDate>,
    pub profile_image: Option<String>,
    pub address: String,
    pub qualification: String,
    pub status: RecordStatus,
    pub relation: String,
    pub occupation: String,
    pub child_ids: Vec<String>,
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub parent: ParentPayload,
    pub student: StudentPayload,
}

/// Body of `PUT /api/students/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateStudentRequest {
    pub student: StudentPayload,
    pub parent: ParentPayload,
}

/// Query string of `PUT /api/students/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudentQuery {
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub student_id: String,
    pub child_ids: Vec<String>,
}
