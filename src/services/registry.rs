//! In-memory registry behind the reference API.
//!
//! A compound registration is checked in full before anything is written, and
//! all writes happen under one lock, so either both records land or neither.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    class::ClassRef,
    parent::{is_valid_cnic, ParentRecord, CNIC_MAX_LEN},
    registration::{ParentPayload, RegisterRequest, StudentPayload, UpdateStudentRequest},
    student::StudentRecord,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),
}

#[derive(Debug)]
struct StoredParent {
    record: ParentRecord,
    username: String,
    password: String,
}

#[derive(Debug, Default)]
struct Inner {
    parents: HashMap<String, StoredParent>,
    students: Vec<StudentRecord>,
}

/// Result of a successful compound registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub student_id: String,
    pub child_ids: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Registry {
    classes: Vec<ClassRef>,
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new(classes: Vec<ClassRef>) -> Self {
        Self {
            classes,
            inner: RwLock::default(),
        }
    }

    pub fn classes(&self) -> &[ClassRef] {
        &self.classes
    }

    pub async fn find_parent(&self, cnic: &str) -> Option<ParentRecord> {
        let inner = self.inner.read().await;
        inner.parents.get(cnic).map(|p| p.record.clone())
    }

    pub async fn find_student(&self, id: &str) -> Option<StudentRecord> {
        let inner = self.inner.read().await;
        inner.students.iter().find(|s| s.id == id).cloned()
    }

    /// Total number of students and the requested slice, in registration order.
    pub async fn students(&self, offset: usize, limit: usize) -> (usize, Vec<StudentRecord>) {
        let inner = self.inner.read().await;
        let slice = inner.students.iter().skip(offset).take(limit).cloned().collect();
        (inner.students.len(), slice)
    }

    /// Creates the student and creates or refreshes the parent, then links them.
    pub async fn register(&self, req: RegisterRequest) -> Result<Registered, RegistryError> {
        let RegisterRequest { parent, student } = req;

        let cnic = parent.cnic.clone().unwrap_or_default();
        if !is_valid_cnic(&cnic) {
            return Err(RegistryError::Invalid(format!(
                "Parent CNIC is required (at most {CNIC_MAX_LEN} characters)"
            )));
        }
        let username = required(&student.username, "Student username is required")?;
        let password = required(&student.password, "Student password is required")?;
        check_names(&student, &parent)?;
        if student.father_id != cnic {
            return Err(RegistryError::Invalid(format!(
                "Student must be linked to parent {cnic}"
            )));
        }

        let mut inner = self.inner.write().await;
        let Inner { parents, students } = &mut *inner;

        if students.iter().any(|s| s.username == username) {
            return Err(RegistryError::Conflict(format!(
                "Username {username} is already taken"
            )));
        }

        let new_parent = match parents.get(&cnic) {
            Some(_) => None,
            None => {
                let parent_username =
                    required(&parent.username, "Parent username is required")?;
                let parent_password =
                    required(&parent.password, "Parent password is required")?;
                if parents.values().any(|p| p.username == parent_username) {
                    return Err(RegistryError::Conflict(format!(
                        "Username {parent_username} is already taken"
                    )));
                }
                Some((parent_username, parent_password))
            }
        };

        // Everything is checked; nothing below can fail.
        let student_id = Uuid::new_v4().to_string();
        let stored = parents.entry(cnic.clone()).or_insert_with(|| {
            let (username, password) = new_parent.unwrap_or_default();
            let mut seen = HashSet::new();
            let child_ids = parent
                .child_ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .cloned()
                .collect();
            StoredParent {
                record: ParentRecord {
                    cnic: cnic.clone(),
                    full_name: String::new(),
                    phone_number: None,
                    email: None,
                    address: None,
                    relation: String::new(),
                    occupation: String::new(),
                    qualification: String::new(),
                    status: parent.status,
                    child_ids,
                },
                username,
                password,
            }
        });

        apply_parent_details(stored, &parent);
        if !stored.record.child_ids.contains(&student_id) {
            stored.record.child_ids.push(student_id.clone());
        }
        let child_ids = stored.record.child_ids.clone();

        let mut record = StudentRecord {
            id: student_id.clone(),
            full_name: String::new(),
            username,
            password,
            phone_number: String::new(),
            email: String::new(),
            gender: student.gender,
            dob: None,
            profile_image: None,
            address: String::new(),
            emergency_contact: String::new(),
            roll_number: String::new(),
            class_id: String::new(),
            admission_date: student.admission_date,
            father_id: cnic.clone(),
            status: student.status,
        };
        apply_student_details(&mut record, &student);
        students.push(record);

        tracing::info!("Registered student {} under parent {}", student_id, cnic);
        Ok(Registered {
            student_id,
            child_ids,
        })
    }

    /// Whether `username` and `password` match a stored parent account.
    pub async fn check_parent_login(&self, username: &str, password: &str) -> bool {
        let inner = self.inner.read().await;
        inner
            .parents
            .values()
            .any(|p| p.username == username && p.password == password)
    }

    /// Updates an existing student and its parent. Identifiers are taken from
    /// the route, never from the body; absent passwords stay as they are.
    pub async fn update_student(
        &self,
        id: &str,
        parent_cnic: &str,
        req: UpdateStudentRequest,
    ) -> Result<StudentRecord, RegistryError> {
        let UpdateStudentRequest { student, parent } = req;
        check_names(&student, &parent)?;

        let mut inner = self.inner.write().await;
        let Inner { parents, students } = &mut *inner;

        let record = students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| RegistryError::NotFound(format!("Student {id} not found")))?;
        if record.father_id != parent_cnic {
            return Err(RegistryError::Conflict(format!(
                "Student {id} is not linked to parent {parent_cnic}"
            )));
        }
        let stored = parents
            .get_mut(parent_cnic)
            .ok_or_else(|| RegistryError::NotFound(format!("Parent {parent_cnic} not found")))?;

        apply_student_details(record, &student);
        record.admission_date = student.admission_date;
        if let Some(password) = student.password.filter(|p| !p.is_empty()) {
            record.password = password;
        }

        apply_parent_details(stored, &parent);
        if let Some(password) = parent.password.filter(|p| !p.is_empty()) {
            stored.password = password;
        }
        if !stored.record.child_ids.iter().any(|c| c == id) {
            stored.record.child_ids.push(id.to_string());
        }

        tracing::info!("Updated student {} and parent {}", id, parent_cnic);
        Ok(record.clone())
    }
}

fn required(value: &Option<String>, message: &str) -> Result<String, RegistryError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RegistryError::Invalid(message.to_string()))
}

fn check_names(student: &StudentPayload, parent: &ParentPayload) -> Result<(), RegistryError> {
    if student.full_name.trim().is_empty() {
        return Err(RegistryError::Invalid("Student full name is required".into()));
    }
    if parent.full_name.trim().is_empty() {
        return Err(RegistryError::Invalid("Parent full name is required".into()));
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn apply_parent_details(stored: &mut StoredParent, payload: &ParentPayload) {
    let record = &mut stored.record;
    record.full_name = payload.full_name.trim().to_string();
    record.phone_number = optional(&payload.phone_number);
    record.email = optional(&payload.email);
    record.address = optional(&payload.address);
    record.relation = payload.relation.clone();
    record.occupation = payload.occupation.clone();
    record.qualification = payload.qualification.clone();
    record.status = payload.status;
}

fn apply_student_details(record: &mut StudentRecord, payload: &StudentPayload) {
    record.full_name = payload.full_name.trim().to_string();
    record.phone_number = payload.phone_number.clone();
    record.email = payload.email.clone();
    record.gender = payload.gender;
    record.dob = payload.dob;
    record.profile_image = payload.profile_image.clone();
    record.address = payload.address.clone();
    record.emergency_contact = payload.emergency_contact.clone();
    record.roll_number = payload.roll_number.clone();
    record.class_id = payload.class_id.clone();
    record.status = payload.status;
}
