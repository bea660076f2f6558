use crate::{
    error::SubmissionError,
    models::{
        parent::{is_valid_cnic, ParentDraft},
        registration::{ParentPayload, RegisterRequest, StudentPayload, UpdateStudentRequest},
        student::StudentDraft,
    },
    services::api::{failure_message, ApiClient},
};

/// Whether a submission creates both records or edits existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update { student_id: String },
}

/// A fully built request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Register(RegisterRequest),
    Update {
        student_id: String,
        parent_cnic: String,
        body: UpdateStudentRequest,
    },
}

/// Sends student and parent together as one compound write.
///
/// The service is expected to apply both records or neither. When it does
/// not, a half-applied write is reported like any other failure; nothing is
/// rolled back from here.
#[derive(Debug, Clone)]
pub struct SubmissionCoordinator {
    api: ApiClient,
}

impl SubmissionCoordinator {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn submit(
        &self,
        student: &mut StudentDraft,
        parent: &ParentDraft,
        mode: &Mode,
    ) -> Result<(), SubmissionError> {
        let dispatch = prepare(student, parent, mode)?;

        let request = match &dispatch {
            Dispatch::Register(body) => self
                .api
                .http()
                .post(self.api.endpoint(&["api", "register"]))
                .json(body),
            Dispatch::Update {
                student_id,
                parent_cnic,
                body,
            } => {
                let mut url = self.api.endpoint(&["api", "students", student_id.as_str()]);
                url.query_pairs_mut().append_pair("parent", parent_cnic);
                self.api.http().put(url).json(body)
            }
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!("Registration request failed: {}", e);
            SubmissionError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Registration accepted for parent {} ({})", parent.cnic, status);
            return Ok(());
        }

        let message = failure_message(response).await;
        tracing::warn!("Registration rejected with {}: {}", status, message);
        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Links the student to the parent's current CNIC, checks required fields and
/// builds the outgoing request.
pub fn prepare(
    student: &mut StudentDraft,
    parent: &ParentDraft,
    mode: &Mode,
) -> Result<Dispatch, SubmissionError> {
    student.link_father(&parent.cnic);
    validate(student, parent, mode)?;

    match mode {
        Mode::Create => Ok(Dispatch::Register(RegisterRequest {
            parent: parent_payload(parent, mode),
            student: student_payload(student, mode),
        })),
        Mode::Update { student_id } => {
            let mut parent_body = parent_payload(parent, mode);
            if !parent_body.child_ids.contains(student_id) {
                parent_body.child_ids.push(student_id.clone());
            }
            Ok(Dispatch::Update {
                student_id: student_id.clone(),
                parent_cnic: parent.cnic.clone(),
                body: UpdateStudentRequest {
                    student: student_payload(student, mode),
                    parent: parent_body,
                },
            })
        }
    }
}

fn validate(
    student: &StudentDraft,
    parent: &ParentDraft,
    mode: &Mode,
) -> Result<(), SubmissionError> {
    let mut missing = Vec::new();
    let blank = |s: &str| s.trim().is_empty();

    if blank(&student.full_name) {
        missing.push("student.fullName");
    }
    if !is_valid_cnic(&parent.cnic) {
        missing.push("parent.cnic");
    }
    if blank(&parent.full_name) {
        missing.push("parent.fullName");
    }
    if blank(&parent.address) {
        missing.push("parent.address");
    }

    if *mode == Mode::Create {
        if blank(&student.username) {
            missing.push("student.username");
        }
        if student.password.is_empty() {
            missing.push("student.password");
        }
        if !parent.linked {
            if blank(&parent.username) {
                missing.push("parent.username");
            }
            if parent.password.is_empty() {
                missing.push("parent.password");
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SubmissionError::Validation(missing))
    }
}

fn changed_password(password: &str) -> Option<String> {
    (!password.is_empty()).then(|| password.to_string())
}

fn student_payload(student: &StudentDraft, mode: &Mode) -> StudentPayload {
    let username = match mode {
        Mode::Create => Some(student.username.trim().to_string()),
        Mode::Update { .. } => None,
    };

    StudentPayload {
        username,
        password: changed_password(&student.password),
        full_name: student.full_name.trim().to_string(),
        phone_number: student.phone_number.clone(),
        email: student.email.clone(),
        gender: student.gender,
        dob: student.dob,
        profile_image: student.profile_image.clone().map(String::from),
        address: student.address.clone(),
        emergency_contact: student.emergency_contact.clone(),
        roll_number: student.roll_number.clone(),
        class_id: student.class_id.clone(),
        admission_date: student.admission_date,
        father_id: student.father().to_string(),
        status: student.status,
    }
}

fn parent_payload(parent: &ParentDraft, mode: &Mode) -> ParentPayload {
    let (cnic, username) = match mode {
        Mode::Create => (
            Some(parent.cnic.clone()),
            Some(parent.username.trim().to_string()).filter(|u| !u.is_empty()),
        ),
        Mode::Update { .. } => (None, None),
    };

    ParentPayload {
        cnic,
        username,
        password: changed_password(&parent.password),
        full_name: parent.full_name.trim().to_string(),
        phone_number: parent.phone_number.clone(),
        email: parent.email.clone(),
        gender: parent.gender,
        dob: parent.dob,
        profile_image: parent.profile_image.clone().map(String::from),
        address: parent.address.clone(),
        qualification: parent.qualification.clone(),
        status: parent.status,
        relation: parent.relation.clone(),
        occupation: parent.occupation.clone(),
        child_ids: parent.child_ids.clone(),
    }
}
