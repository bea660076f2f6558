use crate::{
    error::{SubmissionError, WorkflowError},
    models::{class::ClassRef, parent::ParentDraft, student::StudentDraft},
    services::{
        classes::ClassService,
        lookup::{LookupClient, LookupResult},
        merge::{merge, Notice},
        submission::{Mode, SubmissionCoordinator},
    },
};

/// Where a registration form is in its lifecycle.
///
/// `Found`, `NotFound` and `LookupFailed` are the outcomes of the last lookup;
/// the next edit moves them on to `Editing`. `SubmissionFailed` behaves like
/// `Editing` with the failure notice attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Searching,
    Found,
    NotFound,
    LookupFailed,
    Editing,
    Submitting,
    Submitted,
    SubmissionFailed,
}

/// Handed out when a lookup is dispatched. Only the ticket of the most
/// recent dispatch may complete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    cnic: String,
}

impl LookupTicket {
    pub fn cnic(&self) -> &str {
        &self.cnic
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One student + parent registration form.
///
/// Each handler takes `&mut self`, so events are applied one at a time.
/// Network calls are split into `begin_*` / `complete_*` halves for callers
/// that run their own event loop; `search` and `submit` chain both halves.
#[derive(Debug)]
pub struct RegistrationWorkflow {
    mode: Mode,
    state: WorkflowState,
    student: StudentDraft,
    parent: ParentDraft,
    classes: Vec<ClassRef>,
    notice: Option<Notice>,
    generation: u64,
}

impl Default for RegistrationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWorkflow {
    /// Blank form for registering a new student.
    pub fn new() -> Self {
        Self {
            mode: Mode::Create,
            state: WorkflowState::Idle,
            student: StudentDraft::default(),
            parent: ParentDraft::default(),
            classes: Vec::new(),
            notice: None,
            generation: 0,
        }
    }

    /// Form pre-filled from existing records. Starts in `Editing`; password
    /// fields start blank, meaning "leave unchanged".
    pub fn for_update(
        student_id: impl Into<String>,
        mut student: StudentDraft,
        mut parent: ParentDraft,
    ) -> Self {
        let student_id = student_id.into();
        student.id = Some(student_id.clone());
        student.password.clear();
        student.link_father(&parent.cnic);
        parent.password.clear();
        parent.linked = true;

        Self {
            mode: Mode::Update { student_id },
            state: WorkflowState::Editing,
            student,
            parent,
            classes: Vec::new(),
            notice: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn student(&self) -> &StudentDraft {
        &self.student
    }

    pub fn parent(&self) -> &ParentDraft {
        &self.parent
    }

    pub fn classes(&self) -> &[ClassRef] {
        &self.classes
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Loads the class list the first time the form is shown.
    pub async fn mount(&mut self, classes: &ClassService) {
        if self.classes.is_empty() {
            self.classes = classes.list_or_fallback().await;
        }
    }

    pub fn set_classes(&mut self, classes: Vec<ClassRef>) {
        self.classes = classes;
    }

    pub fn can_search(&self) -> bool {
        self.mode == Mode::Create
            && !matches!(
                self.state,
                WorkflowState::Searching | WorkflowState::Submitting | WorkflowState::Submitted
            )
            && !self.parent.cnic.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !matches!(
            self.state,
            WorkflowState::Searching | WorkflowState::Submitting | WorkflowState::Submitted
        )
    }

    /// Applies an operator edit to the student section. The student id, and in
    /// update mode the username and admission date, cannot be changed here.
    pub fn edit_student(
        &mut self,
        edit: impl FnOnce(&mut StudentDraft),
    ) -> Result<(), WorkflowError> {
        self.ensure_open()?;

        let id = self.student.id.clone();
        let username = self.student.username.clone();
        let admission_date = self.student.admission_date;

        edit(&mut self.student);

        self.student.id = id;
        if let Mode::Update { .. } = self.mode {
            self.student.username = username;
            self.student.admission_date = admission_date;
        }
        self.settle();
        Ok(())
    }

    /// Applies an operator edit to the parent section.
    ///
    /// In update mode the CNIC and username are fixed. In create mode a new
    /// CNIC unlinks the draft from any looked-up record and supersedes a
    /// lookup still in flight.
    pub fn edit_parent(
        &mut self,
        edit: impl FnOnce(&mut ParentDraft),
    ) -> Result<(), WorkflowError> {
        self.ensure_open()?;

        let cnic = self.parent.cnic.clone();
        let username = self.parent.username.clone();
        let linked = self.parent.linked;

        edit(&mut self.parent);
        self.parent.linked = linked;

        match self.mode {
            Mode::Update { .. } => {
                self.parent.cnic = cnic;
                self.parent.username = username;
            }
            Mode::Create if self.parent.cnic != cnic => {
                self.generation += 1;
                self.parent.linked = false;
                if self.state == WorkflowState::Searching {
                    tracing::debug!("Lookup for {} superseded by a CNIC edit", cnic);
                    self.state = WorkflowState::Editing;
                }
            }
            Mode::Create => {}
        }
        self.settle();
        Ok(())
    }

    pub fn begin_lookup(&mut self) -> Result<LookupTicket, WorkflowError> {
        if self.mode != Mode::Create {
            return Err(WorkflowError::LookupUnavailable);
        }
        match self.state {
            WorkflowState::Searching => return Err(WorkflowError::LookupInProgress),
            WorkflowState::Submitting => return Err(WorkflowError::SubmissionInProgress),
            WorkflowState::Submitted => return Err(WorkflowError::AlreadySubmitted),
            _ => {}
        }
        if self.parent.cnic.is_empty() {
            return Err(WorkflowError::MissingIdentifier);
        }

        self.generation += 1;
        self.state = WorkflowState::Searching;
        self.notice = None;
        Ok(LookupTicket {
            generation: self.generation,
            cnic: self.parent.cnic.clone(),
        })
    }

    /// Applies a lookup response. Returns `false`, changing nothing, when the
    /// ticket is not the latest dispatched one.
    pub fn complete_lookup(&mut self, ticket: LookupTicket, result: LookupResult) -> bool {
        if ticket.generation != self.generation || self.state != WorkflowState::Searching {
            tracing::debug!(
                "Discarding stale lookup for {} (generation {}, current {})",
                ticket.cnic,
                ticket.generation,
                self.generation
            );
            return false;
        }

        let merged = merge(std::mem::take(&mut self.parent), &result);
        self.parent = merged.parent;
        self.notice = merged.notice;
        self.state = match result {
            LookupResult::Found(_) => WorkflowState::Found,
            LookupResult::NotFound => {
                self.parent.linked = false;
                WorkflowState::NotFound
            }
            LookupResult::Error(_) => WorkflowState::LookupFailed,
        };
        true
    }

    /// Looks up the CNIC currently in the parent section.
    pub async fn search(&mut self, client: &LookupClient) -> Result<bool, WorkflowError> {
        let ticket = self.begin_lookup()?;
        let result = client.lookup(ticket.cnic()).await;
        Ok(self.complete_lookup(ticket, result))
    }

    pub fn begin_submit(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Searching => Err(WorkflowError::LookupInProgress),
            WorkflowState::Submitting => Err(WorkflowError::SubmissionInProgress),
            WorkflowState::Submitted => Err(WorkflowError::AlreadySubmitted),
            _ => {
                self.state = WorkflowState::Submitting;
                self.notice = None;
                Ok(())
            }
        }
    }

    /// Records the submission outcome. A failure keeps every entered value so
    /// the same data can be sent again.
    pub fn complete_submit(&mut self, outcome: Result<(), SubmissionError>) {
        if self.state != WorkflowState::Submitting {
            return;
        }
        match outcome {
            Ok(()) => {
                self.state = WorkflowState::Submitted;
            }
            Err(e) => {
                self.state = WorkflowState::SubmissionFailed;
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    pub async fn submit(
        &mut self,
        coordinator: &SubmissionCoordinator,
    ) -> Result<WorkflowState, WorkflowError> {
        self.begin_submit()?;
        let outcome = coordinator
            .submit(&mut self.student, &self.parent, &self.mode)
            .await;
        self.complete_submit(outcome);
        Ok(self.state)
    }

    fn ensure_open(&self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Submitting => Err(WorkflowError::SubmissionInProgress),
            WorkflowState::Submitted => Err(WorkflowError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    fn settle(&mut self) {
        if matches!(
            self.state,
            WorkflowState::Found
                | WorkflowState::NotFound
                | WorkflowState::LookupFailed
                | WorkflowState::SubmissionFailed
        ) {
            self.state = WorkflowState::Editing;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::LookupError;
    use crate::models::parent::{ParentRecord, RecordStatus};
    use crate::services::merge::{NoticeKind, NOT_FOUND_GUIDANCE};

    fn record(cnic: &str, name: &str) -> ParentRecord {
        ParentRecord {
            cnic: cnic.into(),
            full_name: name.into(),
            phone_number: Some("0300-1234567".into()),
            email: None,
            address: Some("Street 9, Lahore".into()),
            relation: "Father".into(),
            occupation: String::new(),
            qualification: String::new(),
            status: RecordStatus::Active,
            child_ids: vec!["s1".into()],
        }
    }

    fn with_cnic(cnic: &str) -> RegistrationWorkflow {
        let mut wf = RegistrationWorkflow::new();
        wf.edit_parent(|p| p.cnic = cnic.into()).unwrap();
        wf
    }

    #[test]
    fn found_lookup_prefills_and_keeps_local_password() {
        let mut wf = with_cnic("12345-6789012-3");
        wf.edit_parent(|p| p.password = "typed-first".into()).unwrap();
        assert_eq!(wf.state(), WorkflowState::Idle);

        let ticket = wf.begin_lookup().unwrap();
        assert_eq!(wf.state(), WorkflowState::Searching);
        assert!(!wf.can_search());

        let applied = wf.complete_lookup(
            ticket,
            LookupResult::Found(record("12345-6789012-3", "Ali Khan")),
        );
        assert!(applied);
        assert_eq!(wf.state(), WorkflowState::Found);
        assert_eq!(wf.parent().full_name, "Ali Khan");
        assert_eq!(wf.parent().password, "typed-first");
        assert!(wf.parent().linked);

        wf.edit_student(|s| s.full_name = "Zara Khan".into()).unwrap();
        assert_eq!(wf.state(), WorkflowState::Editing);
    }

    #[test]
    fn second_lookup_is_refused_while_searching() {
        let mut wf = with_cnic("12345-6789012-3");
        wf.begin_lookup().unwrap();
        assert_eq!(wf.begin_lookup(), Err(WorkflowError::LookupInProgress));
        assert_eq!(wf.begin_submit(), Err(WorkflowError::LookupInProgress));
    }

    #[test]
    fn response_for_a_superseded_cnic_is_discarded() {
        let mut wf = with_cnic("11111-1111111-1");
        let stale = wf.begin_lookup().unwrap();

        wf.edit_parent(|p| p.cnic = "22222-2222222-2".into()).unwrap();
        assert_eq!(wf.state(), WorkflowState::Editing);
        let fresh = wf.begin_lookup().unwrap();
        assert!(fresh.generation() > stale.generation());

        let applied = wf.complete_lookup(fresh, LookupResult::NotFound);
        assert!(applied);

        // The older response arrives last and must not win.
        let applied = wf.complete_lookup(
            stale,
            LookupResult::Found(record("11111-1111111-1", "Old Parent")),
        );
        assert!(!applied);
        assert_eq!(wf.state(), WorkflowState::NotFound);
        assert_eq!(wf.parent().full_name, "");
        assert_eq!(wf.parent().cnic, "22222-2222222-2");
    }

    #[test]
    fn not_found_keeps_typed_fields_and_guides_operator() {
        let mut wf = with_cnic("00000-0000000-0");
        wf.edit_parent(|p| p.full_name = "Manual Entry".into()).unwrap();

        let ticket = wf.begin_lookup().unwrap();
        wf.complete_lookup(ticket, LookupResult::NotFound);

        assert_eq!(wf.state(), WorkflowState::NotFound);
        assert_eq!(wf.parent().full_name, "Manual Entry");
        let notice = wf.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Guidance);
        assert_eq!(notice.text, NOT_FOUND_GUIDANCE);
        assert!(wf.can_search());
    }

    #[test]
    fn failed_lookup_is_reported_as_an_error() {
        let mut wf = with_cnic("12345-6789012-3");
        let ticket = wf.begin_lookup().unwrap();
        wf.complete_lookup(
            ticket,
            LookupResult::Error(LookupError::Transport("timed out".into())),
        );
        assert_eq!(wf.state(), WorkflowState::LookupFailed);
        assert_eq!(wf.notice().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn cnic_edit_unlinks_a_found_parent() {
        let mut wf = with_cnic("12345-6789012-3");
        let ticket = wf.begin_lookup().unwrap();
        wf.complete_lookup(
            ticket,
            LookupResult::Found(record("12345-6789012-3", "Ali Khan")),
        );
        assert!(wf.parent().linked);

        wf.edit_parent(|p| p.cnic = "99999-9999999-9".into()).unwrap();
        assert!(!wf.parent().linked);
    }

    #[test]
    fn failed_submission_returns_to_an_editable_form() {
        let mut wf = with_cnic("12345-6789012-3");
        wf.edit_student(|s| s.full_name = "Zara Khan".into()).unwrap();

        wf.begin_submit().unwrap();
        assert!(!wf.can_submit());
        assert_eq!(wf.begin_submit(), Err(WorkflowError::SubmissionInProgress));
        assert_eq!(
            wf.edit_student(|s| s.full_name.clear()),
            Err(WorkflowError::SubmissionInProgress)
        );

        wf.complete_submit(Err(SubmissionError::Rejected {
            status: 500,
            message: "Database unavailable".into(),
        }));
        assert_eq!(wf.state(), WorkflowState::SubmissionFailed);
        assert_eq!(wf.notice().unwrap().text, "Database unavailable");
        assert_eq!(wf.student().full_name, "Zara Khan");

        wf.begin_submit().unwrap();
        wf.complete_submit(Ok(()));
        assert_eq!(wf.state(), WorkflowState::Submitted);
        assert!(wf.notice().is_none());
        assert_eq!(
            wf.edit_parent(|p| p.full_name.clear()),
            Err(WorkflowError::AlreadySubmitted)
        );
    }

    #[test]
    fn update_mode_locks_identifiers() {
        let admitted = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let mut student = StudentDraft::new("Zara Khan", "zara", "old");
        student.admission_date = admitted;
        let parent = ParentDraft {
            cnic: "12345-6789012-3".into(),
            username: "alikhan".into(),
            password: "old".into(),
            ..ParentDraft::default()
        };

        let mut wf = RegistrationWorkflow::for_update("s2", student, parent);
        assert_eq!(wf.state(), WorkflowState::Editing);
        assert_eq!(wf.student().password, "");
        assert_eq!(wf.parent().password, "");
        assert_eq!(wf.student().father(), "12345-6789012-3");
        assert_eq!(wf.begin_lookup(), Err(WorkflowError::LookupUnavailable));
        assert!(!wf.can_search());

        wf.edit_student(|s| {
            s.username = "hijacked".into();
            s.admission_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
            s.id = Some("other".into());
            s.roll_number = "17".into();
        })
        .unwrap();
        wf.edit_parent(|p| {
            p.cnic = "00000-0000000-0".into();
            p.username = "hijacked".into();
            p.occupation = "Teacher".into();
        })
        .unwrap();

        assert_eq!(wf.student().username, "zara");
        assert_eq!(wf.student().admission_date, admitted);
        assert_eq!(wf.student().id.as_deref(), Some("s2"));
        assert_eq!(wf.student().roll_number, "17");
        assert_eq!(wf.parent().cnic, "12345-6789012-3");
        assert_eq!(wf.parent().username, "alikhan");
        assert_eq!(wf.parent().occupation, "Teacher");
    }

    #[test]
    fn search_needs_a_cnic() {
        let mut wf = RegistrationWorkflow::new();
        assert!(!wf.can_search());
        assert_eq!(wf.begin_lookup(), Err(WorkflowError::MissingIdentifier));
    }
}
