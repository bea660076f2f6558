//! Which part of the admin panel is open, passed explicitly to whatever
//! needs it instead of living in shared UI state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::WorkflowError, services::workflow::RegistrationWorkflow};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdminModule {
    Users,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,
    Accountant,
    Student,
    Teacher,
    Parent,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserType::Admin => "admin",
            UserType::Accountant => "accountant",
            UserType::Student => "student",
            UserType::Teacher => "teacher",
            UserType::Parent => "parent",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserType::Admin),
            "accountant" => Ok(UserType::Accountant),
            "student" => Ok(UserType::Student),
            "teacher" => Ok(UserType::Teacher),
            "parent" => Ok(UserType::Parent),
            _ => Err(anyhow::anyhow!("Unknown user type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelContext {
    module: Option<AdminModule>,
    user_type: Option<UserType>,
}

impl PanelContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&self) -> Option<AdminModule> {
        self.module
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.user_type
    }

    pub fn open(&mut self, module: AdminModule) {
        self.module = Some(module);
    }

    /// Back to the module picker; forgets the chosen user type.
    pub fn back(&mut self) {
        self.module = None;
        self.user_type = None;
    }

    pub fn select_user_type(&mut self, user_type: UserType) {
        self.module = Some(AdminModule::Users);
        self.user_type = Some(user_type);
    }

    /// Prompt shown while no registration type has been picked.
    pub fn prompt(&self) -> Option<String> {
        match self.user_type {
            None => Some(WorkflowError::NoRegistrationType.to_string()),
            Some(_) => None,
        }
    }

    /// Opens the linked student + parent registration form.
    pub fn student_registration(&self) -> Result<RegistrationWorkflow, WorkflowError> {
        match self.user_type {
            Some(UserType::Student) => Ok(RegistrationWorkflow::new()),
            Some(other) => Err(WorkflowError::FormUnavailable(other)),
            None => Err(WorkflowError::NoRegistrationType),
        }
    }
}
