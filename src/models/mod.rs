pub mod class;
pub mod parent;
pub mod registration;
pub mod student;
