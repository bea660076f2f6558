pub mod api;
pub mod classes;
pub mod lookup;
pub mod merge;
pub mod registry;
pub mod students;
pub mod submission;
pub mod workflow;
