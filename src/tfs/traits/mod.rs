pub mod project;
pub mod variablegroup;

pub use project::ProjectOperations;
pub use variablegroup::VariableGroupOperations;
