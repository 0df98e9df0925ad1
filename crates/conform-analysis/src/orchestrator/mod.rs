//! Validator facade: the single entry point shared by the CLI, git hooks and CI.

pub mod scope;
pub mod validator;

pub use scope::ValidationScope;
pub use validator::{Validator, ValidatorBuilder};
