//! The checkout wizard: its steps, navigation and input validation.

pub mod progress;
pub mod step;
pub mod validator;

pub use progress::{NavigationError, WizardProgress};
pub use step::{WizardStep, next_after, route};
pub use validator::{
    FieldError, FieldErrorKind, FieldId, FieldRule, is_step_complete, validate,
};
