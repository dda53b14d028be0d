use serde::{Deserialize, Serialize};

/// Visual flavour of a yes/no confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    Warning,
    Confirm,
}

/// Asks the customer a yes/no question.
///
/// Each call corresponds to one dialog and must return exactly one answer.
/// Closing the dialog without choosing "yes" counts as "no".
pub trait ConfirmationDialog {
    fn confirm(
        &mut self,
        kind: DialogKind,
        message: &str,
    ) -> bool;
}
