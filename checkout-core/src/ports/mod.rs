//! Collaborators the checkout talks to.
//!
//! The checkout never reaches for a global: routing, localized texts,
//! validation messages and confirmation dialogs are injected through these
//! traits when a [`CheckoutSession`](crate::session::CheckoutSession) is
//! built.

pub mod dialog;
pub mod messages;
pub mod router;
pub mod texts;

pub use dialog::{ConfirmationDialog, DialogKind};
pub use messages::{MessageLog, MessageSink, MessageType, ValidationMessage};
pub use router::{Route, Router};
pub use texts::{ResourceBundle, TextBundleError, TextProvider};
