pub mod calculations;
pub mod formatter;
pub mod models;
pub mod ports;
pub mod session;
pub mod wizard;

pub use models::*;
pub use session::{CheckoutSession, CompletionError, FinalizeAction, OrderSummary};
pub use wizard::{NavigationError, WizardStep};
