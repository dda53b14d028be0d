use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    Error,
    Warning,
    Information,
}

/// A message shown next to the input it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub message_type: MessageType,
    pub message: String,
    /// Id of the input the message belongs to, e.g. `creditCardNumber`.
    pub target: String,
}

impl ValidationMessage {
    pub fn error(
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message_type: MessageType::Error,
            message: message.into(),
            target: target.into(),
        }
    }
}

/// Collects validation messages for the UI layer.
///
/// Any error present in the sink blocks every wizard step from being
/// validated, not only the step owning the input.
pub trait MessageSink {
    fn push(
        &mut self,
        message: ValidationMessage,
    );

    /// Drops every message whose target is in `targets`.
    fn remove_for_targets(
        &mut self,
        targets: &[&str],
    );

    fn clear(&mut self);

    fn messages(&self) -> &[ValidationMessage];

    fn has_errors(&self) -> bool {
        self.messages()
            .iter()
            .any(|m| m.message_type == MessageType::Error)
    }
}

/// In-memory [`MessageSink`].
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<ValidationMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageSink for MessageLog {
    fn push(
        &mut self,
        message: ValidationMessage,
    ) {
        self.messages.push(message);
    }

    fn remove_for_targets(
        &mut self,
        targets: &[&str],
    ) {
        self.messages
            .retain(|m| !targets.contains(&m.target.as_str()));
    }

    fn clear(&mut self) {
        self.messages.clear();
    }

    fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }
}
