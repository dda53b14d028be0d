use serde::{Deserialize, Serialize};

/// Product availability code carried by catalog data (`A`, `O`, `D`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Available,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "A",
            Self::OutOfStock => "O",
            Self::Discontinued => "D",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::Available),
            "O" => Some(Self::OutOfStock),
            "D" => Some(Self::Discontinued),
            _ => None,
        }
    }

    /// Resource key of the localized status label.
    pub fn text_key(&self) -> &'static str {
        match self {
            Self::Available => "statusA",
            Self::OutOfStock => "statusO",
            Self::Discontinued => "statusD",
        }
    }

    pub fn state(&self) -> StatusState {
        match self {
            Self::Available => StatusState::Success,
            Self::OutOfStock => StatusState::Warning,
            Self::Discontinued => StatusState::Error,
        }
    }
}

/// Semantic colouring hint for a status label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusState {
    Success,
    Warning,
    Error,
    #[default]
    None,
}

impl StatusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::None => "None",
        }
    }
}
