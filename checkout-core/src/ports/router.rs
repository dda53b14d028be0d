use std::fmt;

use serde::{Deserialize, Serialize};

/// Application routes the checkout can leave to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    OrderCompleted,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::OrderCompleted => "ordercompleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Self::Home),
            "ordercompleted" => Some(Self::OrderCompleted),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moves the application to another route once the checkout is done with.
pub trait Router {
    fn navigate_to(
        &mut self,
        route: Route,
    );
}
