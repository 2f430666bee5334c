//! Identity as seen by the editor.
//!
//! Authentication happens elsewhere; the core only reads the role of the
//! current user to decide whether edit controls are offered.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Pilgrimage organizer managing their own offerings
    Operator,
    #[default]
    User,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::User => "user",
        }
    }

    /// Whether this role gets page-builder edit controls.
    pub fn can_edit_pages(&self) -> bool {
        matches!(self, Role::Admin | Role::Operator)
    }

    /// Whether this role may write CMS entries.
    pub fn can_edit_cms(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The user on whose behalf the editor runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}
