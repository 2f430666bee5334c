//! One-line confirmations for commands that have no resource to show.

use std::fmt;

/// Outcome line such as `Success: Moved section up`.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// A command that ran but changed nothing, e.g. moving the first
    /// section up.
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Unchanged:" };
        writeln!(f, "{label} {}", self.message)
    }
}
