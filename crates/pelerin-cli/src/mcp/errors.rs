//! Error mapping for MCP tool results

use pelerin_core::{Role, SiteError};
use rmcp::ErrorData;

/// Wraps a site error with what the tool was doing.
pub fn to_mcp_error(message: &str, error: &SiteError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

/// Rejection for a write tool called by a role that may not write.
pub fn permission_denied(role: Role, what: &str) -> ErrorData {
    ErrorData::invalid_request(format!("The '{role}' role cannot {what}"), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_keeps_context() {
        let error = to_mcp_error("Failed to show page", &SiteError::PageNotFound { id: 4 });
        assert!(error.message.starts_with("Failed to show page: "));
        assert!(error.message.contains('4'));
    }

    #[test]
    fn test_permission_message_names_role() {
        let error = permission_denied(Role::User, "edit pages");
        assert_eq!(error.message, "The 'user' role cannot edit pages");
    }
}
