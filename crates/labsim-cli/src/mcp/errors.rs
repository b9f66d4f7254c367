//! Error conversions for the MCP server

use labsim_core::LabError;
use rmcp::ErrorData;

/// Wraps a core error with context as an MCP internal error.
pub fn to_mcp_error(message: &str, error: &LabError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

/// Error for tools that need a running session.
pub fn no_active_lab() -> ErrorData {
    ErrorData::invalid_request("No active lab; call start_lab first", None)
}
