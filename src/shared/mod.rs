//! Shared utilities for ina219-ups-hat

use rmcp::ErrorData as McpError;

/// Create an internal error
pub fn internal_error(msg: impl Into<String>) -> McpError {
    McpError::internal_error(msg.into(), None)
}

/// Create an invalid params error
pub fn invalid_params(msg: impl Into<String>) -> McpError {
    McpError::invalid_params(msg.into(), None)
}
