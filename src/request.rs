//! The resolution request.
//!
//! Constructed once at the process entry point from CLI arguments and passed
//! down by reference; no component reads ambient process state.

use crate::error::Error;
use std::path::PathBuf;

/// Immutable inputs of one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Path to a `.xcodeproj` or workspace bundle.
    pub input: PathBuf,
    /// Scheme name.
    pub scheme: String,
    /// User name, for locating private schemes.
    pub user: String,
    /// Explicit build configuration; falls back to the scheme's
    /// archive-action default when `None`.
    pub configuration: Option<String>,
}

impl ResolveRequest {
    pub fn new(
        input: PathBuf,
        scheme: String,
        user: String,
        configuration: Option<String>,
    ) -> Result<ResolveRequest, Error> {
        if input.as_os_str().is_empty() {
            return Err(Error::Input("project".to_string()));
        }
        if scheme.is_empty() {
            return Err(Error::Input("scheme".to_string()));
        }
        if user.is_empty() {
            return Err(Error::Input("user".to_string()));
        }

        Ok(ResolveRequest {
            input,
            scheme,
            user,
            configuration: configuration.filter(|c| !c.is_empty()),
        })
    }
}
