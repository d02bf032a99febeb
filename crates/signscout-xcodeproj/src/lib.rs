//! Read-only Xcode project model.
//!
//! Parses `.pbxproj` files (OpenStep property lists) and XML property lists
//! into a tagged-union [`Value`], and exposes the pieces of the project model
//! that code-signing resolution needs: targets, product types, dependency
//! edges, build configurations and build-setting resolution.
//!
//! Nothing in this crate mutates a project or writes back to disk.

mod build_settings;
mod openstep;
mod project;
mod value;
mod xmlplist;

pub use build_settings::resolve_build_setting;
pub use openstep::{parse_pbxproj, OpenStepError};
pub use project::{BuildConfiguration, Dependency, Project, ProductType, Target};
pub use value::Value;
pub use xmlplist::{parse_xml_plist, XmlPlistError};

use std::path::PathBuf;

/// Errors from opening or interpreting a project file.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("malformed project: {0}")]
    Malformed(String),
}
