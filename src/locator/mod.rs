//! Workspace/project locator.
//!
//! Turns the input path into the list of candidate `.xcodeproj` paths: a
//! single project passes through, a workspace is expanded by scanning its
//! manifest for group-reference path literals. Projects managed by
//! CocoaPods are never signing candidates and are dropped.

use crate::error::Error;
use regex_lite::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The manifest file inside a workspace bundle.
const WORKSPACE_MANIFEST: &str = "contents.xcworkspacedata";

/// Suffix of the project generated by CocoaPods.
const PODS_PROJECT_SUFFIX: &str = "Pods/Pods.xcodeproj";

/// All projects the input refers to, as absolute paths in manifest order
/// (duplicates preserved; callers deduplicate downstream as needed).
pub fn contained_projects(input: &Path) -> Result<Vec<PathBuf>, Error> {
    if input.extension().is_some_and(|e| e == "xcodeproj") {
        return Ok(vec![absolutize(input)]);
    }

    let manifest = input.join(WORKSPACE_MANIFEST);
    let content = fs::read_to_string(&manifest).map_err(|source| {
        Error::NotFound(format!(
            "workspace manifest not readable: {}: {}",
            manifest.display(),
            source
        ))
    })?;

    let base = input.parent().unwrap_or_else(|| Path::new("."));
    let group_reference = Regex::new(r#""group:([^"]*)""#).expect("valid pattern");

    Ok(group_reference
        .captures_iter(&content)
        .map(|capture| absolutize(&base.join(&capture[1])))
        .filter(|path| !path.to_string_lossy().ends_with(PODS_PROJECT_SUFFIX))
        .collect())
}

/// Lexically absolutize a path: anchor relative paths at the current
/// directory and fold `.`/`..` components without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in anchored.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
