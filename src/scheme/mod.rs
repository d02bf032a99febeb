//! Scheme resolution.
//!
//! A scheme lives either in the project's shared-schemes directory
//! (`xcshareddata/xcschemes`) or under one user's private schemes
//! (`xcuserdata/<user>.xcuserdatad/xcschemes`). The shared list decides
//! which location applies; a missing scheme file is a non-error "not found"
//! so a workspace scan can move on to the next candidate project.

use crate::error::Error;
use roxmltree::{Document, Node};
use std::fs;
use std::path::{Path, PathBuf};

/// A named pointer from a scheme entry to a target, possibly in another
/// project. An empty `container` means "the scheme's own project".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildableReference {
    pub target_name: String,
    pub container: String,
}

/// One entry of a scheme's build action.
#[derive(Debug, Clone)]
pub struct BuildActionEntry {
    pub build_for_archiving: bool,
    pub buildable_references: Vec<BuildableReference>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildAction {
    pub entries: Vec<BuildActionEntry>,
}

/// The archive action carries the default configuration for archive builds.
#[derive(Debug, Clone)]
pub struct ArchiveAction {
    pub build_configuration: String,
}

/// A parsed `.xcscheme` document. Parsed fresh per invocation, never cached
/// across runs.
#[derive(Debug, Clone)]
pub struct Scheme {
    pub name: String,
    pub is_shared: bool,
    pub path: PathBuf,
    pub build_action: BuildAction,
    pub archive_action: Option<ArchiveAction>,
}

/// Names of the shared schemes of a project, from its
/// `xcshareddata/xcschemes` directory. Missing directory means none.
pub fn shared_scheme_names(project: &Path) -> Vec<String> {
    let dir = project.join("xcshareddata").join("xcschemes");
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "xcscheme") {
                path.file_stem().map(|s| s.to_string_lossy().into_owned())
            } else {
                None
            }
        })
        .collect();
    names.sort();
    names
}

/// Where the scheme file for `name` lives, and whether it is shared.
fn scheme_location(project: &Path, name: &str, user: &str) -> (PathBuf, bool) {
    let is_shared = shared_scheme_names(project).iter().any(|s| s == name);
    let path = if is_shared {
        project
            .join("xcshareddata")
            .join("xcschemes")
            .join(format!("{}.xcscheme", name))
    } else {
        project
            .join("xcuserdata")
            .join(format!("{}.xcuserdatad", user))
            .join("xcschemes")
            .join(format!("{}.xcscheme", name))
    };
    (path, is_shared)
}

/// Read the named scheme of one project. `Ok(None)` when the scheme file
/// does not exist, so workspace scanning can try the next project.
pub fn read_scheme(project: &Path, name: &str, user: &str) -> Result<Option<Scheme>, Error> {
    let (path, is_shared) = scheme_location(project, name, user);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;
    parse_scheme(&content, name, is_shared, &path).map(Some)
}

/// Scan `projects` in order and return the first one containing the scheme,
/// together with the parsed scheme. `Ok(None)` when no project has it.
pub fn find_project_with_scheme(
    projects: &[PathBuf],
    name: &str,
    user: &str,
) -> Result<Option<(PathBuf, Scheme)>, Error> {
    for project in projects {
        if let Some(scheme) = read_scheme(project, name, user)? {
            return Ok(Some((project.clone(), scheme)));
        }
    }
    Ok(None)
}

fn parse_scheme(
    content: &str,
    name: &str,
    is_shared: bool,
    path: &Path,
) -> Result<Scheme, Error> {
    let doc = Document::parse(content).map_err(|e| {
        // scheme files live inside the project bundle
        signscout_xcodeproj::ProjectError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    let root = doc.root_element();

    let entries = root
        .children()
        .find(|n| n.has_tag_name("BuildAction"))
        .and_then(|build_action| {
            build_action
                .children()
                .find(|n| n.has_tag_name("BuildActionEntries"))
        })
        .map(|entries_node| {
            entries_node
                .children()
                .filter(|n| n.has_tag_name("BuildActionEntry"))
                .map(parse_entry)
                .collect()
        })
        .unwrap_or_default();

    let archive_action = root
        .children()
        .find(|n| n.has_tag_name("ArchiveAction"))
        .and_then(|n| n.attribute("buildConfiguration"))
        .map(|configuration| ArchiveAction {
            build_configuration: configuration.to_string(),
        });

    Ok(Scheme {
        name: name.to_string(),
        is_shared,
        path: path.to_path_buf(),
        build_action: BuildAction { entries },
        archive_action,
    })
}

fn parse_entry(node: Node) -> BuildActionEntry {
    let buildable_references = node
        .children()
        .filter(|n| n.has_tag_name("BuildableReference"))
        .map(|reference| BuildableReference {
            target_name: reference.attribute("BlueprintName").unwrap_or("").to_string(),
            container: reference
                .attribute("ReferencedContainer")
                .unwrap_or("")
                .trim_start_matches("container:")
                .to_string(),
        })
        .collect();

    BuildActionEntry {
        build_for_archiving: node.attribute("buildForArchiving") == Some("YES"),
        buildable_references,
    }
}
