//! Target graph resolution.
//!
//! From a resolved scheme, select the primary buildable target and expand
//! its dependency graph, keeping only embeddable targets (applications and
//! app extensions). The walk is an explicit worklist with a visited set
//! keyed by (project path, target name), so cyclic dependency graphs
//! terminate and every reachable target is emitted exactly once.

use crate::error::Error;
use crate::locator::absolutize;
use crate::scheme::{BuildAction, BuildActionEntry, Scheme};
use signscout_xcodeproj::{Dependency, Project};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

/// One embeddable target of the resolved graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub project: PathBuf,
    pub target_name: String,
}

/// Per-invocation cache of opened projects, so a workspace walk parses each
/// `.pbxproj` once. Nothing survives the invocation.
#[derive(Debug, Default)]
pub struct ProjectCache {
    projects: BTreeMap<PathBuf, Project>,
}

impl ProjectCache {
    pub fn new() -> ProjectCache {
        ProjectCache::default()
    }

    /// The project at `path`, opening and caching it on first use.
    pub fn open(&mut self, path: &Path) -> Result<&Project, Error> {
        if !self.projects.contains_key(path) {
            let project = Project::open(path)?;
            self.projects.insert(path.to_path_buf(), project);
        }
        Ok(&self.projects[path])
    }
}

/// The primary build-action entry: the first entry marked for archiving,
/// or the first declared entry when none is.
pub fn primary_entry(build_action: &BuildAction) -> Option<&BuildActionEntry> {
    build_action
        .entries
        .iter()
        .find(|e| e.build_for_archiving)
        .or_else(|| build_action.entries.first())
}

/// Resolve a referenced container path against the directory containing the
/// referencing project.
fn container_path(referencing_project: &Path, container: &str) -> PathBuf {
    let base = referencing_project.parent().unwrap_or_else(|| Path::new("."));
    absolutize(&base.join(container))
}

/// Expand the scheme's embeddable target set.
///
/// `scheme_project` is the project the scheme was found in; cross-project
/// references resolve relative to its parent directory (the workspace root
/// in workspace mode).
pub fn collect_embeddable_targets(
    cache: &mut ProjectCache,
    scheme_project: &Path,
    scheme: &Scheme,
) -> Result<Vec<ResolvedTarget>, Error> {
    let entry = primary_entry(&scheme.build_action).ok_or_else(|| {
        Error::Graph(format!(
            "scheme {} does not contain buildable target",
            scheme.name
        ))
    })?;
    // only the first reference of the entry is canonical
    let reference = entry.buildable_references.first().ok_or_else(|| {
        Error::Graph(format!(
            "scheme {} does not contain buildable target",
            scheme.name
        ))
    })?;

    let primary_project_path = if reference.container.is_empty() {
        scheme_project.to_path_buf()
    } else {
        container_path(scheme_project, &reference.container)
    };

    let (primary_id, primary_embeddable) = {
        let project = cache.open(&primary_project_path)?;
        let target = project.target_named(&reference.target_name).ok_or_else(|| {
            Error::NotFound(format!(
                "target {} not found in project {}",
                reference.target_name,
                project.path().display()
            ))
        })?;
        (target.id.clone(), target.product_type.is_embeddable())
    };
    if !primary_embeddable {
        return Err(Error::Graph(format!(
            "scheme {} resolves to target {}, which is not an application or app extension",
            scheme.name, reference.target_name
        )));
    }

    let mut queue: VecDeque<(PathBuf, String)> = VecDeque::new();
    let mut visited: BTreeSet<(PathBuf, String)> = BTreeSet::new();
    let mut resolved = Vec::new();
    queue.push_back((primary_project_path, primary_id));

    while let Some((project_path, target_id)) = queue.pop_front() {
        let (name, dependencies) = {
            let project = cache.open(&project_path)?;
            let Some(target) = project.target_by_id(&target_id) else {
                continue;
            };
            (target.name.clone(), target.dependencies.clone())
        };

        if !visited.insert((project_path.clone(), name.clone())) {
            continue;
        }
        resolved.push(ResolvedTarget {
            project: project_path.clone(),
            target_name: name,
        });

        for dependency in dependencies {
            match dependency {
                Dependency::Local(id) => {
                    let project = cache.open(&project_path)?;
                    if project
                        .target_by_id(&id)
                        .is_some_and(|t| t.product_type.is_embeddable())
                    {
                        queue.push_back((project_path.clone(), id));
                    }
                }
                Dependency::Remote {
                    container,
                    target_name,
                } => {
                    // a proxy the project model could not pin to a target
                    if container.is_empty() {
                        continue;
                    }
                    let dependency_path = container_path(&project_path, &container);
                    let project = cache.open(&dependency_path)?;
                    if let Some(target) = project.target_named(&target_name) {
                        if target.product_type.is_embeddable() {
                            queue.push_back((dependency_path.clone(), target.id.clone()));
                        }
                    }
                }
            }
        }
    }

    if resolved.is_empty() {
        return Err(Error::Graph(format!(
            "no embeddable target found for scheme {}",
            scheme.name
        )));
    }
    Ok(resolved)
}

/// Group resolved targets by project path, preserving visit order within
/// each project.
pub fn targets_by_project(targets: &[ResolvedTarget]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for target in targets {
        grouped
            .entry(target.project.to_string_lossy().into_owned())
            .or_default()
            .push(target.target_name.clone());
    }
    grouped
}
