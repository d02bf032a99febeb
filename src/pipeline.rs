//! The resolution pipeline.
//!
//! Strictly linear per invocation: locate candidate projects, resolve the
//! scheme, expand the target graph, read each target's signing settings.
//! Two output shapes exist over the same walk: the per-target code-sign
//! map, and the project-to-target-names map.

use crate::error::Error;
use crate::graph::{self, ProjectCache, ResolvedTarget};
use crate::locator;
use crate::request::ResolveRequest;
use crate::scheme::{self, Scheme};
use crate::settings::{self, CodeSignInfo};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The project-to-target-names output shape.
#[derive(Debug, Serialize)]
pub struct TargetMap {
    pub configuration: String,
    pub targets: BTreeMap<String, Vec<String>>,
}

struct Resolution {
    cache: ProjectCache,
    targets: Vec<ResolvedTarget>,
    configuration: String,
}

/// Shared front of both output shapes: locator, scheme resolution,
/// configuration fallback, graph expansion.
fn resolve(request: &ResolveRequest) -> Result<Resolution, Error> {
    let projects = locator::contained_projects(&request.input)?;

    let (project_path, scheme): (PathBuf, Scheme) =
        scheme::find_project_with_scheme(&projects, &request.scheme, &request.user)?.ok_or_else(
            || {
                Error::NotFound(format!(
                    "project does not contain scheme: {}",
                    request.scheme
                ))
            },
        )?;

    let configuration =
        settings::effective_configuration(request.configuration.as_deref(), &scheme)?;

    let mut cache = ProjectCache::new();
    let targets = graph::collect_embeddable_targets(&mut cache, &project_path, &scheme)?;

    Ok(Resolution {
        cache,
        targets,
        configuration,
    })
}

/// Resolve the per-target code-sign map: target name to [`CodeSignInfo`].
pub fn resolve_code_sign_infos(
    request: &ResolveRequest,
) -> Result<BTreeMap<String, CodeSignInfo>, Error> {
    let mut resolution = resolve(request)?;

    let mut infos = BTreeMap::new();
    for target in &resolution.targets {
        let project = resolution.cache.open(&target.project)?;
        let info = settings::code_sign_info(
            project,
            &target.target_name,
            &resolution.configuration,
            &request.input,
        )?;
        infos.insert(target.target_name.clone(), info);
    }
    Ok(infos)
}

/// Resolve the project-to-target-names map.
pub fn resolve_target_map(request: &ResolveRequest) -> Result<TargetMap, Error> {
    let resolution = resolve(request)?;
    Ok(TargetMap {
        configuration: resolution.configuration,
        targets: graph::targets_by_project(&resolution.targets),
    })
}
