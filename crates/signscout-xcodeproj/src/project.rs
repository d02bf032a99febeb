//! Project, target and configuration views over a parsed `.pbxproj`.

use crate::openstep::parse_pbxproj;
use crate::value::Value;
use crate::ProjectError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// The kind of product a target builds. Only applications and app
/// extensions are embeddable in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductType {
    Application,
    AppExtension,
    Other(String),
}

impl ProductType {
    /// Map a `com.apple.product-type.*` identifier.
    pub fn from_identifier(identifier: &str) -> ProductType {
        const EXTENSION_TYPES: &[&str] = &[
            "com.apple.product-type.app-extension",
            "com.apple.product-type.app-extension.messages",
            "com.apple.product-type.app-extension.messages-sticker-pack",
            "com.apple.product-type.watchkit-extension",
            "com.apple.product-type.watchkit2-extension",
            "com.apple.product-type.tv-app-extension",
            "com.apple.product-type.extensionkit-extension",
        ];

        if identifier == "com.apple.product-type.application"
            || identifier.starts_with("com.apple.product-type.application.")
        {
            ProductType::Application
        } else if EXTENSION_TYPES.contains(&identifier) {
            ProductType::AppExtension
        } else {
            ProductType::Other(identifier.to_string())
        }
    }

    /// Whether a target of this type belongs in an archive's embeddable set.
    pub fn is_embeddable(&self) -> bool {
        matches!(self, ProductType::Application | ProductType::AppExtension)
    }
}

/// One dependency edge of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// A target in the same project, by object id.
    Local(String),
    /// A target in another project, through a container file reference.
    /// `container` is the referenced `.xcodeproj` path, relative to the
    /// owning project's parent directory.
    Remote {
        container: String,
        target_name: String,
    },
}

/// A build configuration: a name plus its raw setting values.
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    pub name: String,
    settings: BTreeMap<String, Value>,
}

impl BuildConfiguration {
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }
}

/// A target of a project.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub product_type: ProductType,
    pub dependencies: Vec<Dependency>,
    pub configurations: Vec<BuildConfiguration>,
}

impl Target {
    pub fn configuration(&self, name: &str) -> Option<&BuildConfiguration> {
        self.configurations.iter().find(|c| c.name == name)
    }
}

/// A read-only view of one `.xcodeproj` on disk. Identity is the absolute
/// bundle path; construction parses `project.pbxproj` once and the view is
/// never written back.
#[derive(Debug)]
pub struct Project {
    path: PathBuf,
    targets: Vec<Target>,
    project_configurations: Vec<BuildConfiguration>,
    target_attributes: BTreeMap<String, BTreeMap<String, String>>,
}

impl Project {
    /// Open the `.xcodeproj` bundle at `path`.
    pub fn open(path: &Path) -> Result<Project, ProjectError> {
        let pbxproj_path = path.join("project.pbxproj");
        let content = fs::read_to_string(&pbxproj_path).map_err(|source| ProjectError::Read {
            path: pbxproj_path.clone(),
            source,
        })?;
        let root = parse_pbxproj(&content).map_err(|e| ProjectError::Parse {
            path: pbxproj_path,
            message: e.to_string(),
        })?;

        Self::from_plist(path, &root)
    }

    pub(crate) fn from_plist(path: &Path, root: &Value) -> Result<Project, ProjectError> {
        let objects = root
            .get("objects")
            .and_then(Value::as_dict)
            .ok_or_else(|| ProjectError::Malformed("missing objects table".to_string()))?;
        let root_id = root
            .get_str("rootObject")
            .ok_or_else(|| ProjectError::Malformed("missing rootObject".to_string()))?;
        let project_obj = objects
            .get(root_id)
            .ok_or_else(|| ProjectError::Malformed(format!("rootObject {} not found", root_id)))?;

        let project_configurations =
            configurations_of(objects, project_obj.get_str("buildConfigurationList"));

        let mut targets = Vec::new();
        for target_id in ids_of(project_obj.get("targets")) {
            let Some(target_obj) = objects.get(&target_id) else {
                continue;
            };
            let Some(name) = target_obj.get_str("name") else {
                continue;
            };
            let product_type = target_obj
                .get_str("productType")
                .map(ProductType::from_identifier)
                .unwrap_or_else(|| ProductType::Other(String::new()));

            let mut dependencies = Vec::new();
            for dep_id in ids_of(target_obj.get("dependencies")) {
                if let Some(dep) = resolve_dependency(objects, root_id, &dep_id) {
                    dependencies.push(dep);
                }
            }

            targets.push(Target {
                id: target_id,
                name: name.to_string(),
                product_type,
                dependencies,
                configurations: configurations_of(
                    objects,
                    target_obj.get_str("buildConfigurationList"),
                ),
            });
        }

        // Same-project proxy edges carry only the remote target name; pin
        // them to ids now that every target is known.
        let ids_by_name: BTreeMap<String, String> = targets
            .iter()
            .map(|t| (t.name.clone(), t.id.clone()))
            .collect();
        for target in &mut targets {
            for dep in &mut target.dependencies {
                let pinned = match dep {
                    Dependency::Remote {
                        container,
                        target_name,
                    } if container.is_empty() => ids_by_name
                        .get(target_name.as_str())
                        .map(|id| Dependency::Local(id.clone())),
                    _ => None,
                };
                if let Some(local) = pinned {
                    *dep = local;
                }
            }
        }

        let target_attributes = project_obj
            .get("attributes")
            .and_then(|a| a.get("TargetAttributes"))
            .and_then(Value::as_dict)
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(id, entry)| (id.clone(), string_dict(entry)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Project {
            path: path.to_path_buf(),
            targets,
            project_configurations,
            target_attributes,
        })
    }

    /// Absolute path of the `.xcodeproj` bundle.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Project name: the bundle's file stem.
    pub fn name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target_named(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn target_by_id(&self, id: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Project-level configuration with the given name.
    pub fn project_configuration(&self, name: &str) -> Option<&BuildConfiguration> {
        self.project_configurations.iter().find(|c| c.name == name)
    }

    /// One attribute of a target from the project's `TargetAttributes`
    /// table, keyed by target id. Absent tables and entries yield `None`.
    pub fn target_attribute(&self, target_id: &str, key: &str) -> Option<&str> {
        self.target_attributes
            .get(target_id)
            .and_then(|attrs| attrs.get(key))
            .map(String::as_str)
    }
}

fn ids_of(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_dict(value: &Value) -> BTreeMap<String, String> {
    value
        .as_dict()
        .map(|entries| {
            entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_setting_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn configurations_of(
    objects: &BTreeMap<String, Value>,
    list_id: Option<&str>,
) -> Vec<BuildConfiguration> {
    let Some(list) = list_id.and_then(|id| objects.get(id)) else {
        return Vec::new();
    };
    ids_of(list.get("buildConfigurations"))
        .into_iter()
        .filter_map(|config_id| {
            let config = objects.get(&config_id)?;
            let name = config.get_str("name")?;
            let settings = config
                .get("buildSettings")
                .and_then(Value::as_dict)
                .cloned()
                .unwrap_or_default();
            Some(BuildConfiguration {
                name: name.to_string(),
                settings,
            })
        })
        .collect()
}

/// Resolve one `PBXTargetDependency` object into an edge. Edges the model
/// cannot resolve (no target, no proxy, dangling ids) are skipped, matching
/// how stale project files behave in practice.
fn resolve_dependency(
    objects: &BTreeMap<String, Value>,
    root_id: &str,
    dep_id: &str,
) -> Option<Dependency> {
    let dep_obj = objects.get(dep_id)?;

    if let Some(target_id) = dep_obj.get_str("target") {
        return Some(Dependency::Local(target_id.to_string()));
    }

    let proxy = objects.get(dep_obj.get_str("targetProxy")?)?;
    let target_name = proxy.get_str("remoteInfo")?.to_string();
    let portal_id = proxy.get_str("containerPortal")?;

    if portal_id == root_id {
        // Same project; pinned to an id by the caller once targets exist.
        return Some(Dependency::Remote {
            container: String::new(),
            target_name,
        });
    }

    let file_ref = objects.get(portal_id)?;
    let container = file_ref.get_str("path")?.to_string();
    Some(Dependency::Remote {
        container,
        target_name,
    })
}
