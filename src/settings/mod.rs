//! Per-target code-signing settings.
//!
//! Reads the fixed set of signing-relevant build settings for each resolved
//! target, after picking the effective configuration (explicit name, else
//! the scheme's archive-action default).

use crate::error::Error;
use crate::locator::absolutize;
use crate::scheme::Scheme;
use serde::Serialize;
use signscout_xcodeproj::{resolve_build_setting, Project};
use std::path::Path;

/// The signing configuration of one target, as consumed by the signing
/// automation downstream.
#[derive(Debug, Clone, Serialize)]
pub struct CodeSignInfo {
    pub project: String,
    pub info_plist_file: String,
    pub configuration: String,
    pub provisioning_style: String,
    pub bundle_id: String,
    pub code_sign_identity: String,
    pub provisioning_profile_specifier: String,
    pub provisioning_profile: String,
}

/// The configuration name to resolve settings under. The explicit request
/// value wins; otherwise the scheme's archive action supplies the default.
pub fn effective_configuration(explicit: Option<&str>, scheme: &Scheme) -> Result<String, Error> {
    if let Some(name) = explicit.filter(|c| !c.is_empty()) {
        return Ok(name.to_string());
    }

    scheme
        .archive_action
        .as_ref()
        .map(|action| action.build_configuration.clone())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            Error::Input(format!(
                "no configuration provided and no default defined for the archive action of scheme {}",
                scheme.name
            ))
        })
}

/// Read the code-signing settings of `target_name` under `configuration`.
///
/// `input` is the original project/workspace path; relative
/// `INFOPLIST_FILE` values are anchored at its parent directory.
pub fn code_sign_info(
    project: &Project,
    target_name: &str,
    configuration: &str,
    input: &Path,
) -> Result<CodeSignInfo, Error> {
    let target = project.target_named(target_name).ok_or_else(|| {
        Error::NotFound(format!(
            "target {} not found in project {}",
            target_name,
            project.path().display()
        ))
    })?;

    if target.configuration(configuration).is_none() {
        return Err(Error::NotFound(format!(
            "no build configuration found with name {} for target {}",
            configuration, target_name
        )));
    }

    let setting = |key: &str| {
        resolve_build_setting(project, target, configuration, key).unwrap_or_default()
    };

    let mut info_plist_file = setting("INFOPLIST_FILE");
    if !info_plist_file.is_empty() {
        let base = input.parent().unwrap_or_else(|| Path::new("."));
        info_plist_file = absolutize(&base.join(&info_plist_file))
            .to_string_lossy()
            .into_owned();
    }

    Ok(CodeSignInfo {
        project: project.path().to_string_lossy().into_owned(),
        info_plist_file,
        configuration: configuration.to_string(),
        provisioning_style: project
            .target_attribute(&target.id, "ProvisioningStyle")
            .unwrap_or_default()
            .to_string(),
        bundle_id: setting("PRODUCT_BUNDLE_IDENTIFIER"),
        code_sign_identity: setting("CODE_SIGN_IDENTITY"),
        provisioning_profile_specifier: setting("PROVISIONING_PROFILE_SPECIFIER"),
        provisioning_profile: setting("PROVISIONING_PROFILE"),
    })
}
