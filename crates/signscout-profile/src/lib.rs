//! Provisioning-profile decoding.
//!
//! A `.mobileprovision` file is a CMS-signed property list. Decoding goes
//! through the platform's signature-verification utility as an external
//! collaborator with a fixed contract: `security cms -D -i <path>` takes the
//! binary profile path and prints the embedded XML plist on stdout, exiting
//! non-zero on a malformed signature. This crate owns that single invocation
//! point, parses the plist, and classifies the profile's export method.

use serde::Serialize;
use signscout_xcodeproj::{parse_xml_plist, Value};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// The default install location for downloaded profiles.
pub const PROFILE_DIR: &str = "Library/MobileDevice/Provisioning Profiles";

/// `security` sometimes prefixes its plist output with this diagnostic.
const NOT_VALID_PARAMETER_MESSAGE: &str =
    "security: SecPolicySetValue: One or more parameters passed to a function were not valid.";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to run security tool on {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {}: {stderr}", path.display())]
    Decode { path: PathBuf, stderr: String },

    #[error("invalid profile plist: {0}")]
    Plist(String),

    #[error("failed to list profiles in {}: {source}", path.display())]
    List {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// How a build signed with a profile can be distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMethod {
    Development,
    AdHoc,
    Enterprise,
    AppStore,
}

impl ExportMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportMethod::Development => "development",
            ExportMethod::AdHoc => "ad-hoc",
            ExportMethod::Enterprise => "enterprise",
            ExportMethod::AppStore => "app-store",
        }
    }
}

impl std::fmt::Display for ExportMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fields of a decoded profile that signing automation consumes.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub uuid: String,
    pub team_id: String,
    pub export_method: ExportMethod,
    pub expires: String,
    pub provisioned_device_count: usize,
}

/// Decode a `.mobileprovision` file through the external `security` tool.
pub fn decode_file(path: &Path) -> Result<ProfileInfo, ProfileError> {
    let output = Command::new("security")
        .args(["cms", "-D", "-i"])
        .arg(path)
        .output()
        .map_err(|source| ProfileError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProfileError::Decode {
            path: path.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    decode_plist_text(&String::from_utf8_lossy(&output.stdout))
}

/// Decode the plist text as printed by `security cms -D`.
pub fn decode_plist_text(text: &str) -> Result<ProfileInfo, ProfileError> {
    let text = text
        .strip_prefix(NOT_VALID_PARAMETER_MESSAGE)
        .map(str::trim_start)
        .unwrap_or(text);

    let data = parse_xml_plist(text).map_err(|e| ProfileError::Plist(e.to_string()))?;
    Ok(profile_info(&data))
}

fn profile_info(data: &Value) -> ProfileInfo {
    let entitlements = data.get("Entitlements");
    let team_id = entitlements
        .and_then(|e| e.get_str("com.apple.developer.team-identifier"))
        .unwrap_or_default()
        .to_string();

    ProfileInfo {
        name: data.get_str("Name").unwrap_or_default().to_string(),
        uuid: data.get_str("UUID").unwrap_or_default().to_string(),
        team_id,
        export_method: export_method(data),
        expires: data.get_str("ExpirationDate").unwrap_or_default().to_string(),
        provisioned_device_count: data
            .get("ProvisionedDevices")
            .and_then(Value::as_array)
            .map_or(0, |devices| devices.len()),
    }
}

/// Classify the export method of a decoded profile.
///
/// No device list means store distribution: `enterprise` when the profile
/// provisions all devices, `app-store` otherwise. With a device list,
/// a debuggable profile (`get-task-allow`) is `development`, else `ad-hoc`.
pub fn export_method(data: &Value) -> ExportMethod {
    if data.get("ProvisionedDevices").and_then(Value::as_array).is_none() {
        if data
            .get("ProvisionsAllDevices")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return ExportMethod::Enterprise;
        }
        return ExportMethod::AppStore;
    }

    let debuggable = data
        .get("Entitlements")
        .and_then(|e| e.get("get-task-allow"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if debuggable {
        ExportMethod::Development
    } else {
        ExportMethod::AdHoc
    }
}

/// Enumerate installed `.mobileprovision` files under `dir`, sorted by path.
pub fn installed_profiles(dir: &Path) -> Result<Vec<PathBuf>, ProfileError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).max_depth(1) {
        let entry = entry.map_err(|source| ProfileError::List {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|e| e == "mobileprovision")
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plist(body: &str) -> String {
        format!("<plist version=\"1.0\"><dict>{}</dict></plist>", body)
    }

    #[test]
    fn test_development_profile() {
        let text = plist(
            "<key>Name</key><string>Dev</string>\
             <key>UUID</key><string>1111-2222</string>\
             <key>ProvisionedDevices</key><array><string>d1</string><string>d2</string></array>\
             <key>Entitlements</key><dict>\
               <key>get-task-allow</key><true/>\
               <key>com.apple.developer.team-identifier</key><string>TEAM123</string>\
             </dict>",
        );
        let info = decode_plist_text(&text).unwrap();
        assert_eq!(info.export_method, ExportMethod::Development);
        assert_eq!(info.team_id, "TEAM123");
        assert_eq!(info.provisioned_device_count, 2);
    }

    #[test]
    fn test_ad_hoc_profile() {
        let text = plist(
            "<key>ProvisionedDevices</key><array><string>d1</string></array>\
             <key>Entitlements</key><dict><key>get-task-allow</key><false/></dict>",
        );
        assert_eq!(
            decode_plist_text(&text).unwrap().export_method,
            ExportMethod::AdHoc
        );
    }

    #[test]
    fn test_enterprise_profile() {
        let text = plist("<key>ProvisionsAllDevices</key><true/>");
        assert_eq!(
            decode_plist_text(&text).unwrap().export_method,
            ExportMethod::Enterprise
        );
    }

    #[test]
    fn test_app_store_profile() {
        let text = plist("<key>Name</key><string>Store</string>");
        assert_eq!(
            decode_plist_text(&text).unwrap().export_method,
            ExportMethod::AppStore
        );
    }

    #[test]
    fn test_leading_security_diagnostic_is_stripped() {
        let text = format!(
            "{}\n{}",
            NOT_VALID_PARAMETER_MESSAGE,
            plist("<key>Name</key><string>Store</string>")
        );
        assert_eq!(decode_plist_text(&text).unwrap().name, "Store");
    }

    #[test]
    fn test_installed_profiles_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mobileprovision"), b"x").unwrap();
        std::fs::write(dir.path().join("a.mobileprovision"), b"x").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();

        let paths = installed_profiles(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.mobileprovision", "b.mobileprovision"]);
    }
}
