//! Built-artifact lookup.
//!
//! Locates a build product by name in an output directory: the exact
//! `<name>.<ext>` when present, otherwise the single `*.<ext>` file.
//! Several candidates cannot be disambiguated and fail the lookup.

use crate::error::Error;
use signscout_xcodeproj::parse_xml_plist;
use std::fs;
use std::path::{Path, PathBuf};

/// Read the application name from an archive's `Info.plist`; exported
/// artifacts are located under that name.
pub fn archive_app_name(archive: &Path) -> Result<String, Error> {
    let plist_path = archive.join("Info.plist");
    let content = fs::read_to_string(&plist_path).map_err(|source| Error::Io {
        path: plist_path.clone(),
        source,
    })?;
    let data = parse_xml_plist(&content).map_err(|e| {
        Error::NotFound(format!(
            "failed to read application name from {}: {}",
            plist_path.display(),
            e
        ))
    })?;

    data.get_str("Name")
        .map(str::to_string)
        .ok_or_else(|| {
            Error::NotFound(format!("no Name entry in {}", plist_path.display()))
        })
}

/// Find the artifact `<name>.<ext>` under `dir`.
pub fn locate_artifact(dir: &Path, name: &str, ext: &str) -> Result<PathBuf, Error> {
    let exact = dir.join(format!("{}.{}", name, ext));
    if exact.is_file() {
        return Ok(exact);
    }

    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == ext))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(Error::NotFound(format!(
            "no .{} found for {} in {}",
            ext,
            name,
            dir.display()
        ))),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::AmbiguousResult(format!(
            "more than one .{} found in {}: {}",
            ext,
            dir.display(),
            candidates
                .iter()
                .map(|p| p.file_name().unwrap_or_default().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("App.ipa"), b"x").unwrap();
        fs::write(dir.path().join("Other.ipa"), b"x").unwrap();

        let found = locate_artifact(dir.path(), "App", "ipa").unwrap();
        assert!(found.ends_with("App.ipa"));
    }

    #[test]
    fn test_single_fallback_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Renamed.ipa"), b"x").unwrap();

        let found = locate_artifact(dir.path(), "App", "ipa").unwrap();
        assert!(found.ends_with("Renamed.ipa"));
    }

    #[test]
    fn test_no_match_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_artifact(dir.path(), "App", "ipa").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_archive_app_name() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("App.xcarchive");
        fs::create_dir_all(&archive).unwrap();
        fs::write(
            archive.join("Info.plist"),
            "<plist version=\"1.0\"><dict><key>Name</key><string>App</string></dict></plist>",
        )
        .unwrap();

        assert_eq!(archive_app_name(&archive).unwrap(), "App");

        let empty = dir.path().join("Empty.xcarchive");
        fs::create_dir_all(&empty).unwrap();
        assert!(matches!(archive_app_name(&empty), Err(Error::Io { .. })));
    }

    #[test]
    fn test_multiple_matches_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("One.ipa"), b"x").unwrap();
        fs::write(dir.path().join("Two.ipa"), b"x").unwrap();

        let err = locate_artifact(dir.path(), "App", "ipa").unwrap_err();
        let Error::AmbiguousResult(message) = err else {
            panic!("expected ambiguous result");
        };
        assert!(message.contains("One.ipa"));
        assert!(message.contains("Two.ipa"));
    }
}
