//! Build-setting resolution.
//!
//! A setting's raw value lives on the target's configuration, falling back to
//! the project-level configuration of the same name; `$(inherited)` in a
//! target value splices in the project value. Resolved values then get
//! `$(VAR)` / `${VAR}` substitution against the same chain plus a few
//! builtins, with `:modifier` suffixes (e.g. `:rfc1034identifier`) ignored.
//! Unknown variables expand to the empty string.

use crate::project::{Project, Target};
use crate::value::Value;

/// Substitution recursion bound; real setting chains are two or three deep.
const MAX_DEPTH: usize = 8;

/// Resolve one build setting for `target` under the named configuration.
/// `None` means the key is unset at both the target and project level.
pub fn resolve_build_setting(
    project: &Project,
    target: &Target,
    configuration: &str,
    key: &str,
) -> Option<String> {
    let raw = raw_setting(project, target, configuration, key)?;
    Some(expand(&raw, project, target, configuration, MAX_DEPTH))
}

fn raw_setting(
    project: &Project,
    target: &Target,
    configuration: &str,
    key: &str,
) -> Option<String> {
    let target_value = target
        .configuration(configuration)
        .and_then(|c| c.setting(key))
        .map(Value::to_setting_string);
    let project_value = project
        .project_configuration(configuration)
        .and_then(|c| c.setting(key))
        .map(Value::to_setting_string);

    match (target_value, project_value) {
        (Some(t), p) => Some(splice_inherited(&t, p.as_deref())),
        (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

fn splice_inherited(value: &str, inherited: Option<&str>) -> String {
    let inherited = inherited.unwrap_or("");
    value
        .replace("$(inherited)", inherited)
        .replace("${inherited}", inherited)
}

fn expand(
    value: &str,
    project: &Project,
    target: &Target,
    configuration: &str,
    depth: usize,
) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || !matches!(chars.peek(), Some('(') | Some('{')) {
            result.push(c);
            continue;
        }
        let close = if chars.next() == Some('(') { ')' } else { '}' };
        let reference: String = chars.by_ref().take_while(|&ch| ch != close).collect();
        // `$(NAME:modifier)` — the modifier never affects which value is read
        let name = reference.split(':').next().unwrap_or_default();
        result.push_str(&lookup(name, project, target, configuration, depth));
    }

    result
}

fn lookup(
    name: &str,
    project: &Project,
    target: &Target,
    configuration: &str,
    depth: usize,
) -> String {
    if depth == 0 || name.is_empty() || name == "inherited" {
        return String::new();
    }

    if let Some(raw) = raw_setting(project, target, configuration, name) {
        return expand(&raw, project, target, configuration, depth - 1);
    }

    match name {
        "TARGET_NAME" | "PRODUCT_NAME" => target.name.clone(),
        "PROJECT_NAME" | "PROJECT" => project.name().to_string(),
        "CONFIGURATION" => configuration.to_string(),
        _ => String::new(),
    }
}
