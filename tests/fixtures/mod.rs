//! On-disk Xcode fixtures for resolution tests.
//!
//! Builds a small but structurally real workspace: projects with targets,
//! dependencies, configurations and schemes, written as the same OpenStep
//! and XML documents Xcode produces.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// One target of a fixture project.
pub struct TargetFixture {
    pub name: &'static str,
    pub product_type: &'static str,
    pub dependencies: Vec<&'static str>,
    pub bundle_id: &'static str,
    pub provisioning_style: Option<&'static str>,
}

pub const APPLICATION: &str = "com.apple.product-type.application";
pub const APP_EXTENSION: &str = "com.apple.product-type.app-extension";
pub const STATIC_LIBRARY: &str = "com.apple.product-type.library.static";

/// Write `<name>.xcodeproj` with the given targets under `dir`. Each target
/// gets `Release` and `Debug` configurations; `PRODUCT_NAME` is declared as
/// `$(TARGET_NAME)` so bundle ids may use setting indirection.
pub fn write_project(dir: &Path, name: &str, targets: &[TargetFixture]) -> PathBuf {
    let mut objects = String::new();
    let mut target_ids = Vec::new();
    let mut attributes = String::new();

    for target in targets {
        let id = format!("TGT_{}", target.name);
        let mut dep_ids = Vec::new();
        for dep in &target.dependencies {
            let dep_id = format!("DEP_{}_{}", target.name, dep);
            writeln!(
                objects,
                "\t\t{} = {{ isa = PBXTargetDependency; target = TGT_{}; }};",
                dep_id, dep
            )
            .unwrap();
            dep_ids.push(dep_id);
        }

        if let Some(style) = target.provisioning_style {
            writeln!(
                attributes,
                "\t\t\t\t\t{} = {{ ProvisioningStyle = {}; }};",
                id, style
            )
            .unwrap();
        }

        for configuration in ["Release", "Debug"] {
            writeln!(
                objects,
                "\t\t CFG_{name}_{cfg} = {{\n\
                 \t\t\tisa = XCBuildConfiguration;\n\
                 \t\t\tname = {cfg};\n\
                 \t\t\tbuildSettings = {{\n\
                 \t\t\t\tPRODUCT_NAME = \"$(TARGET_NAME)\";\n\
                 \t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = \"{bundle}\";\n\
                 \t\t\t\tINFOPLIST_FILE = \"{name}/Info.plist\";\n\
                 \t\t\t\tCODE_SIGN_IDENTITY = \"$(inherited)\";\n\
                 \t\t\t}};\n\
                 \t\t}};",
                name = target.name,
                cfg = configuration,
                bundle = target.bundle_id,
            )
            .unwrap();
        }

        writeln!(
            objects,
            "\t\t{id} = {{\n\
             \t\t\tisa = PBXNativeTarget;\n\
             \t\t\tname = {name};\n\
             \t\t\tproductType = \"{product}\";\n\
             \t\t\tbuildConfigurationList = LIST_{name};\n\
             \t\t\tdependencies = ( {deps} );\n\
             \t\t}};\n\
             \t\tLIST_{name} = {{\n\
             \t\t\tisa = XCConfigurationList;\n\
             \t\t\tbuildConfigurations = ( CFG_{name}_Release, CFG_{name}_Debug );\n\
             \t\t}};",
            id = id,
            name = target.name,
            product = target.product_type,
            deps = dep_ids.join(", ")
        )
        .unwrap();
        target_ids.push(id);
    }

    let document = format!(
        "// !$*UTF8*$!\n{{\n\
         \tarchiveVersion = 1;\n\
         \tclasses = {{\n\t}};\n\
         \tobjectVersion = 46;\n\
         \tobjects = {{\n\
         \t\tROOT = {{\n\
         \t\t\tisa = PBXProject;\n\
         \t\t\tattributes = {{\n\
         \t\t\t\tTargetAttributes = {{\n\
         {attributes}\
         \t\t\t\t}};\n\
         \t\t\t}};\n\
         \t\t\tbuildConfigurationList = PROJLIST;\n\
         \t\t\ttargets = ( {targets} );\n\
         \t\t}};\n\
         \t\tPROJLIST = {{\n\
         \t\t\tisa = XCConfigurationList;\n\
         \t\t\tbuildConfigurations = ( PROJCFG_Release, PROJCFG_Debug );\n\
         \t\t}};\n\
         \t\tPROJCFG_Release = {{\n\
         \t\t\tisa = XCBuildConfiguration;\n\
         \t\t\tname = Release;\n\
         \t\t\tbuildSettings = {{\n\
         \t\t\t\tCODE_SIGN_IDENTITY = \"iPhone Distribution\";\n\
         \t\t\t}};\n\
         \t\t}};\n\
         \t\tPROJCFG_Debug = {{\n\
         \t\t\tisa = XCBuildConfiguration;\n\
         \t\t\tname = Debug;\n\
         \t\t\tbuildSettings = {{\n\
         \t\t\t\tCODE_SIGN_IDENTITY = \"iPhone Developer\";\n\
         \t\t\t}};\n\
         \t\t}};\n\
         {objects}\
         \t}};\n\
         \trootObject = ROOT;\n\
         }}\n",
        attributes = attributes,
        targets = target_ids.join(", "),
        objects = objects
    );

    let project = dir.join(format!("{}.xcodeproj", name));
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("project.pbxproj"), document).unwrap();
    project
}

/// Write a shared scheme whose primary (archivable) entry points at
/// `target` inside `container`.
pub fn write_shared_scheme(project: &Path, scheme: &str, target: &str, container: &str) {
    let dir = project.join("xcshareddata").join("xcschemes");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{}.xcscheme", scheme)),
        scheme_xml(target, container),
    )
    .unwrap();
}

/// Write a user scheme for `user`, same shape as [`write_shared_scheme`].
pub fn write_user_scheme(project: &Path, scheme: &str, user: &str, target: &str, container: &str) {
    let dir = project
        .join("xcuserdata")
        .join(format!("{}.xcuserdatad", user))
        .join("xcschemes");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{}.xcscheme", scheme)),
        scheme_xml(target, container),
    )
    .unwrap();
}

fn scheme_xml(target: &str, container: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Scheme
   LastUpgradeVersion = "1250"
   version = "1.3">
   <BuildAction
      parallelizeBuildables = "YES"
      buildImplicitDependencies = "YES">
      <BuildActionEntries>
         <BuildActionEntry
            buildForTesting = "YES"
            buildForRunning = "YES"
            buildForProfiling = "YES"
            buildForArchiving = "YES"
            buildForAnalyzing = "YES">
            <BuildableReference
               BuildableIdentifier = "primary"
               BlueprintIdentifier = "TGT_{target}"
               BuildableName = "{target}.app"
               BlueprintName = "{target}"
               ReferencedContainer = "container:{container}">
            </BuildableReference>
         </BuildActionEntry>
      </BuildActionEntries>
   </BuildAction>
   <ArchiveAction
      buildConfiguration = "Release"
      revealArchiveInOrganizer = "YES">
   </ArchiveAction>
</Scheme>
"#,
        target = target,
        container = container
    )
}

/// Write a workspace bundle referencing the given project paths (relative
/// to the workspace's parent directory).
pub fn write_workspace(dir: &Path, name: &str, references: &[&str]) -> PathBuf {
    let workspace = dir.join(format!("{}.xcworkspace", name));
    fs::create_dir_all(&workspace).unwrap();

    let body: String = references
        .iter()
        .map(|r| {
            format!(
                "   <FileRef\n      location = \"group:{}\">\n   </FileRef>\n",
                r
            )
        })
        .collect();
    fs::write(
        workspace.join("contents.xcworkspacedata"),
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Workspace\n   version = \"1.0\">\n{}</Workspace>\n",
            body
        ),
    )
    .unwrap();
    workspace
}

/// The standard scenario: a workspace with an app project (app + extension
/// + static library), a Pods project, and a shared `Release` scheme.
pub fn standard_workspace(dir: &Path) -> PathBuf {
    let app_project = write_project(
        dir,
        "App",
        &[
            TargetFixture {
                name: "App",
                product_type: APPLICATION,
                dependencies: vec!["NotificationExt", "StaticLib"],
                bundle_id: "com.example.app",
                provisioning_style: Some("Manual"),
            },
            TargetFixture {
                name: "NotificationExt",
                product_type: APP_EXTENSION,
                dependencies: vec![],
                bundle_id: "com.example.app.$(PRODUCT_NAME)",
                provisioning_style: None,
            },
            TargetFixture {
                name: "StaticLib",
                product_type: STATIC_LIBRARY,
                dependencies: vec![],
                bundle_id: "",
                provisioning_style: None,
            },
        ],
    );
    write_shared_scheme(&app_project, "Release", "App", "App.xcodeproj");

    let pods_dir = dir.join("Pods");
    fs::create_dir_all(&pods_dir).unwrap();
    write_project(
        &pods_dir,
        "Pods",
        &[TargetFixture {
            name: "Pods-App",
            product_type: STATIC_LIBRARY,
            dependencies: vec![],
            bundle_id: "",
            provisioning_style: None,
        }],
    );

    write_workspace(dir, "App", &["App.xcodeproj", "Pods/Pods.xcodeproj"])
}
