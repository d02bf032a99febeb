//! signscout CLI
//!
//! Entry point for the `signscout` command-line tool. Every subcommand
//! writes exactly one JSON document to stdout and reports failure through
//! the exit code; diagnostics go to stderr.

use clap::{Parser, Subcommand};
use serde_json::json;
use signscout::{emitter, error::Error, ResolveRequest};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "signscout")]
#[command(about = "Code-signing resolution for Xcode archive builds", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the embeddable targets and signing settings of a scheme
    Resolve {
        /// Path to the .xcodeproj or .xcworkspace
        #[arg(long)]
        project: PathBuf,

        /// Scheme name
        #[arg(long)]
        scheme: String,

        /// User name, for locating private schemes
        #[arg(long)]
        user: String,

        /// Build configuration (default: the scheme's archive configuration)
        #[arg(long)]
        configuration: Option<String>,

        /// Emit only the project-to-target-names mapping
        #[arg(long)]
        targets_only: bool,
    },

    /// Provisioning-profile commands
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },

    /// Locate a built artifact by name
    Artifact {
        /// Directory to search
        #[arg(long)]
        dir: PathBuf,

        /// Artifact base name
        #[arg(long)]
        name: Option<String>,

        /// Read the artifact name from this .xcarchive instead
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Artifact extension (e.g. "ipa")
        #[arg(long)]
        ext: String,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Decode one .mobileprovision file
    Show {
        /// Path to the profile
        #[arg(long)]
        path: PathBuf,
    },

    /// List installed .mobileprovision files
    List {
        /// Profile directory (default: ~/Library/MobileDevice/Provisioning Profiles)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Resolve {
            project,
            scheme,
            user,
            configuration,
            targets_only,
        } => run_resolve(project, scheme, user, configuration, targets_only),
        Commands::Profile { action } => match action {
            ProfileCommands::Show { path } => {
                emitter::emit(signscout_profile::decode_file(&path).map_err(Error::from))
            }
            ProfileCommands::List { dir } => run_profile_list(dir),
        },
        Commands::Artifact {
            dir,
            name,
            archive,
            ext,
        } => run_artifact(dir, name, archive, ext),
    };

    process::exit(code);
}

fn run_resolve(
    project: PathBuf,
    scheme: String,
    user: String,
    configuration: Option<String>,
    targets_only: bool,
) -> i32 {
    let request = match ResolveRequest::new(project, scheme, user, configuration) {
        Ok(request) => request,
        Err(error) => return emitter::emit(Err::<(), _>(error)),
    };

    if targets_only {
        emitter::emit(signscout::resolve_target_map(&request))
    } else {
        emitter::emit(signscout::resolve_code_sign_infos(&request))
    }
}

fn run_artifact(dir: PathBuf, name: Option<String>, archive: Option<PathBuf>, ext: String) -> i32 {
    let name = match (name, archive) {
        (Some(name), _) => Ok(name),
        (None, Some(archive)) => signscout::artifact::archive_app_name(&archive),
        (None, None) => Err(Error::Input("name".to_string())),
    };

    emitter::emit(
        name.and_then(|name| signscout::artifact::locate_artifact(&dir, &name, &ext))
            .map(|path| json!({ "path": path.to_string_lossy() })),
    )
}

fn run_profile_list(dir: Option<PathBuf>) -> i32 {
    let dir = match dir {
        Some(dir) => dir,
        None => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(signscout_profile::PROFILE_DIR),
            Err(_) => {
                eprintln!("Cannot determine home directory; pass --dir explicitly.");
                return emitter::emit(Err::<(), _>(Error::Input("dir".to_string())));
            }
        },
    };

    emitter::emit(
        signscout_profile::installed_profiles(&dir)
            .map(|paths| {
                paths
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
            })
            .map_err(Error::from),
    )
}
