//! signscout - code-signing resolution for Xcode archive builds
//!
//! Resolves, for a project or workspace and a named scheme, the embeddable
//! targets (app plus extensions) that participate in an archive build, and
//! each target's effective code-signing configuration, without invoking a
//! build. A CI signing service uses the result to decide which certificates
//! and provisioning profiles to fetch before building.

pub mod artifact;
pub mod emitter;
pub mod error;
pub mod graph;
pub mod locator;
pub mod pipeline;
pub mod request;
pub mod scheme;
pub mod settings;

pub use error::Error;
pub use pipeline::{resolve_code_sign_infos, resolve_target_map, TargetMap};
pub use request::ResolveRequest;
pub use settings::CodeSignInfo;
