//! Opaque descriptors owned by collaborators outside the generator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::space::FilePermutation;

/// Files to stage into every member's working directory.
///
/// The generator never reads these paths; it only binds each member's file
/// parameters next to them for the staging subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileStaging {
    /// Files or directories copied verbatim.
    #[serde(default)]
    pub copy: Vec<String>,
    /// Files or directories symlinked into place.
    #[serde(default)]
    pub symlink: Vec<String>,
    /// Template files rendered with the member's file parameters.
    #[serde(default)]
    pub configure: Vec<String>,
}

/// Staging descriptor bound to one member's file parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundFiles {
    /// Ensemble-wide staging descriptor.
    pub staging: FileStaging,
    /// File parameters used when rendering `configure` templates.
    #[serde(default)]
    pub params: FilePermutation,
}

/// Minimal launch settings handed to the launch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaunchSettings {
    /// Launcher identifier (`local`, `slurm`, ...).
    pub launcher: String,
    /// Launcher specific arguments.
    #[serde(default)]
    pub launch_args: BTreeMap<String, String>,
    /// Environment variables exported for every job.
    #[serde(default)]
    pub env_vars: BTreeMap<String, String>,
}

impl LaunchSettings {
    /// Settings for the named launcher with no extra arguments.
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
            ..Self::default()
        }
    }
}
