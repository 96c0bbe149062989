use std::fmt;
use std::sync::Arc;

use ens_core::errors::{EnsError, ErrorInfo};
use ens_core::{Budget, ExeArgParameters, FileParameters, FileStaging};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry::ALL_PERM;
use crate::sandbox::{SandboxedEnsemble, SandboxedPermutation};

/// How an ensemble expands its parameter spaces.
#[derive(Clone)]
pub enum StrategyRef {
    /// A strategy registered under this name.
    Named(String),
    /// A caller supplied permutation function applied to each axis.
    Permutations(Arc<SandboxedPermutation>),
    /// A caller supplied function producing parameter sets directly.
    ParamSets(Arc<SandboxedEnsemble>),
}

impl StrategyRef {
    /// Reference to a registered strategy.
    pub fn named(name: impl Into<String>) -> Self {
        StrategyRef::Named(name.into())
    }

    /// Registered name, or the label of the caller supplied function.
    pub fn label(&self) -> &str {
        match self {
            StrategyRef::Named(name) => name,
            StrategyRef::Permutations(custom) => custom.label(),
            StrategyRef::ParamSets(custom) => custom.label(),
        }
    }
}

impl Default for StrategyRef {
    fn default() -> Self {
        StrategyRef::Named(ALL_PERM.to_string())
    }
}

impl fmt::Debug for StrategyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            StrategyRef::Permutations(custom) => {
                f.debug_tuple("Permutations").field(custom).finish()
            }
            StrategyRef::ParamSets(custom) => f.debug_tuple("ParamSets").field(custom).finish(),
        }
    }
}

impl From<&str> for StrategyRef {
    fn from(name: &str) -> Self {
        StrategyRef::named(name)
    }
}

impl From<String> for StrategyRef {
    fn from(name: String) -> Self {
        StrategyRef::Named(name)
    }
}

impl From<SandboxedPermutation> for StrategyRef {
    fn from(custom: SandboxedPermutation) -> Self {
        StrategyRef::Permutations(Arc::new(custom))
    }
}

impl From<SandboxedEnsemble> for StrategyRef {
    fn from(custom: SandboxedEnsemble) -> Self {
        StrategyRef::ParamSets(Arc::new(custom))
    }
}

// Custom functions serialize as their label; only names deserialize.
impl Serialize for StrategyRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for StrategyRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(StrategyRef::Named)
    }
}

/// Declarative description of an ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Ensemble name; members are called `{name}-{index}`.
    pub name: String,
    /// Executable shared by every member.
    pub exe: String,
    /// Static arguments shared by every member.
    #[serde(default)]
    pub exe_args: Vec<String>,
    /// Files staged into every member's working directory.
    #[serde(default)]
    pub files: FileStaging,
    /// File parameter space; absent and empty are equivalent.
    #[serde(default, alias = "parameters")]
    pub file_parameters: Option<FileParameters>,
    /// Executable argument parameter space; absent and empty are equivalent.
    #[serde(default)]
    pub exe_arg_parameters: Option<ExeArgParameters>,
    /// Permutation strategy name or caller supplied function.
    #[serde(default)]
    pub permutation_strategy: StrategyRef,
    /// Combination strategy name. Defaults to the permutation strategy's name
    /// when that name is a registered combination strategy, else `all_perm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination_strategy: Option<String>,
    /// Budget applied to each permutation axis and to the combination stage.
    #[serde(default)]
    pub max_permutations: Budget,
    /// Contiguous copies of every parameter set.
    #[serde(default = "default_replicas")]
    pub replicas: usize,
}

fn default_replicas() -> usize {
    1
}

impl EnsembleConfig {
    /// One replica of `exe`, all defaults otherwise.
    pub fn new(name: impl Into<String>, exe: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exe: exe.into(),
            exe_args: Vec::new(),
            files: FileStaging::default(),
            file_parameters: None,
            exe_arg_parameters: None,
            permutation_strategy: StrategyRef::default(),
            combination_strategy: None,
            max_permutations: Budget::unbounded(),
            replicas: default_replicas(),
        }
    }

    pub fn with_exe_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.exe_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files(mut self, files: FileStaging) -> Self {
        self.files = files;
        self
    }

    pub fn with_file_parameters(mut self, parameters: Option<FileParameters>) -> Self {
        self.file_parameters = parameters;
        self
    }

    pub fn with_exe_arg_parameters(mut self, parameters: Option<ExeArgParameters>) -> Self {
        self.exe_arg_parameters = parameters;
        self
    }

    pub fn with_permutation_strategy(mut self, strategy: impl Into<StrategyRef>) -> Self {
        self.permutation_strategy = strategy.into();
        self
    }

    pub fn with_combination_strategy(mut self, name: impl Into<String>) -> Self {
        self.combination_strategy = Some(name.into());
        self
    }

    /// Sets the budget from a `max_permutations` value (`<= 0` is unbounded).
    pub fn with_max_permutations(mut self, max_permutations: i64) -> Self {
        self.max_permutations = Budget::from_max_permutations(max_permutations);
        self
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Parses a YAML ensemble description.
    pub fn from_yaml_str(text: &str) -> Result<Self, EnsError> {
        serde_yaml::from_str(text).map_err(|err| {
            EnsError::Serde(
                ErrorInfo::new("ens.config_parse", "invalid YAML ensemble")
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Parses a JSON ensemble description.
    pub fn from_json_str(text: &str) -> Result<Self, EnsError> {
        serde_json::from_str(text).map_err(|err| {
            EnsError::Serde(
                ErrorInfo::new("ens.config_parse", "invalid JSON ensemble")
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Rejects configurations that cannot name or launch their members.
    pub fn validate(&self) -> Result<(), EnsError> {
        if self.name.trim().is_empty() {
            return Err(EnsError::Config(ErrorInfo::new(
                "ens.config_name",
                "ensemble name must not be empty",
            )));
        }
        if self.exe.trim().is_empty() {
            return Err(EnsError::Config(
                ErrorInfo::new("ens.config_exe", "ensemble executable must not be empty")
                    .with_context("ensemble", self.name.clone()),
            ));
        }
        Ok(())
    }
}
