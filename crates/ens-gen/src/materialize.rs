use std::iter;
use std::sync::Arc;

use ens_core::{
    BoundFiles, Budget, EnsError, ErrorInfo, ParamSet, ParameterSpace, Permutation, RngHandle,
    SpaceShape,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{EnsembleConfig, StrategyRef};
use crate::registry::{self, Registries, ALL_PERM};
use crate::strategy::{EnsembleStrategy, PermutationStrategy};

/// Substream feeding the file-parameter axis.
pub const FILE_AXIS_STREAM: u64 = 0;
/// Substream feeding the exe-arg axis.
pub const EXE_ARG_AXIS_STREAM: u64 = 1;
/// Substream feeding the combination stage or a direct parameter-set strategy.
pub const COMBINATION_STREAM: u64 = 2;

/// One materialized ensemble member, ready to be bound to launch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// `{ensemble}-{index}`.
    pub name: String,
    /// Position in the materialized sequence.
    pub index: usize,
    /// Executable copied verbatim from the configuration.
    pub exe: String,
    /// Static executable arguments.
    pub exe_args: Vec<String>,
    /// This member's own copy of its parameter set.
    pub params: ParamSet,
    /// Staging descriptor bound to this member's file parameters.
    pub files: BoundFiles,
}

impl JobSpec {
    /// Static arguments followed by the member's exe-arg values.
    pub fn command_args(&self) -> Vec<String> {
        self.exe_args
            .iter()
            .map(String::as_str)
            .chain(self.params.flattened_exe_args())
            .map(str::to_string)
            .collect()
    }
}

/// Drives strategy resolution, generation, replication and naming against a
/// set of registries.
#[derive(Clone, Copy)]
pub struct Materializer<'r> {
    registries: &'r Registries,
}

impl Materializer<'static> {
    /// Materializer backed by the process-wide registries.
    pub fn global() -> Self {
        Self::new(registry::global())
    }
}

impl<'r> Materializer<'r> {
    pub fn new(registries: &'r Registries) -> Self {
        Self { registries }
    }

    /// Expands `config` into named, independent job specifications.
    ///
    /// An empty result is not an error here; see [`crate::as_jobs`].
    pub fn materialize(&self, config: &EnsembleConfig, seed: u64) -> Result<Vec<JobSpec>, EnsError> {
        config.validate()?;
        let param_sets = self.param_sets(config, seed)?;
        let distinct = param_sets.len();
        let members: Vec<JobSpec> = replicate(param_sets, config.replicas)
            .enumerate()
            .map(|(index, params)| JobSpec {
                name: format!("{}-{index}", config.name),
                index,
                exe: config.exe.clone(),
                exe_args: config.exe_args.clone(),
                files: BoundFiles {
                    staging: config.files.clone(),
                    params: params.file_params.clone(),
                },
                params,
            })
            .collect();
        info!(
            ensemble = %config.name,
            param_sets = distinct,
            replicas = config.replicas,
            members = members.len(),
            "materialized ensemble"
        );
        Ok(members)
    }

    /// Resolves the strategies and produces the distinct parameter sets.
    pub fn param_sets(&self, config: &EnsembleConfig, seed: u64) -> Result<Vec<ParamSet>, EnsError> {
        let budget = config.max_permutations;
        let file_space = config.file_parameters.as_ref();
        let exe_space = config.exe_arg_parameters.as_ref();
        let permutation: Arc<dyn PermutationStrategy> = match &config.permutation_strategy {
            StrategyRef::Named(name) => self.registries.permutations.resolve(name)?,
            StrategyRef::Permutations(custom) => Arc::clone(custom) as Arc<dyn PermutationStrategy>,
            StrategyRef::ParamSets(custom) => {
                debug!(strategy = custom.label(), "using caller supplied parameter-set strategy");
                let mut rng = RngHandle::for_substream(seed, COMBINATION_STREAM);
                return custom.param_sets(file_space, exe_space, budget, &mut rng);
            }
        };
        let combination_name = self.combination_name(config);
        let combination = self.registries.combinations.resolve(&combination_name)?;
        debug!(
            permutation = config.permutation_strategy.label(),
            combination = %combination_name,
            "resolved strategies"
        );

        let label = config.permutation_strategy.label();
        let mut file_rng = RngHandle::for_substream(seed, FILE_AXIS_STREAM);
        let file_perms = expand_axis(label, permutation.as_ref(), file_space, budget, &mut file_rng)?;
        let mut exe_rng = RngHandle::for_substream(seed, EXE_ARG_AXIS_STREAM);
        let exe_perms = expand_axis(label, permutation.as_ref(), exe_space, budget, &mut exe_rng)?;
        debug!(
            file_permutations = file_perms.len(),
            exe_arg_permutations = exe_perms.len(),
            "expanded parameter axes"
        );

        let mut rng = RngHandle::for_substream(seed, COMBINATION_STREAM);
        combination.combine(&file_perms, &exe_perms, budget, &mut rng)
    }

    fn combination_name(&self, config: &EnsembleConfig) -> String {
        if let Some(name) = &config.combination_strategy {
            return name.clone();
        }
        match &config.permutation_strategy {
            StrategyRef::Named(name) if self.registries.combinations.contains(name) => name.clone(),
            _ => ALL_PERM.to_string(),
        }
    }
}

/// Expands `config` with the process-wide registries.
pub fn materialize(config: &EnsembleConfig, seed: u64) -> Result<Vec<JobSpec>, EnsError> {
    Materializer::global().materialize(config, seed)
}

/// Repeats every parameter set `replicas` times, keeping copies contiguous.
pub fn replicate(
    param_sets: Vec<ParamSet>,
    replicas: usize,
) -> impl Iterator<Item = ParamSet> {
    param_sets
        .into_iter()
        .flat_map(move |param_set| iter::repeat(param_set).take(replicas))
}

/// Runs `strategy` over one axis. An axis that yields nothing falls back to
/// the single empty permutation so the combination stage always sees at least
/// one element per axis.
fn expand_axis<V: Clone>(
    label: &str,
    strategy: &dyn PermutationStrategy,
    space: Option<&ParameterSpace<V>>,
    budget: Budget,
    rng: &mut RngHandle,
) -> Result<Vec<Permutation<V>>, EnsError> {
    let shape = SpaceShape::of(space);
    let selections = strategy.permutations(&shape, budget, rng)?;
    let mut permutations = Vec::with_capacity(selections.len());
    for selection in &selections {
        match selection.assign(space) {
            Some(permutation) => permutations.push(permutation),
            None => {
                return Err(EnsError::UserStrategy(
                    ErrorInfo::new(
                        "ens.user_strategy",
                        "permutation strategy returned a selection outside the parameter space",
                    )
                    .with_context("strategy", label)
                    .with_context("selection", format!("{:?}", selection.indices())),
                ))
            }
        }
    }
    if permutations.is_empty() {
        permutations.push(Permutation::new());
    }
    Ok(permutations)
}
