//! Combinatorial generation engine: expands ensemble parameter spaces through
//! pluggable strategies and materializes named, independent job specifications.

mod canonical;
mod combination;
mod config;
mod ensemble;
mod jobs;
mod manifest;
mod materialize;
mod permutation;
mod registry;
mod sandbox;
mod strategy;

pub use canonical::{from_json_slice, stable_hash_string, to_canonical_json_bytes};
pub use combination::{AllCombinations, RandomCombinations, StepCombinations};
pub use config::{EnsembleConfig, StrategyRef};
pub use ensemble::Ensemble;
pub use jobs::{as_jobs, Job};
pub use manifest::{build_manifest, Manifest};
pub use materialize::{
    materialize, replicate, JobSpec, Materializer, COMBINATION_STREAM, EXE_ARG_AXIS_STREAM,
    FILE_AXIS_STREAM,
};
pub use permutation::{AllPermutations, RandomPermutations, StepValues};
pub use registry::{
    global, register_combination_strategy, register_permutation_strategy, Registries,
    StrategyTable, ALL_PERM, RANDOM, STEP,
};
pub use sandbox::{SandboxedCombination, SandboxedEnsemble, SandboxedPermutation};
pub use strategy::{BoxError, CombinationStrategy, EnsembleStrategy, PermutationStrategy};
