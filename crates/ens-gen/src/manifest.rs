use ens_core::errors::EnsError;
use serde::{Deserialize, Serialize};

use crate::config::EnsembleConfig;
use crate::canonical::stable_hash_string;
use crate::materialize::JobSpec;

/// Reproducibility record of one materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub ensemble: String,
    pub plan_hash: String,
    pub seed: u64,
    pub members: Vec<JobSpec>,
}

/// Records `members` together with a hash of the inputs that produced them.
pub fn build_manifest(
    config: &EnsembleConfig,
    seed: u64,
    members: Vec<JobSpec>,
) -> Result<Manifest, EnsError> {
    let plan_hash = stable_hash_string(&(config, seed))?;
    Ok(Manifest {
        ensemble: config.name.clone(),
        plan_hash,
        seed,
        members,
    })
}
