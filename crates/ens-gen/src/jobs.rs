use std::sync::Arc;

use ens_core::errors::{EnsError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::materialize::JobSpec;

/// A job specification bound to the settings it will be launched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job<L> {
    /// The materialized member.
    pub spec: JobSpec,
    /// Launch settings shared by every job of the ensemble.
    pub settings: Arc<L>,
}

/// Binds every member to `settings`.
///
/// Fails with [`EnsError::EmptyEnsemble`] when there is nothing to launch;
/// that is always a misconfigured parameter space or `replicas: 0`.
pub fn as_jobs<L>(specs: Vec<JobSpec>, settings: L) -> Result<Vec<Job<L>>, EnsError> {
    if specs.is_empty() {
        return Err(EnsError::EmptyEnsemble(
            ErrorInfo::new("ens.empty_ensemble", "there are no members in this ensemble")
                .with_hint("check `replicas` and the parameter spaces"),
        ));
    }
    let settings = Arc::new(settings);
    Ok(specs
        .into_iter()
        .map(|spec| Job {
            spec,
            settings: Arc::clone(&settings),
        })
        .collect())
}
