use ens_core::errors::EnsError;

use crate::config::EnsembleConfig;
use crate::jobs::{as_jobs, Job};
use crate::materialize::{JobSpec, Materializer};
use crate::registry::Registries;

/// An ensemble description together with its materialization entry points.
#[derive(Debug, Clone)]
pub struct Ensemble {
    config: EnsembleConfig,
}

impl Ensemble {
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Members generated with the process-wide registries.
    pub fn materialize(&self, seed: u64) -> Result<Vec<JobSpec>, EnsError> {
        Materializer::global().materialize(&self.config, seed)
    }

    /// Members generated with the given registries.
    pub fn materialize_with(&self, registries: &Registries, seed: u64) -> Result<Vec<JobSpec>, EnsError> {
        Materializer::new(registries).materialize(&self.config, seed)
    }

    /// Materializes and binds every member to `settings`.
    pub fn as_jobs<L>(&self, settings: L, seed: u64) -> Result<Vec<Job<L>>, EnsError> {
        let members = self.materialize(seed)?;
        as_jobs(members, settings)
            .map_err(|err| err.with_context("ensemble", self.config.name.clone()))
    }
}
