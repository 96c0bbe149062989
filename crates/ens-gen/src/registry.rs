use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use ens_core::errors::{EnsError, ErrorInfo};
use indexmap::IndexMap;
use tracing::debug;

use crate::combination::{AllCombinations, RandomCombinations, StepCombinations};
use crate::permutation::{AllPermutations, RandomPermutations, StepValues};
use crate::strategy::{CombinationStrategy, PermutationStrategy};

/// Name of the exhaustive strategy in both registries.
pub const ALL_PERM: &str = "all_perm";
/// Name of the positional strategy in both registries.
pub const STEP: &str = "step";
/// Name of the sampling strategy in both registries.
pub const RANDOM: &str = "random";

/// Name-keyed table of strategies of one kind.
///
/// Registration takes the write lock, so two concurrent registrations of the
/// same name always resolve to exactly one success and one
/// [`EnsError::DuplicateStrategy`]. Lookups only take the read lock.
pub struct StrategyTable<S: ?Sized> {
    kind: &'static str,
    entries: RwLock<IndexMap<String, Arc<S>>>,
}

impl<S: ?Sized> StrategyTable<S> {
    /// Creates an empty table; `kind` names the table in diagnostics.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Inserts `strategy` under `name`, refusing to overwrite.
    pub fn register(&self, name: impl Into<String>, strategy: Arc<S>) -> Result<(), EnsError> {
        let name = name.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&name) {
            return Err(EnsError::DuplicateStrategy(
                ErrorInfo::new(
                    "ens.duplicate_strategy",
                    format!("a {} strategy named '{name}' is already registered", self.kind),
                )
                .with_context("strategy", name.clone())
                .with_context("kind", self.kind),
            ));
        }
        debug!(kind = self.kind, strategy = %name, "registered strategy");
        entries.insert(name, strategy);
        Ok(())
    }

    /// Looks up `name`; the error lists every registered name.
    pub fn resolve(&self, name: &str) -> Result<Arc<S>, EnsError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(name) {
            Some(strategy) => Ok(Arc::clone(strategy)),
            None => {
                let known = entries.keys().cloned().collect::<Vec<_>>().join(", ");
                Err(EnsError::StrategyNotFound(
                    ErrorInfo::new(
                        "ens.strategy_not_found",
                        format!("failed to find a {} strategy named '{name}'", self.kind),
                    )
                    .with_context("strategy", name)
                    .with_context("kind", self.kind)
                    .with_context("known", known.clone())
                    .with_hint(format!("known strategies are: {known}")),
                ))
            }
        }
    }

    /// True when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

/// The permutation and combination registries consulted during materialization.
pub struct Registries {
    /// Strategies expanding a single parameter space.
    pub permutations: StrategyTable<dyn PermutationStrategy>,
    /// Strategies merging the two permutation axes.
    pub combinations: StrategyTable<dyn CombinationStrategy>,
}

impl Registries {
    /// Registries without any strategy.
    pub fn empty() -> Self {
        Self {
            permutations: StrategyTable::new("permutation"),
            combinations: StrategyTable::new("combination"),
        }
    }

    /// Registries holding the `all_perm`, `step` and `random` built-ins.
    pub fn with_builtins() -> Self {
        let registries = Self::empty();
        let builtins: [(&str, Arc<dyn PermutationStrategy>, Arc<dyn CombinationStrategy>); 3] = [
            (ALL_PERM, Arc::new(AllPermutations), Arc::new(AllCombinations)),
            (STEP, Arc::new(StepValues), Arc::new(StepCombinations)),
            (RANDOM, Arc::new(RandomPermutations), Arc::new(RandomCombinations)),
        ];
        for (name, permutation, combination) in builtins {
            // Fresh tables cannot collide.
            let _ = registries.permutations.register(name, permutation);
            let _ = registries.combinations.register(name, combination);
        }
        registries
    }

    /// Registers a permutation strategy under `name`.
    pub fn register_permutation<S>(&self, name: impl Into<String>, strategy: S) -> Result<(), EnsError>
    where
        S: PermutationStrategy + 'static,
    {
        self.permutations.register(name, Arc::new(strategy))
    }

    /// Registers a combination strategy under `name`.
    pub fn register_combination<S>(&self, name: impl Into<String>, strategy: S) -> Result<(), EnsError>
    where
        S: CombinationStrategy + 'static,
    {
        self.combinations.register(name, Arc::new(strategy))
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::with_builtins()
    }
}

static GLOBAL: OnceLock<Registries> = OnceLock::new();

/// Process-wide registries, populated with the built-ins on first use.
pub fn global() -> &'static Registries {
    GLOBAL.get_or_init(Registries::with_builtins)
}

/// Registers a permutation strategy in the process-wide registry.
///
/// Intended for start-up, before any materialization runs.
pub fn register_permutation_strategy<S>(name: impl Into<String>, strategy: S) -> Result<(), EnsError>
where
    S: PermutationStrategy + 'static,
{
    global().register_permutation(name, strategy)
}

/// Registers a combination strategy in the process-wide registry.
pub fn register_combination_strategy<S>(name: impl Into<String>, strategy: S) -> Result<(), EnsError>
where
    S: CombinationStrategy + 'static,
{
    global().register_combination(name, strategy)
}
