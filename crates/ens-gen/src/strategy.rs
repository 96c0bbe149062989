use ens_core::{
    Budget, EnsError, ExeArgParameters, ExeArgPermutation, FileParameters, FilePermutation,
    ParamSet, RngHandle, Selection, SpaceShape,
};

/// Error type returned by caller supplied strategy functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Expands one parameter space into positional permutations.
///
/// Implementations receive the value-free [`SpaceShape`] so the same strategy
/// serves both the file axis and the exe-arg axis. The budget must be honoured
/// by the implementation itself.
pub trait PermutationStrategy: Send + Sync {
    /// Returns the selections for `shape`, at most `budget` of them.
    fn permutations(
        &self,
        shape: &SpaceShape,
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<Selection>, EnsError>;
}

/// Merges file permutations with exe-arg permutations into parameter sets.
pub trait CombinationStrategy: Send + Sync {
    /// Returns the combined parameter sets, at most `budget` of them.
    fn combine(
        &self,
        file_params: &[FilePermutation],
        exe_args: &[ExeArgPermutation],
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError>;
}

/// Produces parameter sets straight from both parameter spaces, replacing the
/// permutation and combination stages.
pub trait EnsembleStrategy: Send + Sync {
    /// Returns the parameter sets for the two spaces.
    fn param_sets(
        &self,
        file_params: Option<&FileParameters>,
        exe_args: Option<&ExeArgParameters>,
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError>;
}
