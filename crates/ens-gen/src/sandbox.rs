//! Isolation boundary around caller supplied strategies.
//!
//! Every adapter runs the wrapped function under `catch_unwind`, converts its
//! error or panic into [`EnsError::UserStrategy`] labelled with the callable,
//! validates the returned shape against the inputs and finally applies the
//! budget.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use ens_core::space::undeclared_entry;
use ens_core::{
    Budget, EnsError, ErrorInfo, ExeArgParameters, ExeArgPermutation, FileParameters,
    FilePermutation, ParamSet, ParameterSpace, Permutation, RngHandle, Selection, SpaceShape,
};
use tracing::{debug, warn};

use crate::strategy::{BoxError, CombinationStrategy, EnsembleStrategy, PermutationStrategy};

type PermutationFn =
    dyn Fn(&SpaceShape, Budget, &mut RngHandle) -> Result<Vec<Selection>, BoxError> + Send + Sync;

type CombinationFn = dyn Fn(&[FilePermutation], &[ExeArgPermutation], Budget, &mut RngHandle) -> Result<Vec<ParamSet>, BoxError>
    + Send
    + Sync;

type EnsembleFn = dyn Fn(
        Option<&FileParameters>,
        Option<&ExeArgParameters>,
        Budget,
        &mut RngHandle,
    ) -> Result<Vec<ParamSet>, BoxError>
    + Send
    + Sync;

/// Caller supplied permutation function (legacy single-space shape).
pub struct SandboxedPermutation {
    label: String,
    func: Box<PermutationFn>,
}

impl SandboxedPermutation {
    /// Wraps `func`; `label` identifies it in error reports.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&SpaceShape, Budget, &mut RngHandle) -> Result<Vec<Selection>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            label: label.into(),
            func: Box::new(func),
        }
    }

    /// Label of the wrapped callable.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PermutationStrategy for SandboxedPermutation {
    fn permutations(
        &self,
        shape: &SpaceShape,
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<Selection>, EnsError> {
        let selections = guarded(&self.label, || (self.func)(shape, budget, rng))?;
        if let Some(pos) = selections.iter().position(|s| !shape.admits(s)) {
            return Err(malformed(
                &self.label,
                format!("selection {pos} does not fit the parameter space"),
            ));
        }
        Ok(within_budget(&self.label, selections, budget))
    }
}

impl fmt::Debug for SandboxedPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxedPermutation")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Caller supplied combination function.
pub struct SandboxedCombination {
    label: String,
    func: Box<CombinationFn>,
}

impl SandboxedCombination {
    /// Wraps `func`; `label` identifies it in error reports.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(
                &[FilePermutation],
                &[ExeArgPermutation],
                Budget,
                &mut RngHandle,
            ) -> Result<Vec<ParamSet>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            label: label.into(),
            func: Box::new(func),
        }
    }

    /// Label of the wrapped callable.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl CombinationStrategy for SandboxedCombination {
    fn combine(
        &self,
        file_params: &[FilePermutation],
        exe_args: &[ExeArgPermutation],
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError> {
        let param_sets = guarded(&self.label, || {
            (self.func)(file_params, exe_args, budget, rng)
        })?;
        let file_catalog = catalog(file_params);
        let exe_catalog = catalog(exe_args);
        check_param_sets(
            &self.label,
            &param_sets,
            Some(&file_catalog),
            Some(&exe_catalog),
        )?;
        Ok(within_budget(&self.label, param_sets, budget))
    }
}

impl fmt::Debug for SandboxedCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxedCombination")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Caller supplied function producing parameter sets from both spaces.
pub struct SandboxedEnsemble {
    label: String,
    func: Box<EnsembleFn>,
}

impl SandboxedEnsemble {
    /// Wraps `func`; `label` identifies it in error reports.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(
                Option<&FileParameters>,
                Option<&ExeArgParameters>,
                Budget,
                &mut RngHandle,
            ) -> Result<Vec<ParamSet>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            label: label.into(),
            func: Box::new(func),
        }
    }

    /// Label of the wrapped callable.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl EnsembleStrategy for SandboxedEnsemble {
    fn param_sets(
        &self,
        file_params: Option<&FileParameters>,
        exe_args: Option<&ExeArgParameters>,
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError> {
        let param_sets = guarded(&self.label, || {
            (self.func)(file_params, exe_args, budget, rng)
        })?;
        check_param_sets(&self.label, &param_sets, file_params, exe_args)?;
        Ok(within_budget(&self.label, param_sets, budget))
    }
}

impl fmt::Debug for SandboxedEnsemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SandboxedEnsemble")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn guarded<T>(
    label: &str,
    call: impl FnOnce() -> Result<T, BoxError>,
) -> Result<T, EnsError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(strategy = label, error = %err, "user strategy failed");
            Err(user_error(label, "user strategy returned an error", err.to_string()))
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!(strategy = label, %reason, "user strategy panicked");
            Err(user_error(label, "user strategy panicked", reason))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn user_error(label: &str, message: &str, reason: impl Into<String>) -> EnsError {
    EnsError::UserStrategy(
        ErrorInfo::new("ens.user_strategy", message)
            .with_context("strategy", label)
            .with_context("reason", reason),
    )
}

fn malformed(label: &str, reason: impl Into<String>) -> EnsError {
    user_error(label, "user strategy returned malformed output", reason)
}

fn check_param_sets(
    label: &str,
    param_sets: &[ParamSet],
    file_space: Option<&FileParameters>,
    exe_space: Option<&ExeArgParameters>,
) -> Result<(), EnsError> {
    for (pos, param_set) in param_sets.iter().enumerate() {
        if let Some(name) = undeclared_entry(&param_set.file_params, file_space) {
            return Err(malformed(
                label,
                format!("param set {pos}: file parameter `{name}` is undeclared or has an unknown value"),
            ));
        }
        if let Some(name) = undeclared_entry(&param_set.exe_args, exe_space) {
            return Err(malformed(
                label,
                format!("param set {pos}: exe-arg parameter `{name}` is undeclared or has an unknown value"),
            ));
        }
    }
    Ok(())
}

/// Every value each parameter takes across `permutations`.
fn catalog<V: Clone + PartialEq>(permutations: &[Permutation<V>]) -> ParameterSpace<V> {
    let mut space = ParameterSpace::new();
    for permutation in permutations {
        for (name, value) in permutation {
            let values: &mut Vec<V> = space.entry(name.clone()).or_default();
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
    }
    space
}

fn within_budget<T>(label: &str, items: Vec<T>, budget: Budget) -> Vec<T> {
    let returned = items.len();
    let kept = budget.truncate(items);
    if kept.len() < returned {
        debug!(
            strategy = label,
            returned,
            kept = kept.len(),
            "truncated user strategy output to budget"
        );
    }
    kept
}
