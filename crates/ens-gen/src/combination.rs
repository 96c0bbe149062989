use ens_core::{
    Budget, EnsError, ExeArgPermutation, FilePermutation, ParamSet, Permutation, RngHandle,
};

use crate::permutation::sample_without_replacement;
use crate::strategy::CombinationStrategy;

/// Cartesian product of both axes: exe-arg permutations outer, file
/// permutations inner, truncated to the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCombinations;

/// Positional pairing of both axes. An axis that only holds the empty
/// permutation contributes nothing instead of shortening the other axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepCombinations;

/// Uniform sample without replacement from [`AllCombinations`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCombinations;

impl CombinationStrategy for AllCombinations {
    fn combine(
        &self,
        file_params: &[FilePermutation],
        exe_args: &[ExeArgPermutation],
        budget: Budget,
        _rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError> {
        Ok(product(file_params, exe_args, budget))
    }
}

impl CombinationStrategy for StepCombinations {
    fn combine(
        &self,
        file_params: &[FilePermutation],
        exe_args: &[ExeArgPermutation],
        budget: Budget,
        _rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError> {
        let file_unset = is_unset(file_params);
        let exe_unset = is_unset(exe_args);
        let steps = match (file_unset, exe_unset) {
            (true, _) => exe_args.len(),
            (false, true) => file_params.len(),
            (false, false) => file_params.len().min(exe_args.len()),
        };
        let empty_file = FilePermutation::new();
        let empty_exe = ExeArgPermutation::new();
        Ok((0..budget.cap(steps))
            .map(|step| {
                let file = if file_unset {
                    &empty_file
                } else {
                    &file_params[step]
                };
                let exe = if exe_unset {
                    &empty_exe
                } else {
                    &exe_args[step]
                };
                ParamSet::new(file.clone(), exe.clone())
            })
            .collect())
    }
}

impl CombinationStrategy for RandomCombinations {
    fn combine(
        &self,
        file_params: &[FilePermutation],
        exe_args: &[ExeArgPermutation],
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<ParamSet>, EnsError> {
        let all = product(file_params, exe_args, Budget::unbounded());
        Ok(sample_without_replacement(all, budget, rng))
    }
}

fn product(
    file_params: &[FilePermutation],
    exe_args: &[ExeArgPermutation],
    budget: Budget,
) -> Vec<ParamSet> {
    let total = exe_args.len().saturating_mul(file_params.len());
    let mut outputs = Vec::with_capacity(budget.cap(total));
    for exe in exe_args {
        for file in file_params {
            if budget.is_exhausted(outputs.len()) {
                return outputs;
            }
            outputs.push(ParamSet::new(file.clone(), exe.clone()));
        }
    }
    outputs
}

/// True for an axis that holds only the empty permutation.
fn is_unset<V>(axis: &[Permutation<V>]) -> bool {
    matches!(axis, [only] if only.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(values: &[&str]) -> Vec<FilePermutation> {
        values
            .iter()
            .map(|v| [("SPAM".to_string(), v.to_string())].into_iter().collect())
            .collect()
    }

    fn exes(values: &[&str]) -> Vec<ExeArgPermutation> {
        values
            .iter()
            .map(|v| [("EXE".to_string(), vec![v.to_string()])].into_iter().collect())
            .collect()
    }

    #[test]
    fn product_is_exe_outer_file_inner() {
        let mut rng = RngHandle::from_seed(0);
        let out = AllCombinations
            .combine(&files(&["a", "b"]), &exes(&["x", "y"]), Budget::at_most(3), &mut rng)
            .unwrap();
        let pairs: Vec<_> = out
            .iter()
            .map(|ps| (ps.file_params["SPAM"].as_str(), ps.exe_args["EXE"][0].as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "x"), ("b", "x"), ("a", "y")]);
    }

    #[test]
    fn product_of_unset_axes_is_one_empty_set() {
        let mut rng = RngHandle::from_seed(0);
        let out = AllCombinations
            .combine(
                &[FilePermutation::new()],
                &[ExeArgPermutation::new()],
                Budget::unbounded(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(out, vec![ParamSet::default()]);
    }

    #[test]
    fn step_keeps_stepped_axis_when_other_is_unset() {
        let mut rng = RngHandle::from_seed(0);
        let out = StepCombinations
            .combine(
                &[FilePermutation::new()],
                &exes(&["x", "y", "z"]),
                Budget::unbounded(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|ps| ps.file_params.is_empty()));

        let out = StepCombinations
            .combine(
                &files(&["a", "b"]),
                &[ExeArgPermutation::new()],
                Budget::at_most(1),
                &mut rng,
            )
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].file_params["SPAM"], "a");
    }

    #[test]
    fn step_pairs_to_shortest_axis() {
        let mut rng = RngHandle::from_seed(0);
        let out = StepCombinations
            .combine(&files(&["a", "b", "c"]), &exes(&["x", "y"]), Budget::unbounded(), &mut rng)
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].file_params["SPAM"], "b");
        assert_eq!(out[1].exe_args["EXE"], ["y"]);
    }

    #[test]
    fn random_is_reproducible_for_a_seed() {
        let run = |seed| {
            let mut rng = RngHandle::from_seed(seed);
            RandomCombinations
                .combine(
                    &files(&["a", "b", "c"]),
                    &exes(&["x", "y", "z"]),
                    Budget::at_most(4),
                    &mut rng,
                )
                .unwrap()
        };
        assert_eq!(run(5), run(5));
        assert_eq!(run(5).len(), 4);
    }
}
