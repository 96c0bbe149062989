use ens_core::{Budget, EnsError, RngHandle, Selection, SpaceShape};
use rand::seq::index;

use crate::strategy::PermutationStrategy;

/// Exhaustive cartesian product in declaration order, truncated to the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPermutations;

/// Positional zip of every candidate list, stopping at the shortest.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepValues;

/// Uniform sample without replacement from the full cartesian product.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPermutations;

impl PermutationStrategy for AllPermutations {
    fn permutations(
        &self,
        shape: &SpaceShape,
        budget: Budget,
        _rng: &mut RngHandle,
    ) -> Result<Vec<Selection>, EnsError> {
        Ok(cartesian(shape, budget))
    }
}

impl PermutationStrategy for StepValues {
    fn permutations(
        &self,
        shape: &SpaceShape,
        budget: Budget,
        _rng: &mut RngHandle,
    ) -> Result<Vec<Selection>, EnsError> {
        if shape.is_empty() {
            return Ok(vec![Selection::empty()]);
        }
        let steps = shape.sizes().iter().copied().min().unwrap_or(0);
        Ok((0..budget.cap(steps))
            .map(|step| Selection::new(vec![step; shape.len()]))
            .collect())
    }
}

impl PermutationStrategy for RandomPermutations {
    fn permutations(
        &self,
        shape: &SpaceShape,
        budget: Budget,
        rng: &mut RngHandle,
    ) -> Result<Vec<Selection>, EnsError> {
        let all = cartesian(shape, Budget::unbounded());
        Ok(sample_without_replacement(all, budget, rng))
    }
}

/// Cartesian product of every candidate index, rightmost parameter varying
/// fastest. Generation stops as soon as the budget is exhausted.
pub(crate) fn cartesian(shape: &SpaceShape, budget: Budget) -> Vec<Selection> {
    let sizes = shape.sizes();
    if sizes.contains(&0) {
        return Vec::new();
    }
    let total = sizes
        .iter()
        .try_fold(1usize, |acc, size| acc.checked_mul(*size))
        .unwrap_or(usize::MAX);
    let mut outputs = Vec::with_capacity(budget.cap(total).min(4096));
    let mut current = vec![0usize; sizes.len()];
    loop {
        if budget.is_exhausted(outputs.len()) {
            return outputs;
        }
        outputs.push(Selection::new(current.clone()));
        let mut pos = sizes.len();
        loop {
            if pos == 0 {
                return outputs;
            }
            pos -= 1;
            current[pos] += 1;
            if current[pos] < sizes[pos] {
                break;
            }
            current[pos] = 0;
        }
    }
}

/// Keeps everything when the budget admits it, otherwise draws `limit` items
/// without replacement.
pub(crate) fn sample_without_replacement<T>(
    items: Vec<T>,
    budget: Budget,
    rng: &mut RngHandle,
) -> Vec<T> {
    let Some(limit) = budget.limit() else {
        return items;
    };
    if limit >= items.len() {
        return items;
    }
    let picked = index::sample(rng.std_rng_mut(), items.len(), limit);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ens_core::FileParameters;

    fn shape(sizes: &[usize]) -> SpaceShape {
        let space: FileParameters = sizes
            .iter()
            .enumerate()
            .map(|(idx, size)| {
                (
                    format!("P{idx}"),
                    (0..*size).map(|v| v.to_string()).collect(),
                )
            })
            .collect();
        SpaceShape::of(Some(&space))
    }

    fn indices(selections: &[Selection]) -> Vec<Vec<usize>> {
        selections.iter().map(|s| s.indices().to_vec()).collect()
    }

    #[test]
    fn cartesian_uses_product_order() {
        let out = cartesian(&shape(&[2, 2]), Budget::unbounded());
        assert_eq!(
            indices(&out),
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
    }

    #[test]
    fn cartesian_of_empty_shape_is_single_empty_selection() {
        let out = cartesian(&SpaceShape::default(), Budget::at_most(3));
        assert_eq!(out, vec![Selection::empty()]);
    }

    #[test]
    fn cartesian_stops_at_budget() {
        let out = cartesian(&shape(&[3, 3, 3]), Budget::at_most(4));
        assert_eq!(out.len(), 4);
        assert_eq!(out[3].indices(), [0, 1, 0]);
    }

    #[test]
    fn step_stops_at_shortest() {
        let mut rng = RngHandle::from_seed(0);
        let out = StepValues
            .permutations(&shape(&[3, 2, 4]), Budget::unbounded(), &mut rng)
            .unwrap();
        assert_eq!(indices(&out), vec![vec![0, 0, 0], vec![1, 1, 1]]);
        let none = StepValues
            .permutations(&shape(&[3, 0]), Budget::unbounded(), &mut rng)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn random_samples_distinct_members() {
        let mut rng = RngHandle::from_seed(99);
        let out = RandomPermutations
            .permutations(&shape(&[4, 4]), Budget::at_most(5), &mut rng)
            .unwrap();
        assert_eq!(out.len(), 5);
        let mut unique = out.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn random_returns_everything_when_budget_is_large() {
        let mut rng = RngHandle::from_seed(1);
        let out = RandomPermutations
            .permutations(&shape(&[2, 2]), Budget::at_most(30), &mut rng)
            .unwrap();
        assert_eq!(out, cartesian(&shape(&[2, 2]), Budget::unbounded()));
    }
}
