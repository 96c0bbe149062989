//! Parameter spaces, concrete permutations and their positional form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from parameter name to its ordered candidate values.
///
/// Declaration order is significant: it is the order of the cartesian product.
pub type ParameterSpace<V> = IndexMap<String, Vec<V>>;

/// One concrete assignment drawn from a [`ParameterSpace`].
pub type Permutation<V> = IndexMap<String, V>;

/// File parameters: every candidate is a single string.
pub type FileParameters = ParameterSpace<String>;

/// Executable argument parameters: every candidate is an argument list.
pub type ExeArgParameters = ParameterSpace<Vec<String>>;

/// Assignment of file parameters for one member.
pub type FilePermutation = Permutation<String>;

/// Assignment of executable argument parameters for one member.
pub type ExeArgPermutation = Permutation<Vec<String>>;

/// Value-free view of a parameter space: names and candidate counts.
///
/// Permutation strategies operate on the shape so the same strategy can be
/// applied to the file axis and the exe-arg axis alike.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpaceShape {
    names: Vec<String>,
    sizes: Vec<usize>,
}

impl SpaceShape {
    /// Builds the shape of `space`. `None` yields the empty shape.
    pub fn of<V>(space: Option<&ParameterSpace<V>>) -> Self {
        let Some(space) = space else {
            return Self::default();
        };
        Self {
            names: space.keys().cloned().collect(),
            sizes: space.values().map(Vec::len).collect(),
        }
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Candidate counts aligned with [`SpaceShape::names`].
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the space declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Checks that `selection` has one in-range index per declared parameter.
    pub fn admits(&self, selection: &Selection) -> bool {
        selection.len() == self.sizes.len()
            && selection
                .indices()
                .iter()
                .zip(&self.sizes)
                .all(|(idx, size)| idx < size)
    }
}

/// Positional permutation: the chosen candidate index for every parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Selection(Vec<usize>);

impl Selection {
    /// Wraps candidate indices aligned with a [`SpaceShape`].
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The selection that assigns nothing.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Candidate indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of assigned parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the selection against `space`, cloning the chosen values.
    ///
    /// Returns `None` when the selection does not fit the space.
    pub fn assign<V: Clone>(&self, space: Option<&ParameterSpace<V>>) -> Option<Permutation<V>> {
        let Some(space) = space else {
            return self.is_empty().then(Permutation::new);
        };
        if self.0.len() != space.len() {
            return None;
        }
        space
            .iter()
            .zip(&self.0)
            .map(|((name, values), idx)| values.get(*idx).map(|v| (name.clone(), v.clone())))
            .collect()
    }
}

/// Checks that every entry of `permutation` names a declared parameter and
/// holds one of its candidates. Returns the first offending parameter name.
pub fn undeclared_entry<'a, V: PartialEq>(
    permutation: &'a Permutation<V>,
    space: Option<&ParameterSpace<V>>,
) -> Option<&'a str> {
    permutation.iter().find_map(|(name, value)| {
        let declared = space
            .and_then(|space| space.get(name))
            .is_some_and(|candidates| candidates.contains(value));
        (!declared).then_some(name.as_str())
    })
}
