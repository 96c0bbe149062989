use serde::{Deserialize, Serialize};

use crate::space::{ExeArgPermutation, FilePermutation};

/// File and executable argument assignment for a single ensemble member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParamSet {
    /// Values rendered into the member's staged configuration files.
    #[serde(default)]
    pub file_params: FilePermutation,
    /// Argument lists appended to the member's command line.
    #[serde(default)]
    pub exe_args: ExeArgPermutation,
}

impl ParamSet {
    /// Pairs a file permutation with an exe-arg permutation.
    pub fn new(file_params: FilePermutation, exe_args: ExeArgPermutation) -> Self {
        Self {
            file_params,
            exe_args,
        }
    }

    /// True when neither axis contributes anything.
    pub fn is_empty(&self) -> bool {
        self.file_params.is_empty() && self.exe_args.is_empty()
    }

    /// Exe-arg values flattened in declaration order.
    pub fn flattened_exe_args(&self) -> impl Iterator<Item = &str> + '_ {
        self.exe_args
            .values()
            .flat_map(|args| args.iter().map(String::as_str))
    }
}
