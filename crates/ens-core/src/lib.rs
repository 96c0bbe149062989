#![deny(missing_docs)]
#![doc = "Core data model, error taxonomy and seeding policy for ensemble generation."]

pub mod budget;
pub mod errors;
mod params;
pub mod rng;
pub mod space;
pub mod staging;

pub use budget::Budget;
pub use errors::{EnsError, ErrorInfo};
pub use params::ParamSet;
pub use rng::{derive_substream_seed, RngHandle};
pub use space::{
    ExeArgParameters, ExeArgPermutation, FileParameters, FilePermutation, ParameterSpace,
    Permutation, Selection, SpaceShape,
};
pub use staging::{BoundFiles, FileStaging, LaunchSettings};
