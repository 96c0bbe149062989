pub mod materialize;
pub mod strategies;
