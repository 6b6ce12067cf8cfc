//! Operator and parameter sampling for batch generation.

pub(crate) mod sampler;
