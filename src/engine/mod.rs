//! Single-call, chained, batch and preset variation APIs.

pub(crate) mod presets;
pub(crate) mod variation;
