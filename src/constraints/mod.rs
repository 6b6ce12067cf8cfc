//! Brand policy: guidelines, checking and best-effort repair.

pub(crate) mod checker;
pub(crate) mod guidelines;
