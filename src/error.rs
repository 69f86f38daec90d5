use alloc::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by the map, the table and the load policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A read-only keyed access found no entry for the key.
    #[error("key not found")]
    KeyNotFound,
    /// Reserving room in the element store failed.
    #[error(transparent)]
    Reserve(#[from] TryReserveError),
    /// A [`LoadPolicy`](crate::policy::LoadPolicy) was built from unusable
    /// thresholds.
    #[error("invalid load policy: {0}")]
    InvalidPolicy(&'static str),
}
