//! Error taxonomy for laboratory and device operations
//!
//! Numeric helpers (quantity carry, temperature arithmetic, volatility) clamp
//! silently and never produce these errors. Devices and the laboratory raise
//! them, and the recipe interpreter decides per variant whether a failure is
//! fatal, skippable, or triggers a rollback.

use thiserror::Error;

/// Broad class of a [`LabError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller passed nothing (or nonsense) to act on
    Input,
    /// A request or deposit exceeds a hard physical bound
    Capacity,
    /// A lookup failed or a name collides with a different ingredient type
    Identity,
    /// A device is missing or detached, an ingredient is terminated, or a
    /// device holds a number of items its policy forbids
    State,
}

/// Errors raised by containers, devices and laboratories
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabError {
    #[error("container holds no ingredient")]
    EmptyContainer,
    #[error("device has no result to deliver")]
    EmptyResult,
    #[error("requested {requested} smallest units but the largest container holds {limit}")]
    ExceedsContainerCapacity { requested: u64, limit: u64 },
    #[error("requested {asked} smallest units but only {available} are in storage")]
    ExceedsStorage { asked: u64, available: u64 },
    #[error("storing would need {required:.3} storerooms but the laboratory holds {capacity}")]
    StorageCapacity { required: f64, capacity: u32 },
    #[error("no ingredient named '{name}' in this laboratory")]
    NameNotFound { name: String },
    #[error("an ingredient named '{name}' of a different type is already stored")]
    InvalidIngredient { name: String },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl LabError {
    /// Class of this error in the laboratory's error taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            LabError::EmptyContainer | LabError::EmptyResult | LabError::InvalidArgument(_) => {
                ErrorCategory::Input
            }
            LabError::ExceedsContainerCapacity { .. }
            | LabError::ExceedsStorage { .. }
            | LabError::StorageCapacity { .. } => ErrorCategory::Capacity,
            LabError::NameNotFound { .. } | LabError::InvalidIngredient { .. } => {
                ErrorCategory::Identity
            }
            LabError::InvalidState(_) => ErrorCategory::State,
        }
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        LabError::InvalidState(message.into())
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        LabError::InvalidArgument(message.into())
    }
}

/// Result alias used throughout the crate
pub type LabResult<T> = Result<T, LabError>;
