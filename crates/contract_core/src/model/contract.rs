//! Contract domain model.
//!
//! Only identity and a free-form description live in core; pricing, terms
//! and documents belong to outer layers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned surrogate identifier of a contract.
pub type ContractId = i64;

/// Persisted contract reference target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub description: String,
}

/// Validation failures for contract input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractValidationError {
    BlankDescription,
}

impl Display for ContractValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankDescription => write!(f, "contract description must not be blank"),
        }
    }
}

impl Error for ContractValidationError {}

/// Normalizes a contract description, rejecting blank input.
pub fn normalize_description(value: &str) -> Result<String, ContractValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContractValidationError::BlankDescription);
    }
    Ok(trimmed.to_string())
}
