use serde::{Deserialize, Serialize};

use models::event::validate_required;

use crate::errors::ServiceError;

/// Creation input. Id, vote state and timestamp are assigned server side.
/// Every field defaults so a missing key reads as blank and falls to the
/// same presence check as an explicit empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEventInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl CreateEventInput {
    /// Title, description and location must be non-blank. Date and time pass
    /// through as sent; the category label is resolved by the service, with
    /// unknown labels collapsing to the catch-all.
    pub fn validate(&self) -> Result<(), ServiceError> {
        validate_required("title", &self.title)?;
        validate_required("description", &self.description)?;
        validate_required("location", &self.location)?;
        Ok(())
    }
}
