//! Resident model
//!
//! A person living in the household who can be responsible for bills and
//! owe shares of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ResidentId;

/// A household resident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resident {
    /// Unique identifier
    pub id: ResidentId,

    /// Display name, unique within the household (case-insensitive)
    pub name: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// PIX key used to receive payments for bills this resident is responsible for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,

    /// Inactive residents (moved out) can't be added to new bills
    #[serde(default = "default_active")]
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Resident {
    /// Create a new active resident
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ResidentId::new(),
            name: name.into().trim().to_string(),
            email: None,
            pix_key: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Validate the resident
    pub fn validate(&self) -> Result<(), ResidentValidationError> {
        if self.name.trim().is_empty() {
            return Err(ResidentValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(ResidentValidationError::NameTooLong(self.name.len()));
        }

        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ResidentValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Resident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for residents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResidentValidationError {
    #[error("Resident name cannot be empty")]
    EmptyName,
    #[error("Resident name too long ({0} characters, max 100)")]
    NameTooLong(usize),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}
