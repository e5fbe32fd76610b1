//! Account registration

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::order::not_blank;
use crate::{Result, StorefrontError};

pub const TERMS_NOT_ACCEPTED_MESSAGE: &str = "You must accept the terms and conditions.";

/// Sign-up details as the backend expects them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Validate)]
pub struct Registration {
    #[validate(email)]
    pub email: String,
    #[validate(custom = "not_blank")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match = "password")]
    #[serde(rename = "password2")]
    pub confirm_password: String,
}

#[derive(Clone, Debug, Default)]
pub struct RegistrationForm {
    pub details: Registration,
    pub terms_accepted: bool,
}

impl RegistrationForm {
    pub fn is_valid(&self) -> bool { self.validated().is_ok() }

    /// The details to send, once every field and the terms check out.
    pub fn validated(&self) -> Result<&Registration> {
        self.details.validate()?;
        if !self.terms_accepted {
            return Err(StorefrontError::Validation(TERMS_NOT_ACCEPTED_MESSAGE.to_string()));
        }
        Ok(&self.details)
    }
}

/// Backend reply to a registration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    #[serde(default)]
    pub id: Option<u64>,
    pub email: String,
    #[serde(default)]
    pub username: String,
}
