use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::QuoteError;
use crate::session::CurrentUser;

/// Contact fields typed by the customer on the quote form.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
}

impl CustomerInput {
    /// Guests have no profile to fall back on, so name, email and phone
    /// must be typed in.
    pub fn require_contact(&self) -> Result<(), QuoteError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if non_blank(value.as_deref()).is_none() {
                return Err(QuoteError::MissingCustomerField(field));
            }
        }
        Ok(())
    }
}

/// Customer block printed on the quote. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
}

impl CustomerDetails {
    /// Typed value first, then the signed-in profile, then empty.
    pub fn resolve(input: &CustomerInput, user: Option<&CurrentUser>) -> Self {
        Self {
            name: pick(
                input.name.as_deref(),
                user.map(|u| u.display_name.as_str()),
            ),
            email: pick(input.email.as_deref(), user.map(|u| u.email.as_str())),
            phone: pick(input.phone.as_deref(), None),
            company: pick(input.company.as_deref(), None),
            address: pick(input.address.as_deref(), None),
        }
    }
}

fn pick(explicit: Option<&str>, profile: Option<&str>) -> String {
    non_blank(explicit)
        .or_else(|| non_blank(profile))
        .unwrap_or_default()
        .to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
