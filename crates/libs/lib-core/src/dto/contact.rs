//! # Contact DTOs
//!
//! The address is a nested object on the wire. Its violations are reported
//! under the inner field names (`city`, `country`), not under `address`.

use crate::validation::{FieldViolation, Validate, ViolationTree};
use lib_utils::{validate_email, validate_length, validate_not_empty};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressDto {
    #[serde(default)]
    pub street: Option<String>,
    pub city: String,
    pub country: String,
}

impl Validate for AddressDto {
    fn validate(&self) -> Vec<FieldViolation> {
        ViolationTree::new()
            .check("city", [validate_not_empty(&self.city, "city")])
            .check("country", [validate_not_empty(&self.country, "country"), validate_length(&self.country, 2, 56, "country")])
            .into_violations()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub address: Option<AddressDto>,
}

impl Validate for CreateContactRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        ViolationTree::new()
            .check("name", [validate_not_empty(&self.name, "name"), validate_length(&self.name, 1, 120, "name")])
            .check("email", [validate_not_empty(&self.email, "email"), validate_email(&self.email)])
            .check("phone", [validate_length(self.phone.as_deref().unwrap_or_default(), 0, 32, "phone")])
            .nested("address", self.address.as_ref().map(Validate::validate).unwrap_or_default())
            .into_violations()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<AddressDto>,
}

impl Validate for UpdateContactRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        let mut tree = ViolationTree::new();
        if let Some(name) = &self.name {
            tree = tree.check("name", [validate_not_empty(name, "name")]);
        }
        if let Some(email) = &self.email {
            tree = tree.check("email", [validate_email(email)]);
        }
        if let Some(phone) = &self.phone {
            tree = tree.check("phone", [validate_length(phone, 0, 32, "phone")]);
        }
        tree.nested("address", self.address.as_ref().map(Validate::validate).unwrap_or_default())
            .into_violations()
    }
}
