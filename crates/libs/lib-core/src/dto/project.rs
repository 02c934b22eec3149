//! # Project DTOs

use crate::validation::{FieldViolation, Validate, ViolationTree};
use lib_utils::{validate_length, validate_not_empty};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CreateProjectRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        ViolationTree::new()
            .check("name", [validate_not_empty(&self.name, "name"), validate_length(&self.name, 1, 120, "name")])
            .check(
                "description",
                [validate_length(self.description.as_deref().unwrap_or_default(), 0, 2000, "description")],
            )
            .into_violations()
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for UpdateProjectRequest {
    fn validate(&self) -> Vec<FieldViolation> {
        let mut tree = ViolationTree::new();
        if let Some(name) = &self.name {
            tree = tree.check("name", [validate_not_empty(name, "name"), validate_length(name, 1, 120, "name")]);
        }
        if let Some(description) = &self.description {
            tree = tree.check("description", [validate_length(description, 0, 2000, "description")]);
        }
        tree.into_violations()
    }
}
