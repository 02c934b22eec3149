//! # Validation Flattening
//!
//! DTO checks produce a tree of [`FieldViolation`]s mirroring the shape of
//! the input (nested objects become child nodes). Clients receive a flat
//! `field -> message` map instead:
//!
//! - a node with messages contributes its **first** message under its own name;
//! - a node with no messages contributes nothing itself, and its children
//!   are flattened into the same map.
//!
//! ```text
//! user                      ->  { "email": "bad email",
//!   email: ["bad email"]          "city":  "required" }
//!   address
//!     city: ["required"]
//! ```
//!
//! When two nodes flatten to the same field name the first one visited wins.

use crate::error::AppError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    /// Constraint messages in declaration order.
    pub messages: Vec<String>,
    pub children: Vec<FieldViolation>,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            field: field.into(),
            messages,
            children: Vec::new(),
        }
    }

    pub fn nested(field: impl Into<String>, children: Vec<FieldViolation>) -> Self {
        Self {
            field: field.into(),
            messages: Vec::new(),
            children,
        }
    }
}

/// Flatten a violation tree into `field -> first message`.
pub fn flatten_violations(nodes: &[FieldViolation]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    collect(nodes, &mut out);
    out
}

fn collect(nodes: &[FieldViolation], out: &mut BTreeMap<String, String>) {
    for node in nodes {
        match node.messages.first() {
            Some(first) => {
                out.entry(node.field.clone()).or_insert_with(|| first.clone());
            }
            None => collect(&node.children, out),
        }
    }
}

/// Implemented by request DTOs.
pub trait Validate {
    fn validate(&self) -> Vec<FieldViolation>;

    /// Run the checks and turn any violations into a validation error.
    fn ensure_valid(&self) -> Result<(), AppError> {
        let violations = self.validate();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(flatten_violations(&violations)))
        }
    }
}

/// Builder collecting violations field by field.
///
/// ```rust
/// use lib_core::validation::ViolationTree;
/// use lib_utils::{validate_email, validate_not_empty};
///
/// let violations = ViolationTree::new()
///     .check("email", [validate_not_empty("", "email"), validate_email("")])
///     .into_violations();
/// assert_eq!(violations[0].messages.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ViolationTree {
    nodes: Vec<FieldViolation>,
}

impl ViolationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failed checks for `field`; passing checks are dropped.
    pub fn check<I>(mut self, field: &str, checks: I) -> Self
    where
        I: IntoIterator<Item = Result<(), String>>,
    {
        let messages: Vec<String> = checks.into_iter().filter_map(Result::err).collect();
        if !messages.is_empty() {
            self.nodes.push(FieldViolation::new(field, messages));
        }
        self
    }

    /// Record a nested object's violations under `field`.
    pub fn nested(mut self, field: &str, children: Vec<FieldViolation>) -> Self {
        if !children.is_empty() {
            self.nodes.push(FieldViolation::nested(field, children));
        }
        self
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn leaf(field: &str, messages: &[&str]) -> FieldViolation {
        FieldViolation::new(field, messages.iter().map(|m| m.to_string()).collect())
    }

    #[test]
    fn test_nested_parents_are_invisible() {
        let tree = vec![FieldViolation::nested(
            "user",
            vec![
                leaf("email", &["bad email"]),
                FieldViolation::nested("address", vec![leaf("city", &["required"])]),
            ],
        )];

        let flat = flatten_violations(&tree);

        assert_eq!(flat.len(), 2);
        assert_eq!(flat["email"], "bad email");
        assert_eq!(flat["city"], "required");
        assert!(!flat.contains_key("user"));
        assert!(!flat.contains_key("address"));
    }

    #[test]
    fn test_first_message_wins() {
        let flat = flatten_violations(&[leaf("name", &["should not be empty", "too short"])]);
        assert_eq!(flat["name"], "should not be empty");
    }

    #[test]
    fn test_own_message_shadows_children() {
        let mut node = leaf("address", &["address must be an object"]);
        node.children.push(leaf("city", &["required"]));

        let flat = flatten_violations(&[node]);

        assert_eq!(flat.len(), 1);
        assert_eq!(flat["address"], "address must be an object");
    }

    #[test]
    fn test_empty_tree_is_empty_map() {
        assert!(flatten_violations(&[]).is_empty());
        assert!(flatten_violations(&[FieldViolation::nested("user", vec![])]).is_empty());
    }

    struct Signup {
        email: String,
        city: String,
    }

    impl Validate for Signup {
        fn validate(&self) -> Vec<FieldViolation> {
            let address = ViolationTree::new()
                .check("city", [lib_utils::validate_not_empty(&self.city, "city")])
                .into_violations();
            ViolationTree::new()
                .check("email", [lib_utils::validate_email(&self.email)])
                .nested("address", address)
                .into_violations()
        }
    }

    #[test]
    fn test_ensure_valid_builds_validation_error() {
        let ok = Signup { email: "a@b.io".into(), city: "Lyon".into() };
        assert!(ok.ensure_valid().is_ok());

        let bad = Signup { email: "nope".into(), city: " ".into() };
        let err = bad.ensure_valid().unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(
            err.details(),
            Some(&serde_json::json!({
                "email": "email must be an email",
                "city": "city should not be empty",
            }))
        );
    }
}
