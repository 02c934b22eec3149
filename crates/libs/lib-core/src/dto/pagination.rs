//! # Pagination
//!
//! [`PageQuery`] is the `?page=&limit=` input of list endpoints and
//! [`Page`] the result they return. The response mapper recognizes a
//! `Page` in a handler's JSON output and moves its counters into
//! `meta.pagination`.
//!
//! The canonical field names are `page`, `limit` and `total_items`. Older
//! producers spelled them `currentPage`, `itemsPerPage`/`perPage` and
//! `totalItems`/`total`, sometimes nested under `meta`; those spellings are
//! still accepted on input only.

use super::envelope::PaginationMeta;
use crate::validation::{FieldViolation, Validate, ViolationTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    /// 1-based page number.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

/// Zero is the only rejected value; oversized limits are clamped.
impl Validate for PageQuery {
    fn validate(&self) -> Vec<FieldViolation> {
        let at_least_one = |value: Option<u64>, field: &str| match value {
            Some(0) => Err(format!("{field} must be at least 1")),
            _ => Ok(()),
        };
        ViolationTree::new()
            .check("page", [at_least_one(self.page, "page")])
            .check("limit", [at_least_one(self.limit, "limit")])
            .into_violations()
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(alias = "currentPage")]
    pub page: u64,
    #[serde(alias = "itemsPerPage", alias = "perPage")]
    pub limit: u64,
    #[serde(alias = "totalItems", alias = "total")]
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total_items: u64) -> Self {
        Self {
            items,
            page: query.page(),
            limit: query.limit(),
            total_items,
        }
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.page, self.limit, self.total_items)
    }
}

#[derive(Deserialize)]
struct NestedPage {
    items: Vec<Value>,
    meta: PageCounters,
}

#[derive(Deserialize)]
struct PageCounters {
    #[serde(alias = "currentPage")]
    page: u64,
    #[serde(alias = "itemsPerPage", alias = "perPage")]
    limit: u64,
    #[serde(alias = "totalItems", alias = "total")]
    total_items: u64,
}

impl Page<Value> {
    /// Recognize a paginated result in arbitrary JSON, flat or with the
    /// counters nested under `meta`.
    pub fn detect(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if !obj.get("items").is_some_and(Value::is_array) {
            return None;
        }

        if let Ok(page) = serde_json::from_value::<Page<Value>>(value.clone()) {
            return Some(page);
        }

        serde_json::from_value::<NestedPage>(value.clone())
            .ok()
            .map(|nested| Page {
                items: nested.items,
                page: nested.meta.page,
                limit: nested.meta.limit,
                total_items: nested.meta.total_items,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_query_defaults_and_clamps() {
        let q = PageQuery::default();
        assert_eq!((q.page(), q.limit(), q.offset()), (1, 10, 0));

        let q = PageQuery { page: Some(0), limit: Some(0) };
        assert_eq!((q.page(), q.limit()), (1, 1));

        let q = PageQuery { page: Some(3), limit: Some(500) };
        assert_eq!((q.page(), q.limit(), q.offset()), (3, 100, 200));
    }

    #[test]
    fn test_page_query_rejects_zero() {
        assert!(PageQuery { page: Some(2), limit: Some(500) }.validate().is_empty());

        let violations = PageQuery { page: Some(0), limit: Some(0) }.validate();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["page", "limit"]);
    }

    #[test]
    fn test_detect_canonical_shape() {
        let page = Page::detect(&json!({ "items": [1, 2], "page": 1, "limit": 2, "total_items": 7 })).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta().total_pages, 4);
    }

    #[test]
    fn test_detect_legacy_flat_camel_case() {
        let page = Page::detect(&json!({
            "items": [],
            "currentPage": 2,
            "itemsPerPage": 10,
            "totalItems": 45
        }))
        .unwrap();
        assert_eq!(page.meta(), PaginationMeta::new(2, 10, 45));
    }

    #[test]
    fn test_detect_legacy_nested_meta() {
        let page = Page::detect(&json!({
            "items": [{ "id": 1 }],
            "meta": { "currentPage": 1, "perPage": 5, "total": 11, "itemCount": 1 }
        }))
        .unwrap();
        assert_eq!(page.meta().total_pages, 3);
    }

    #[test]
    fn test_detect_rejects_non_paginated() {
        assert!(Page::detect(&json!({ "items": [1] })).is_none());
        assert!(Page::detect(&json!({ "items": "x", "page": 1, "limit": 1, "total_items": 1 })).is_none());
        assert!(Page::detect(&json!([1, 2, 3])).is_none());
        assert!(Page::detect(&json!({ "name": "Apollo" })).is_none());
    }
}
