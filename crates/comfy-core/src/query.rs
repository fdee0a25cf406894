//! # Listing Query
//!
//! The query-string contract of the product listing.
//!
//! ## Parameters
//! ```text
//! ┌──────────┬──────────────────────────────┬──────────────────────────────┐
//! │ param    │ values                       │ meaning                      │
//! ├──────────┼──────────────────────────────┼──────────────────────────────┤
//! │ search   │ free text                    │ title contains               │
//! │ category │ name or "all"                │ category filter              │
//! │ company  │ name or "all"                │ company filter               │
//! │ order    │ a-z | z-a | high | low       │ sort order                   │
//! │ price    │ cents                        │ maximum price                │
//! │ shipping │ "on" when checked            │ free shipping only           │
//! │ page     │ 1-based page                 │ page of results              │
//! └──────────┴──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Parsing is lenient: unknown parameters are ignored and malformed values
//! are treated as absent, so any URL a user can type still yields a listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pagination::{parse_query, serialize_query};

/// Sort order of the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "a-z")]
    AToZ,
    #[serde(rename = "z-a")]
    ZToA,
    #[serde(rename = "high")]
    PriceHigh,
    #[serde(rename = "low")]
    PriceLow,
}

impl SortOrder {
    /// All orders, in the order the filter form lists them.
    pub const ALL: [SortOrder; 4] = [
        SortOrder::AToZ,
        SortOrder::ZToA,
        SortOrder::PriceHigh,
        SortOrder::PriceLow,
    ];

    /// Query-string spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::AToZ => "a-z",
            SortOrder::ZToA => "z-a",
            SortOrder::PriceHigh => "high",
            SortOrder::PriceLow => "low",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "order".to_string(),
                allowed: SortOrder::ALL.iter().map(|o| o.as_str().to_string()).collect(),
            })
    }
}

/// Filters and page of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub order: Option<SortOrder>,
    /// Maximum price.
    pub price: Option<Money>,
    /// Free shipping only.
    pub shipping: bool,
    pub page: Option<u32>,
}

impl ProductQuery {
    /// Parses the listing's query string (leading `?` optional).
    ///
    /// ```rust
    /// use comfy_core::query::{ProductQuery, SortOrder};
    ///
    /// let q = ProductQuery::from_search("?search=lamp&order=low&shipping=on&page=2");
    /// assert_eq!(q.search.as_deref(), Some("lamp"));
    /// assert_eq!(q.order, Some(SortOrder::PriceLow));
    /// assert!(q.shipping);
    /// assert_eq!(q.page, Some(2));
    /// ```
    pub fn from_search(search: &str) -> Self {
        let mut query = ProductQuery::default();

        for (key, value) in parse_query(search) {
            let non_empty = || Some(value.clone()).filter(|v| !v.trim().is_empty());
            match key.as_str() {
                "search" => query.search = non_empty(),
                "category" => query.category = non_empty(),
                "company" => query.company = non_empty(),
                "order" => query.order = value.parse().ok(),
                "price" => query.price = value.parse::<Money>().ok().filter(|p| !p.is_negative()),
                "shipping" => query.shipping = matches!(value.as_str(), "on" | "true"),
                "page" => query.page = value.parse::<u32>().ok().filter(|p| *p > 0),
                _ => {}
            }
        }

        query
    }

    /// The 1-based page requested, defaulting to the first.
    pub fn page_or_first(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Parameters to forward to the products endpoint, in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(company) = &self.company {
            params.push(("company", company.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order", order.as_str().to_string()));
        }
        if let Some(price) = self.price {
            params.push(("price", price.cents().to_string()));
        }
        if self.shipping {
            params.push(("shipping", "on".to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params
    }

    /// Serializes back to a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        serialize_query(self.to_params())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
