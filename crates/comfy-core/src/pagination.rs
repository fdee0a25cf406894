//! # Pagination Codec
//!
//! Derives navigable URLs from the current page and the current query string.
//!
//! ## URL Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  current location:  /products?search=chair&page=2                       │
//! │                                                                         │
//! │  build_page_url(5, search, path)                                        │
//! │      parse "?search=chair&page=2"                                       │
//! │      set page=5 (in place, other params untouched)                      │
//! │      ──► /products?search=chair&page=5                                  │
//! │                                                                         │
//! │  build_adjacent_url(Prev, 1, 5, ...)  ──► page 5   (wraps to last)      │
//! │  build_adjacent_url(Next, 5, 5, ...)  ──► page 1   (wraps to first)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Compact Page List
//! ```text
//!   page 1 of 9:   [1*]  …  [9]
//!   page 2 of 9:   [1] [2*]  …  [9]
//!   page 5 of 9:   [1]  …  [5*]  …  [9]
//!   page 9 of 9:   [1]  …  [9*]
//! ```

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::ValidationError;

/// Name of the page parameter in the query string.
pub const PAGE_PARAM: &str = "page";

// =============================================================================
// Query-String Helpers
// =============================================================================

/// Parses a query string (leading `?` optional) into ordered pairs.
pub fn parse_query(search: &str) -> Vec<(String, String)> {
    let raw = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
}

/// Serializes pairs with `application/x-www-form-urlencoded` rules.
pub fn serialize_query<I, K, V>(pairs: I) -> String
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<(K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Sets `key` to `value` the way `URLSearchParams.set` does: the first
/// occurrence is replaced in place, later duplicates are dropped, and a
/// missing key is appended.
pub fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    let mut replaced = false;
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if replaced {
            return false;
        }
        *v = value.to_string();
        replaced = true;
        true
    });

    if !replaced {
        pairs.push((key.to_string(), value.to_string()));
    }
}

// =============================================================================
// Page URLs
// =============================================================================

/// Builds the URL of `page_number`, keeping every other parameter.
///
/// ```rust
/// use comfy_core::pagination::build_page_url;
///
/// assert_eq!(build_page_url(3, "?page=1&x=y", "/products"), "/products?page=3&x=y");
/// ```
pub fn build_page_url(page_number: u32, current_search: &str, current_path: &str) -> String {
    let mut pairs = parse_query(current_search);
    set_param(&mut pairs, PAGE_PARAM, &page_number.to_string());
    format!("{}?{}", current_path, serialize_query(&pairs))
}

/// Direction of a prev/next control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Prev,
    Next,
}

impl FromStr for PageDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(PageDirection::Prev),
            "next" => Ok(PageDirection::Next),
            _ => Err(ValidationError::NotAllowed {
                field: "direction".to_string(),
                allowed: vec!["prev".to_string(), "next".to_string()],
            }),
        }
    }
}

impl fmt::Display for PageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageDirection::Prev => "prev",
            PageDirection::Next => "next",
        })
    }
}

/// Target page of a prev/next step, wrapping around at both ends.
pub fn adjacent_page(direction: PageDirection, current_page: u32, page_count: u32) -> u32 {
    let page_count = page_count.max(1);
    match direction {
        PageDirection::Prev => {
            if current_page <= 1 {
                page_count
            } else {
                current_page - 1
            }
        }
        PageDirection::Next => {
            if current_page >= page_count {
                1
            } else {
                current_page + 1
            }
        }
    }
}

/// Builds the URL of the previous or next page (with wrap-around).
pub fn build_adjacent_url(
    direction: PageDirection,
    current_page: u32,
    page_count: u32,
    search: &str,
    pathname: &str,
) -> String {
    let target = adjacent_page(direction, current_page, page_count);
    build_page_url(target, search, pathname)
}

// =============================================================================
// Page Lists
// =============================================================================

/// One slot of a rendered page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: u32, active: bool },
    Ellipsis,
}

/// Every page from 1 to `page_count`, the current one active.
pub fn full_page_list(page: u32, page_count: u32) -> Vec<PageLink> {
    (1..=page_count)
        .map(|number| PageLink::Page {
            number,
            active: number == page,
        })
        .collect()
}

/// First, current and last page, with ellipses for the gaps.
pub fn compact_page_list(page: u32, page_count: u32) -> Vec<PageLink> {
    let mut links = vec![PageLink::Page {
        number: 1,
        active: page == 1,
    }];

    if page > 2 {
        links.push(PageLink::Ellipsis);
    }

    if page != 1 && page != page_count {
        links.push(PageLink::Page {
            number: page,
            active: true,
        });
    }

    if page.saturating_add(1) < page_count {
        links.push(PageLink::Ellipsis);
    }

    if page_count > 1 {
        links.push(PageLink::Page {
            number: page_count,
            active: page == page_count,
        });
    }

    links
}

/// Which page-list layout to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageListStyle {
    /// One button per page (product listing).
    Full,
    /// First/current/last with ellipses (order history).
    Compact,
}

/// A page-list slot with its target URL resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEntry {
    Page { number: u32, active: bool, url: String },
    Ellipsis,
}

/// Everything needed to render a pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub prev_url: String,
    pub next_url: String,
    pub entries: Vec<PageEntry>,
}

impl PaginationControls {
    /// Builds the control for the current location.
    ///
    /// Returns `None` when there is a single page (or none): no control is
    /// rendered at all.
    pub fn build(
        page: u32,
        page_count: u32,
        search: &str,
        pathname: &str,
        style: PageListStyle,
    ) -> Option<Self> {
        if page_count < 2 {
            return None;
        }

        let layout = match style {
            PageListStyle::Full => full_page_list(page, page_count),
            PageListStyle::Compact => compact_page_list(page, page_count),
        };

        let entries = layout
            .into_iter()
            .map(|link| match link {
                PageLink::Page { number, active } => PageEntry::Page {
                    number,
                    active,
                    url: build_page_url(number, search, pathname),
                },
                PageLink::Ellipsis => PageEntry::Ellipsis,
            })
            .collect();

        Some(PaginationControls {
            prev_url: build_adjacent_url(PageDirection::Prev, page, page_count, search, pathname),
            next_url: build_adjacent_url(PageDirection::Next, page, page_count, search, pathname),
            entries,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
