//! Shared content types.
//!
//! These are read from `config.toml`, rendered into markup by
//! [`generate`](crate::generate), and mirrored by the page controllers in
//! [`view`](crate::view). All three must agree on them, so they live here.

use serde::{Deserialize, Serialize};

/// A repair service offered on the services page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub name: String,
    pub description: String,
    /// Icon class name (Font Awesome style, e.g. `fa-mobile-alt`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

/// A before/after photo shown in the gallery.
///
/// `category` is fixed at render time and becomes the item's
/// `data-category` attribute; the gallery filter never rewrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryEntry {
    pub title: String,
    pub description: String,
    /// Filter value, e.g. `"screen"`
    pub category: String,
    /// Human label shown in the metadata block, e.g. `"Display"`
    pub category_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A headline number on the home page, animated by the counter observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub label: String,
    pub value: u32,
    /// Appended after the number, e.g. `"+"` or `"%"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
}

/// One row of the price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriceRow {
    pub device: String,
    pub repair: String,
    /// Display price, kept as text so ranges like `"ab 89.-"` survive
    pub price: String,
}
