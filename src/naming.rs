//! Filename parsing for the NNN-name convention.
//!
//! Lessons and chapters share one naming pattern: an optional numeric prefix
//! (`NNN-`) for explicit ordering, followed by a name. The prefix controls
//! navigation order; entries without one are built but hidden from nav —
//! useful for drafts that should stay reachable by direct URL.
//!
//! The name part produces two derived strings:
//! - `slug`: lowercased, dashes preserved — used in output paths and URLs
//!   (`020-Control-Flow` → `control-flow`);
//! - `title`: dashes converted to spaces, original casing kept
//!   (`020-Control-Flow` → "Control Flow").

/// Result of parsing an entry name like `020-Control-Flow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryName {
    /// Numeric prefix if present (`20` from `020-Control-Flow`).
    pub order: Option<u32>,
    /// URL slug: name part lowercased, dashes kept. Empty if number-only.
    pub slug: String,
    /// Display title: name part with dashes converted to spaces.
    pub title: String,
}

impl EntryName {
    /// Whether this entry appears in navigation (has a numeric prefix).
    pub fn in_nav(&self) -> bool {
        self.order.is_some()
    }

    /// Sort key for document order; unnumbered entries sort last.
    pub fn sort_key(&self) -> u32 {
        self.order.unwrap_or(u32::MAX)
    }
}

/// Parse an entry name following the `NNN-name` convention.
///
/// - `"020-Control-Flow"` → order=Some(20), slug="control-flow", title="Control Flow"
/// - `"010-variables"` → order=Some(10), slug="variables", title="variables"
/// - `"007"` / `"007-"` → order=Some(7), empty slug and title
/// - `"drafts"` → order=None, slug="drafts", title="drafts"
pub fn parse_entry_name(name: &str) -> EntryName {
    if let Some((prefix, rest)) = name.split_once('-') {
        if let Ok(order) = prefix.parse::<u32>() {
            return EntryName {
                order: Some(order),
                slug: rest.to_lowercase(),
                title: rest.replace('-', " "),
            };
        }
    }
    if let Ok(order) = name.parse::<u32>() {
        return EntryName {
            order: Some(order),
            slug: String::new(),
            title: String::new(),
        };
    }
    EntryName {
        order: None,
        slug: name.to_lowercase(),
        title: name.replace('-', " "),
    }
}
