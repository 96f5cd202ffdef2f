//! Vocabulary terms and their usage tracking.
//!
//! A [`Term`] is an immutable (description, url) pair — one piece of external
//! knowledge the course links to. An [`IndexTerm`] is a term plus the set of
//! sections that referenced it, accumulated while lesson pages are rendered
//! and replayed as back-links on the glossary page.
//!
//! ## Embedded cross-references
//!
//! Term descriptions may quote other vocabulary entries:
//!
//! ```text
//! A named storage location holding a "value".
//! ```
//!
//! [`Term::link_with_description`] resolves each quoted span against the
//! owning [`Index`](crate::index::Index): known term names and aliases become
//! hyperlinks (quotes dropped), unknown spans stay literal quoted text.
//! Substitution is one level deep — inserted links are never re-scanned.

use crate::index::Index;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Position of a lesson in the document order of the whole course.
///
/// Opaque to the index: it is stored, deduplicated, and sorted, nothing more.
/// Only the generator knows how to turn one into a link — it owns the table
/// mapping sections to lesson pages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SectionId(pub u32);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable vocabulary entry: what it means and where it points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    description: String,
    url: String,
}

impl Term {
    pub fn new(description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: url.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Render a hyperlink to this term's URL with the given display text.
    pub fn link(&self, text: &str) -> Markup {
        html! {
            a href=(self.url) { (text) }
        }
    }

    /// Render the hyperlink followed by `" - "` and the description, with
    /// quoted spans in the description resolved through `index`.
    pub fn link_with_description(&self, text: &str, index: &Index) -> Markup {
        html! {
            (self.link(text))
            " - "
            (self.substituted_description(index))
        }
    }

    /// The description with quoted cross-references substituted.
    ///
    /// Splitting on `"` yields alternating plain (even) and quoted-candidate
    /// (odd) segments. An even segment count means an odd number of quote
    /// characters — a malformed description — and the whole text is emitted
    /// literally rather than risking misaligned parity.
    pub fn substituted_description(&self, index: &Index) -> Markup {
        if !self.description.contains('"') {
            return html! { (self.description) };
        }
        let segments: Vec<&str> = self.description.split('"').collect();
        if segments.len() % 2 == 0 {
            return html! { (self.description) };
        }
        html! {
            @for (i, segment) in segments.iter().enumerate() {
                @if i % 2 == 0 {
                    (segment)
                } @else {
                    (resolve_quoted(segment, index))
                }
            }
        }
    }
}

/// Resolve one quoted candidate: term name first, then alias, else literal
/// text re-wrapped in quotes.
fn resolve_quoted(candidate: &str, index: &Index) -> Markup {
    if let Some(term) = index.term(candidate) {
        return term.term().link(candidate);
    }
    if let Some(target) = index
        .alias_target(candidate)
        .and_then(|canonical| index.term(canonical))
    {
        // Alias hit: link to the canonical term, keep the quoted spelling
        // as the display text.
        return target.term().link(candidate);
    }
    html! { "\"" (candidate) "\"" }
}

/// A [`Term`] plus the sections that referenced it.
#[derive(Debug, Clone)]
pub struct IndexTerm {
    term: Term,
    usage_sites: BTreeSet<SectionId>,
}

impl IndexTerm {
    pub fn new(term: Term) -> Self {
        Self {
            term,
            usage_sites: BTreeSet::new(),
        }
    }

    /// Build with a single usage site already recorded.
    pub fn with_usage(term: Term, site: SectionId) -> Self {
        let mut index_term = Self::new(term);
        index_term.record_usage(site);
        index_term
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Record that `site` referenced this term. Idempotent: re-recording an
    /// already-known site is a no-op.
    pub fn record_usage(&mut self, site: SectionId) {
        self.usage_sites.insert(site);
    }

    pub fn has_usages(&self) -> bool {
        !self.usage_sites.is_empty()
    }

    /// Usage sites in document order.
    pub fn usage_sites(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.usage_sites.iter().copied()
    }
}
