//! The bibliography: named external resources cited from lesson text.
//!
//! A flat registry of name → [`Term`], simpler than the index on purpose:
//! no alias layer, no usage tracking, no collision check (last registration
//! wins). Citations are looked up by their exact name; a miss returns `None`
//! just like [`Index::resolve`](crate::index::Index::resolve).
//!
//! Bibliography rows still run quoted-description substitution, so a
//! reference description may link back into the term index.

use crate::term::Term;
use maud::Markup;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct References {
    entries: BTreeMap<String, Term>,
}

impl References {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a bibliography entry. Returns the displaced entry if `name`
    /// was already registered.
    pub fn register(&mut self, name: &str, term: Term) -> Option<Term> {
        self.entries.insert(name.to_string(), term)
    }

    /// Look up `name` exactly and render a link; `None` if absent.
    pub fn resolve(&self, name: &str, link_text: Option<&str>) -> Option<Markup> {
        self.entries
            .get(name)
            .map(|term| term.link(link_text.unwrap_or(name)))
    }

    /// Entries in sorted name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.entries.iter().map(|(name, term)| (name.as_str(), term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_reference() {
        let mut refs = References::new();
        refs.register("K&R", Term::new("The classic C book.", "http://knr"));
        let html = refs.resolve("K&R", None).unwrap().into_string();
        assert_eq!(html, r#"<a href="http://knr">K&amp;R</a>"#);
    }

    #[test]
    fn resolve_uses_explicit_link_text() {
        let mut refs = References::new();
        refs.register("K&R", Term::new("The classic C book.", "http://knr"));
        let html = refs.resolve("K&R", Some("the book")).unwrap().into_string();
        assert!(html.contains(">the book</a>"));
    }

    #[test]
    fn resolve_unknown_returns_none() {
        let refs = References::new();
        assert!(refs.resolve("Nope", None).is_none());
    }

    #[test]
    fn no_alias_layer_lookup_is_exact() {
        let mut refs = References::new();
        refs.register("K&R", Term::new("d", "u"));
        assert!(refs.resolve("k&r", None).is_none());
    }

    #[test]
    fn re_registration_replaces_silently() {
        let mut refs = References::new();
        refs.register("K&R", Term::new("first", "http://a"));
        let displaced = refs.register("K&R", Term::new("second", "http://b"));
        assert!(displaced.is_some());
        let html = refs.resolve("K&R", None).unwrap().into_string();
        assert!(html.contains("http://b"));
    }

    #[test]
    fn entries_iterate_in_sorted_order() {
        let mut refs = References::new();
        refs.register("Zig book", Term::new("d", "u"));
        refs.register("Ada manual", Term::new("d", "u"));
        let names: Vec<&str> = refs.entries().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Ada manual", "Zig book"]);
    }
}
