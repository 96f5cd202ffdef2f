//! The term index: canonical terms, aliases, and lookup with usage tracking.
//!
//! One [`Index`] is built per course from `vocabulary.toml` and passed
//! explicitly to every renderer that needs it — no globals, no singletons.
//!
//! ## Aliases
//!
//! An alias is an alternate spelling that resolves to a canonical term
//! (`"bits"` → `"Bit"`). Aliases come in two flavors:
//!
//! - **lookup-only**: resolvable from lesson text, absent from the glossary;
//! - **display**: additionally gets its own glossary row, pointing at the
//!   canonical term's URL and description.
//!
//! Registering the same alias twice is a hard error — a collision means two
//! vocabulary entries are fighting over one spelling, which the author must
//! fix before the site can be published. The same goes for an alias that
//! matches a canonical term name, or a term whose name is already an alias:
//! the two namespaces are kept disjoint so resolution never silently prefers
//! one over the other. Looking up a name that was never
//! registered is *not* an error: [`Index::resolve`] returns `None` and the
//! caller decides whether that matters.
//!
//! ## Ordering
//!
//! All maps are `BTreeMap`/`BTreeSet`, so glossary enumeration and rendered
//! output are deterministic without any explicit sort step.

use crate::term::{IndexTerm, SectionId};
use maud::Markup;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    #[error(
        "alias {alias:?} is already registered for term {existing:?}, cannot re-register it for {new:?}"
    )]
    DuplicateAlias {
        alias: String,
        existing: String,
        new: String,
    },
    #[error("cannot alias {alias:?} to {new:?}: {alias:?} is already a canonical term name")]
    AliasShadowsTerm { alias: String, new: String },
    #[error("cannot register term {name:?}: it is already an alias of {existing:?}")]
    TermShadowsAlias { name: String, existing: String },
}

/// One glossary row as enumerated by [`Index::display_entries`].
#[derive(Debug, Clone, Copy)]
pub struct GlossaryEntry<'a> {
    /// The string shown for this row: a canonical name or a display alias.
    pub label: &'a str,
    /// The canonical term name backing the row.
    pub canonical: &'a str,
    /// The term record (URL, description, usage sites).
    pub term: &'a IndexTerm,
}

/// The course vocabulary: canonical terms plus the alias layer.
#[derive(Debug, Clone, Default)]
pub struct Index {
    terms: BTreeMap<String, IndexTerm>,
    /// Alias → canonical name. Case-sensitive; canonical names never appear
    /// as keys here.
    aliases: BTreeMap<String, String>,
    /// Canonical names ∪ display aliases — everything that gets a glossary row.
    display_entries: BTreeSet<String>,
    /// The subset of aliases that get their own glossary row.
    display_aliases: BTreeSet<String>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of canonical terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Register a canonical term. Returns the previously registered record
    /// if `name` was already present (last write wins at this layer; the
    /// vocabulary loader decides whether a displaced record is a warning or
    /// an error). Fails if `name` is already in use as an alias: the two
    /// namespaces stay disjoint.
    pub fn register_term(
        &mut self,
        name: &str,
        term: IndexTerm,
    ) -> Result<Option<IndexTerm>, IndexError> {
        if let Some(existing) = self.aliases.get(name) {
            return Err(IndexError::TermShadowsAlias {
                name: name.to_string(),
                existing: existing.clone(),
            });
        }
        self.display_entries.insert(name.to_string());
        Ok(self.terms.insert(name.to_string(), term))
    }

    /// Register a lookup-only alias for `name`. Fails if `alias` is already
    /// taken, whether by another alias or by a canonical term name.
    pub fn register_alias(&mut self, name: &str, alias: &str) -> Result<(), IndexError> {
        if self.terms.contains_key(alias) {
            return Err(IndexError::AliasShadowsTerm {
                alias: alias.to_string(),
                new: name.to_string(),
            });
        }
        if let Some(existing) = self.aliases.get(alias) {
            return Err(IndexError::DuplicateAlias {
                alias: alias.to_string(),
                existing: existing.clone(),
                new: name.to_string(),
            });
        }
        self.aliases.insert(alias.to_string(), name.to_string());
        Ok(())
    }

    /// Register an alias that also gets its own glossary row.
    pub fn register_display_alias(&mut self, name: &str, alias: &str) -> Result<(), IndexError> {
        self.register_alias(name, alias)?;
        self.display_aliases.insert(alias.to_string());
        self.display_entries.insert(alias.to_string());
        Ok(())
    }

    /// Register `alias` and its lowercase form as two lookup-only aliases.
    /// An alias that is already lowercase registers only once.
    pub fn register_alias_lower_cased(&mut self, name: &str, alias: &str) -> Result<(), IndexError> {
        self.register_alias(name, alias)?;
        let lower = alias.to_lowercase();
        if lower != alias {
            self.register_alias(name, &lower)?;
        }
        Ok(())
    }

    /// Register `alias` as a display alias, plus its plural as lookup-only.
    pub fn register_display_alias_with_plural(
        &mut self,
        name: &str,
        alias: &str,
    ) -> Result<(), IndexError> {
        self.register_display_alias(name, alias)?;
        self.register_alias(name, &format!("{alias}s"))
    }

    /// Register the plural, lowercase, and lowercase-plural spellings of
    /// `name` as lookup-only aliases. Spellings that coincide with the name
    /// itself (an all-lowercase term) or that this term already claims (an
    /// explicit alias overlapping an auto variant) are skipped.
    pub fn register_lower_case_and_plural_aliases(&mut self, name: &str) -> Result<(), IndexError> {
        let mut variants = vec![format!("{name}s")];
        let lower = name.to_lowercase();
        if lower != name {
            variants.push(format!("{lower}s"));
            variants.push(lower);
        }
        for variant in variants {
            if self.alias_target(&variant) == Some(name) {
                continue;
            }
            self.register_alias(name, &variant)?;
        }
        Ok(())
    }

    /// Look up `name` and render a link to it.
    ///
    /// Canonical names are checked first, then the alias layer (one hop — a
    /// canonical name is never itself aliased). On a hit, `site` (when given)
    /// is recorded as a usage location and the link uses `link_text`, falling
    /// back to the spelling that was looked up. A miss returns `None`: absence
    /// is the caller's problem, not the index's.
    pub fn resolve(
        &mut self,
        name: &str,
        link_text: Option<&str>,
        site: Option<SectionId>,
    ) -> Option<Markup> {
        let canonical = if self.terms.contains_key(name) {
            name.to_string()
        } else {
            self.aliases.get(name)?.clone()
        };
        let entry = self.terms.get_mut(&canonical)?;
        if let Some(site) = site {
            entry.record_usage(site);
        }
        Some(entry.term().link(link_text.unwrap_or(name)))
    }

    /// The term record for a canonical name.
    pub fn term(&self, name: &str) -> Option<&IndexTerm> {
        self.terms.get(name)
    }

    /// The canonical name an alias maps to, if `alias` is registered.
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn is_display_alias(&self, entry: &str) -> bool {
        self.display_aliases.contains(entry)
    }

    /// Glossary rows in lexicographic order of their labels.
    ///
    /// Labels are canonical names and display aliases; lookup-only aliases
    /// never appear. Rows whose backing term has been displaced by a
    /// re-registration are skipped rather than rendered dangling.
    pub fn display_entries(&self) -> impl Iterator<Item = GlossaryEntry<'_>> {
        self.display_entries.iter().filter_map(|label| {
            let canonical = if self.terms.contains_key(label.as_str()) {
                label.as_str()
            } else {
                self.aliases.get(label.as_str())?.as_str()
            };
            Some(GlossaryEntry {
                label: label.as_str(),
                canonical,
                term: self.terms.get(canonical)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn bit_index() -> Index {
        let mut index = Index::new();
        index
            .register_term(
                "Bit",
                IndexTerm::new(Term::new("The smallest unit of information.", "http://u1")),
            )
            .unwrap();
        index
    }

    #[test]
    fn resolve_canonical_name() {
        let mut index = bit_index();
        let html = index.resolve("Bit", None, None).unwrap().into_string();
        assert_eq!(html, r#"<a href="http://u1">Bit</a>"#);
    }

    #[test]
    fn resolve_uses_explicit_link_text() {
        let mut index = bit_index();
        let html = index
            .resolve("Bit", Some("a single bit"), None)
            .unwrap()
            .into_string();
        assert!(html.contains(">a single bit</a>"));
    }

    #[test]
    fn resolve_unknown_returns_none() {
        let mut index = bit_index();
        assert!(index.resolve("NoSuchTerm", None, None).is_none());
    }

    #[test]
    fn resolve_through_alias_defaults_link_text_to_alias() {
        let mut index = bit_index();
        index.register_alias("Bit", "bits").unwrap();
        let html = index.resolve("bits", None, None).unwrap().into_string();
        assert_eq!(html, r#"<a href="http://u1">bits</a>"#);
    }

    #[test]
    fn alias_lookup_matches_canonical_lookup() {
        let mut index = bit_index();
        index.register_alias("Bit", "binary digit").unwrap();
        let via_alias = index
            .resolve("binary digit", Some("x"), None)
            .unwrap()
            .into_string();
        let direct = index.resolve("Bit", Some("x"), None).unwrap().into_string();
        assert_eq!(via_alias, direct);
    }

    #[test]
    fn duplicate_alias_is_rejected_and_names_both_terms() {
        let mut index = bit_index();
        index
            .register_term("Byte", IndexTerm::new(Term::new("Eight bits.", "http://u2")))
            .unwrap();
        index.register_alias("Bit", "b").unwrap();
        let err = index.register_alias("Byte", "b").unwrap_err();
        assert_eq!(
            err,
            IndexError::DuplicateAlias {
                alias: "b".into(),
                existing: "Bit".into(),
                new: "Byte".into(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("\"b\""));
        assert!(message.contains("\"Bit\""));
        assert!(message.contains("\"Byte\""));
    }

    #[test]
    fn alias_matching_a_canonical_name_is_rejected() {
        let mut index = bit_index();
        index
            .register_term("Byte", IndexTerm::new(Term::new("Eight bits.", "http://u2")))
            .unwrap();
        let err = index.register_alias("Octet", "Byte").unwrap_err();
        assert_eq!(
            err,
            IndexError::AliasShadowsTerm {
                alias: "Byte".into(),
                new: "Octet".into(),
            }
        );
        // Resolution still reaches the canonical record, not the alias.
        let html = index.resolve("Byte", None, None).unwrap().into_string();
        assert!(html.contains("http://u2"));
    }

    #[test]
    fn term_named_after_an_existing_alias_is_rejected() {
        let mut index = bit_index();
        index.register_alias("Bit", "Octet").unwrap();
        let err = index
            .register_term("Octet", IndexTerm::new(Term::new("eight bits", "http://o")))
            .unwrap_err();
        assert_eq!(
            err,
            IndexError::TermShadowsAlias {
                name: "Octet".into(),
                existing: "Bit".into(),
            }
        );
        assert!(index.term("Octet").is_none());
    }

    #[test]
    fn display_alias_collision_is_also_rejected() {
        let mut index = bit_index();
        index.register_alias("Bit", "bit").unwrap();
        assert!(index.register_display_alias("Bit", "bit").is_err());
    }

    #[test]
    fn resolve_records_usage_once_per_site() {
        let mut index = bit_index();
        index.resolve("Bit", None, Some(SectionId(4))).unwrap();
        index.resolve("Bit", None, Some(SectionId(4))).unwrap();
        index.resolve("Bit", None, Some(SectionId(2))).unwrap();
        let sites: Vec<u32> = index
            .term("Bit")
            .unwrap()
            .usage_sites()
            .map(|s| s.0)
            .collect();
        assert_eq!(sites, vec![2, 4]);
    }

    #[test]
    fn resolve_via_alias_records_usage_on_canonical_term() {
        let mut index = bit_index();
        index.register_alias("Bit", "bits").unwrap();
        index.resolve("bits", None, Some(SectionId(9))).unwrap();
        assert!(index.term("Bit").unwrap().has_usages());
    }

    #[test]
    fn resolve_without_site_records_nothing() {
        let mut index = bit_index();
        index.resolve("Bit", None, None).unwrap();
        assert!(!index.term("Bit").unwrap().has_usages());
    }

    #[test]
    fn register_term_returns_displaced_record() {
        let mut index = bit_index();
        let displaced = index
            .register_term("Bit", IndexTerm::new(Term::new("new", "http://new")))
            .unwrap();
        assert!(displaced.is_some());
        assert_eq!(index.term("Bit").unwrap().term().url(), "http://new");
    }

    #[test]
    fn alias_lower_cased_registers_both_spellings() {
        let mut index = bit_index();
        index.register_alias_lower_cased("Bit", "Binary-Digit").unwrap();
        assert_eq!(index.alias_target("Binary-Digit"), Some("Bit"));
        assert_eq!(index.alias_target("binary-digit"), Some("Bit"));
    }

    #[test]
    fn display_alias_with_plural_shows_only_the_singular() {
        let mut index = bit_index();
        index.register_display_alias_with_plural("Bit", "bit").unwrap();
        assert!(index.is_display_alias("bit"));
        assert!(!index.is_display_alias("bits"));
        assert_eq!(index.alias_target("bits"), Some("Bit"));
    }

    #[test]
    fn lower_case_and_plural_aliases_are_lookup_only() {
        let mut index = bit_index();
        index.register_lower_case_and_plural_aliases("Bit").unwrap();
        for alias in ["Bits", "bit", "bits"] {
            assert_eq!(index.alias_target(alias), Some("Bit"), "alias {alias:?}");
            assert!(!index.is_display_alias(alias));
        }
    }

    #[test]
    fn lower_case_variants_of_an_all_lowercase_name_register_only_the_plural() {
        let mut index = Index::new();
        index
            .register_term("mutex", IndexTerm::new(Term::new("a lock", "http://m")))
            .unwrap();
        index.register_lower_case_and_plural_aliases("mutex").unwrap();
        assert_eq!(index.alias_target("mutexs"), Some("mutex"));
        assert_eq!(index.alias_target("mutex"), None);
    }

    #[test]
    fn display_entries_sorted_with_display_aliases_but_not_lookup_aliases() {
        let mut index = bit_index();
        index
            .register_term("Array", IndexTerm::new(Term::new("a list", "http://a")))
            .unwrap();
        index.register_display_alias("Bit", "bit").unwrap();
        index.register_alias("Bit", "bits").unwrap();
        let labels: Vec<&str> = index.display_entries().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Array", "Bit", "bit"]);
    }

    #[test]
    fn display_entries_point_display_aliases_at_canonical_record() {
        let mut index = bit_index();
        index.register_display_alias("Bit", "bit").unwrap();
        let entry = index
            .display_entries()
            .find(|e| e.label == "bit")
            .unwrap();
        assert_eq!(entry.canonical, "Bit");
        assert_eq!(entry.term.term().url(), "http://u1");
    }

    // End-to-end scenario: Bit with a lowercased display alias and a
    // lookup-only plural.
    #[test]
    fn bit_scenario_resolution_and_glossary_rows() {
        let mut index = bit_index();
        index.register_display_alias("Bit", "bit").unwrap();
        index.register_alias("Bit", "bits").unwrap();

        let via_display = index.resolve("bit", None, None).unwrap().into_string();
        assert_eq!(via_display, r#"<a href="http://u1">bit</a>"#);
        let via_plural = index.resolve("bits", None, None).unwrap().into_string();
        assert_eq!(via_plural, r#"<a href="http://u1">bits</a>"#);

        let labels: Vec<&str> = index.display_entries().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Bit", "bit"]);
    }
}
