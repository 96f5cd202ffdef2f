//! Vocabulary file loading and index construction.
//!
//! `vocabulary.toml` in the course root declares the terms behind the
//! glossary and the bibliography entries behind the references page:
//!
//! ```toml
//! [[term]]
//! name = "Bit"
//! url = "https://en.wikipedia.org/wiki/Bit"
//! description = "The smallest unit of information."
//! aliases = ["binary digit"]           # lookup-only
//! lowercased_aliases = []              # alias + its lowercase form
//! display_aliases = ["bit"]            # own glossary row
//! display_aliases_with_plural = []     # display alias + plural lookup
//! auto_variants = true                 # name+"s", lowercase, lowercase+"s"
//!
//! [[reference]]
//! name = "K&R"
//! url = "https://en.wikipedia.org/wiki/The_C_Programming_Language"
//! description = "The classic C book."
//! ```
//!
//! Loading is pure parsing; [`build`] turns the parsed file into a populated
//! [`Index`] and [`References`] pair. Duplicate *aliases* always abort (two
//! entries fighting over one spelling), as does a term name colliding with
//! an alias or vice versa. Duplicate *term names* follow the
//! configured [`DuplicatePolicy`]: warn-and-overwrite by default, promotable
//! to a hard error. Warnings are returned as values for the CLI layer to
//! print.

use crate::config::DuplicatePolicy;
use crate::index::{Index, IndexError};
use crate::references::References;
use crate::term::{IndexTerm, Term};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("term {0:?} is registered twice in vocabulary.toml (on_duplicate_term = \"error\")")]
    DuplicateTerm(String),
}

/// Parsed `vocabulary.toml`. Travels through the manifest unmodified; the
/// generate stage builds the live index from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocabFile {
    #[serde(rename = "term")]
    pub terms: Vec<TermEntry>,
    #[serde(rename = "reference")]
    pub references: Vec<ReferenceEntry>,
}

/// One `[[term]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermEntry {
    pub name: String,
    pub url: String,
    pub description: String,
    /// Lookup-only aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Each entry registers the alias and its lowercase form, both lookup-only.
    #[serde(default)]
    pub lowercased_aliases: Vec<String>,
    /// Aliases that get their own glossary row.
    #[serde(default)]
    pub display_aliases: Vec<String>,
    /// Display aliases whose plural is additionally registered lookup-only.
    #[serde(default)]
    pub display_aliases_with_plural: Vec<String>,
    /// Register `name + "s"`, the lowercase name, and its plural as
    /// lookup-only aliases.
    #[serde(default)]
    pub auto_variants: bool,
}

/// One `[[reference]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceEntry {
    pub name: String,
    pub url: String,
    pub description: String,
}

/// The live registries built from a [`VocabFile`], plus any warnings the
/// build produced.
#[derive(Debug, Default)]
pub struct Vocabulary {
    pub index: Index,
    pub references: References,
    pub warnings: Vec<String>,
}

/// Load `vocabulary.toml`. A missing file is an empty vocabulary, not an
/// error — a course without a glossary is legitimate.
pub fn load(path: &Path) -> Result<VocabFile, VocabError> {
    if !path.exists() {
        return Ok(VocabFile::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the [`Index`] and [`References`] from a parsed vocabulary file.
///
/// Entries register in file order. Order only matters under the `overwrite`
/// duplicate policy, where the last registration of a term name wins.
pub fn build(file: &VocabFile, policy: DuplicatePolicy) -> Result<Vocabulary, VocabError> {
    let mut vocabulary = Vocabulary::default();

    for entry in &file.terms {
        let term = IndexTerm::new(Term::new(&entry.description, &entry.url));
        if let Some(displaced) = vocabulary.index.register_term(&entry.name, term)? {
            match policy {
                DuplicatePolicy::Error => {
                    return Err(VocabError::DuplicateTerm(entry.name.clone()));
                }
                DuplicatePolicy::Overwrite => vocabulary.warnings.push(format!(
                    "term {:?} registered twice; keeping the later entry ({} replaces {})",
                    entry.name,
                    entry.url,
                    displaced.term().url(),
                )),
            }
        }
        for alias in &entry.aliases {
            vocabulary.index.register_alias(&entry.name, alias)?;
        }
        for alias in &entry.lowercased_aliases {
            vocabulary.index.register_alias_lower_cased(&entry.name, alias)?;
        }
        for alias in &entry.display_aliases {
            vocabulary.index.register_display_alias(&entry.name, alias)?;
        }
        for alias in &entry.display_aliases_with_plural {
            vocabulary
                .index
                .register_display_alias_with_plural(&entry.name, alias)?;
        }
        if entry.auto_variants {
            vocabulary
                .index
                .register_lower_case_and_plural_aliases(&entry.name)?;
        }
    }

    for entry in &file.references {
        if vocabulary
            .references
            .register(&entry.name, Term::new(&entry.description, &entry.url))
            .is_some()
        {
            vocabulary.warnings.push(format!(
                "reference {:?} registered twice; keeping the later entry",
                entry.name
            ));
        }
    }

    Ok(vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn term_entry(name: &str, url: &str) -> TermEntry {
        TermEntry {
            name: name.to_string(),
            url: url.to_string(),
            description: format!("about {name}"),
            aliases: vec![],
            lowercased_aliases: vec![],
            display_aliases: vec![],
            display_aliases_with_plural: vec![],
            auto_variants: false,
        }
    }

    #[test]
    fn load_missing_file_is_empty_vocabulary() {
        let tmp = TempDir::new().unwrap();
        let file = load(&tmp.path().join("vocabulary.toml")).unwrap();
        assert!(file.terms.is_empty());
        assert!(file.references.is_empty());
    }

    #[test]
    fn load_parses_terms_and_references() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vocabulary.toml");
        fs::write(
            &path,
            r#"
[[term]]
name = "Bit"
url = "http://u1"
description = "The smallest unit of information."
display_aliases = ["bit"]
auto_variants = true

[[reference]]
name = "K&R"
url = "http://knr"
description = "The classic C book."
"#,
        )
        .unwrap();

        let file = load(&path).unwrap();
        assert_eq!(file.terms.len(), 1);
        assert_eq!(file.terms[0].display_aliases, vec!["bit"]);
        assert!(file.terms[0].auto_variants);
        assert_eq!(file.references.len(), 1);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vocabulary.toml");
        fs::write(&path, "[[term]]\nname = \"X\"\nurl = \"u\"\ndescription = \"d\"\nalais = []\n")
            .unwrap();
        assert!(matches!(load(&path), Err(VocabError::Toml(_))));
    }

    #[test]
    fn build_registers_all_alias_kinds() {
        let mut entry = term_entry("Bit", "http://u1");
        entry.aliases = vec!["binary digit".to_string()];
        entry.lowercased_aliases = vec!["Flag".to_string()];
        entry.display_aliases = vec!["bit".to_string()];
        entry.auto_variants = true;
        let file = VocabFile {
            terms: vec![entry],
            references: vec![],
        };

        let vocabulary = build(&file, DuplicatePolicy::Overwrite).unwrap();
        let index = &vocabulary.index;
        for alias in ["binary digit", "Flag", "flag", "bit", "Bits", "bits"] {
            assert_eq!(index.alias_target(alias), Some("Bit"), "alias {alias:?}");
        }
        assert!(index.is_display_alias("bit"));
        assert!(!index.is_display_alias("bits"));
        assert!(vocabulary.warnings.is_empty());
    }

    #[test]
    fn duplicate_term_warns_and_overwrites_by_default() {
        let file = VocabFile {
            terms: vec![term_entry("Bit", "http://old"), term_entry("Bit", "http://new")],
            references: vec![],
        };
        let vocabulary = build(&file, DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(vocabulary.warnings.len(), 1);
        assert!(vocabulary.warnings[0].contains("Bit"));
        assert_eq!(
            vocabulary.index.term("Bit").unwrap().term().url(),
            "http://new"
        );
    }

    #[test]
    fn duplicate_term_aborts_under_error_policy() {
        let file = VocabFile {
            terms: vec![term_entry("Bit", "http://old"), term_entry("Bit", "http://new")],
            references: vec![],
        };
        assert!(matches!(
            build(&file, DuplicatePolicy::Error),
            Err(VocabError::DuplicateTerm(name)) if name == "Bit"
        ));
    }

    #[test]
    fn duplicate_alias_across_entries_aborts() {
        let mut first = term_entry("Bit", "http://u1");
        first.aliases = vec!["b".to_string()];
        let mut second = term_entry("Byte", "http://u2");
        second.aliases = vec!["b".to_string()];
        let file = VocabFile {
            terms: vec![first, second],
            references: vec![],
        };
        assert!(matches!(
            build(&file, DuplicatePolicy::Overwrite),
            Err(VocabError::Index(_))
        ));
    }

    #[test]
    fn term_named_after_an_earlier_alias_aborts() {
        let mut first = term_entry("Byte", "http://u1");
        first.aliases = vec!["Octet".to_string()];
        let file = VocabFile {
            terms: vec![first, term_entry("Octet", "http://u2")],
            references: vec![],
        };
        assert!(matches!(
            build(&file, DuplicatePolicy::Overwrite),
            Err(VocabError::Index(_))
        ));
    }

    #[test]
    fn alias_matching_an_earlier_term_name_aborts() {
        let mut second = term_entry("Octet", "http://u2");
        second.aliases = vec!["Byte".to_string()];
        let file = VocabFile {
            terms: vec![term_entry("Byte", "http://u1"), second],
            references: vec![],
        };
        assert!(matches!(
            build(&file, DuplicatePolicy::Overwrite),
            Err(VocabError::Index(_))
        ));
    }

    #[test]
    fn duplicate_reference_warns() {
        let entry = ReferenceEntry {
            name: "K&R".to_string(),
            url: "http://a".to_string(),
            description: "d".to_string(),
        };
        let file = VocabFile {
            terms: vec![],
            references: vec![entry.clone(), entry],
        };
        let vocabulary = build(&file, DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(vocabulary.warnings.len(), 1);
        assert_eq!(vocabulary.references.len(), 1);
    }
}
