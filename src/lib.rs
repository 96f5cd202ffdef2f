//! # Coursegen
//!
//! A minimal static site generator for programming-course websites. Your
//! filesystem is the data source: numbered markdown files become lessons,
//! numbered directories become chapters, and a `vocabulary.toml` becomes a
//! cross-linked glossary and bibliography.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Coursegen processes content through two independent stages with a JSON
//! manifest between them:
//!
//! ```text
//! 1. Scan      course/   →  manifest.json   (filesystem → structured data)
//! 2. Generate  manifest  →  dist/           (final HTML site)
//! ```
//!
//! This separation exists for two reasons:
//!
//! - **Debuggability**: the manifest is human-readable JSON you can inspect.
//! - **Testability**: generation is a pure function from manifest to HTML,
//!   so tests can exercise rendering without touching the filesystem layout.
//!
//! # The Term Index
//!
//! The distinguishing feature is the vocabulary system. Terms declared in
//! `vocabulary.toml` carry a URL, a description, and any number of aliases
//! (`"bits"` → `"Bit"`). Lesson markdown references them with `[[Name]]`
//! spans, which render as links and record the lesson as a usage site; the
//! generated glossary lists every displayed term alphabetically with
//! back-links to the lessons that used it. Term descriptions can themselves
//! quote other terms, which become links too.
//!
//! The index is a plain value built once per run and passed explicitly to
//! every renderer — no globals, no singletons. Alias collisions abort the
//! build; unknown lookups are soft misses the caller handles.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the course directory, assigns section ids, produces the manifest |
//! | [`generate`] | Stage 2 — renders lesson, glossary, references, and home pages using Maud |
//! | [`term`] | `Term` / `IndexTerm` values and quoted-description substitution |
//! | [`index`] | The term index: registration, alias resolution, usage tracking |
//! | [`references`] | The bibliography registry |
//! | [`vocab`] | `vocabulary.toml` parsing and index construction |
//! | [`config`] | `config.toml` loading, validation, and theme CSS generation |
//! | [`types`] | Shared types serialized between stages (`Manifest`, `Lesson`, `PageRole`) |
//! | [`naming`] | `NNN-name` filename convention parser |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system: malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship.
//!
//! ## NNN-Prefix Ordering
//!
//! Lessons and chapters use a numeric prefix (`010-`, `020-`) for explicit
//! ordering, parsed by [`naming::parse_entry_name`]. Entries without a prefix
//! are generated but hidden from navigation — useful for drafts that should
//! stay reachable by direct URL. The filesystem is the source of truth; no
//! database, no front-matter.
//!
//! ## Plain HTML Output
//!
//! The generated site is HTML and CSS only — no JavaScript runtime, no
//! service worker. A course site published today should render identically
//! on any file server for decades.

pub mod config;
pub mod generate;
pub mod index;
pub mod naming;
pub mod output;
pub mod references;
pub mod scan;
pub mod term;
pub mod types;
pub mod vocab;

#[cfg(test)]
pub(crate) mod test_helpers;
