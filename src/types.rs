//! Shared types serialized between pipeline stages.
//!
//! The scan stage writes a [`Manifest`] as JSON; the generate stage reads it
//! back. Both stages must agree on these shapes exactly.

use crate::config::SiteConfig;
use crate::term::SectionId;
use crate::vocab::VocabFile;
use serde::{Deserialize, Serialize};

/// Everything the generate stage needs: navigation, lesson bodies, the raw
/// vocabulary, and site config.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub navigation: Vec<NavItem>,
    pub lessons: Vec<Lesson>,
    pub vocabulary: VocabFile,
    pub config: SiteConfig,
}

/// One lesson page, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Title from the first `# heading` in the markdown, falling back to the
    /// display title from the filename.
    pub title: String,
    /// Display label in navigation (filename with number stripped, dashes →
    /// spaces).
    pub link_title: String,
    /// Output path relative to the site root, e.g. `control-flow/loops.html`.
    pub href: String,
    /// Source path relative to the course root, for CLI output.
    pub source: String,
    /// Raw markdown body.
    pub body: String,
    /// Whether this lesson appears in navigation (has a number prefix).
    pub in_nav: bool,
    /// The lesson's section identifier, assigned sequentially in document
    /// order across the whole course.
    pub section: SectionId,
}

/// Navigation tree item: a lesson link or a chapter with lesson children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// What kind of page a descriptor is, carried explicitly so navigation
/// wiring can match on the tag instead of inspecting page contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRole {
    Home,
    Lesson,
    Glossary,
    References,
}
