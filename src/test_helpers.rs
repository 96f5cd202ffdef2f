//! Shared test utilities for the coursegen test suite.
//!
//! Builders for course trees on disk (scan tests) and in-memory manifests
//! (generate tests), so individual tests only state what they care about.

use crate::config::SiteConfig;
use crate::term::SectionId;
use crate::types::{Lesson, Manifest};
use crate::vocab::VocabFile;
use std::fs;
use std::path::Path;

/// Write a set of `(relative path, contents)` files under `root`, creating
/// intermediate directories as needed.
pub(crate) fn write_course_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

/// A minimal lesson record; the body is empty and the link title mirrors the
/// title.
pub(crate) fn lesson(title: &str, href: &str, section: u32, in_nav: bool) -> Lesson {
    Lesson {
        title: title.to_string(),
        link_title: title.to_string(),
        href: href.to_string(),
        source: format!("{section:03}-{title}.md"),
        body: String::new(),
        in_nav,
        section: SectionId(section),
    }
}

/// A manifest with the given lessons, default config, empty navigation and
/// vocabulary.
pub(crate) fn manifest_with_lessons(lessons: Vec<Lesson>) -> Manifest {
    Manifest {
        navigation: vec![],
        lessons,
        vocabulary: VocabFile::default(),
        config: SiteConfig::default(),
    }
}
