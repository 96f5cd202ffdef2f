//! Course directory scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Walks the course directory to discover
//! lessons and chapters, producing a structured manifest that the generate
//! stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! course/                          # Course root
//! ├── config.toml                  # Site configuration (optional)
//! ├── vocabulary.toml              # Terms + bibliography (optional)
//! ├── 010-getting-started.md       # Lesson (numbered = appears in nav)
//! ├── 020-variables.md
//! ├── 030-Control-Flow/            # Chapter (one level of nesting)
//! │   ├── 010-if-else.md
//! │   └── 020-loops.md
//! └── drafts/                      # Unnumbered = hidden from nav
//!     └── scratch.md
//! ```
//!
//! ## Naming Conventions
//!
//! - **Numbered entries** (`NNN-name`): appear in navigation, sorted by number
//! - **Unnumbered entries**: built but hidden from navigation
//! - Chapters and top-level lessons share one number sequence for nav order
//!
//! ## Section identifiers
//!
//! Every lesson gets a [`SectionId`], assigned sequentially in document
//! order (navigation order, hidden lessons last). The glossary uses these to
//! back-link terms to the lessons that referenced them.
//!
//! ## Validation
//!
//! The scanner enforces:
//! - chapters nest at most one level (no chapter inside a chapter)
//! - no duplicate lesson numbers within a directory
//! - every chapter directory contains at least one lesson

use crate::config;
use crate::naming::{EntryName, parse_entry_name};
use crate::term::SectionId;
use crate::types::{Lesson, Manifest, NavItem};
use crate::vocab::{self, VocabError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Vocabulary error: {0}")]
    Vocab(#[from] VocabError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Duplicate lesson number {0} in {1}")]
    DuplicateNumber(u32, PathBuf),
    #[error("Chapters nest at most one level: {0}")]
    NestedChapter(PathBuf),
    #[error("Chapter contains no lessons: {0}")]
    EmptyChapter(PathBuf),
}

/// A lesson source file before its section is assigned.
struct LessonSource {
    name: EntryName,
    path: PathBuf,
    /// Source path relative to the course root.
    rel: String,
    /// Chapter slug, when the lesson lives inside a chapter.
    chapter: Option<String>,
}

/// One top-level navigation unit: a lesson or a whole chapter.
enum Unit {
    Lesson(LessonSource),
    Chapter {
        name: EntryName,
        dir: PathBuf,
        lessons: Vec<LessonSource>,
    },
}

impl Unit {
    fn sort_key(&self) -> (u32, &str) {
        match self {
            Unit::Lesson(lesson) => (lesson.name.sort_key(), lesson.rel.as_str()),
            Unit::Chapter { name, dir, .. } => {
                (name.sort_key(), dir.to_str().unwrap_or_default())
            }
        }
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let vocabulary = vocab::load(&root.join("vocabulary.toml"))?;

    // Depth check up front: lesson files deeper than chapter level mean a
    // nested chapter, which the layout does not support.
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.path()));
    for entry in walker {
        let entry = entry?;
        if entry.depth() >= 3 && is_lesson_file(entry.path()) {
            let parent = entry.path().parent().unwrap_or(root).to_path_buf();
            return Err(ScanError::NestedChapter(parent));
        }
    }

    let mut units = collect_units(root)?;
    units.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let (lessons, navigation) = assign_sections(units)?;

    Ok(Manifest {
        navigation,
        lessons,
        vocabulary,
        config,
    })
}

fn is_lesson_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Collect top-level lessons and chapters, validating number uniqueness
/// per directory.
fn collect_units(root: &Path) -> Result<Vec<Unit>, ScanError> {
    let mut units = Vec::new();
    let mut entries: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| !is_hidden(p))
        .collect();
    entries.sort();

    for path in entries {
        if is_lesson_file(&path) {
            units.push(Unit::Lesson(lesson_source(root, &path, None)?));
        } else if path.is_dir() {
            let dir_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let name = parse_entry_name(&dir_name);
            let lessons = collect_chapter_lessons(root, &path, &name)?;
            units.push(Unit::Chapter {
                name,
                dir: path,
                lessons,
            });
        }
    }

    check_numbers(
        root,
        units.iter().filter_map(|u| match u {
            Unit::Lesson(l) => l.name.order,
            Unit::Chapter { name, .. } => name.order,
        }),
    )?;
    Ok(units)
}

fn collect_chapter_lessons(
    root: &Path,
    dir: &Path,
    chapter: &EntryName,
) -> Result<Vec<LessonSource>, ScanError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| !is_hidden(p) && is_lesson_file(p))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(ScanError::EmptyChapter(dir.to_path_buf()));
    }

    let chapter_slug = slug_or_stem(chapter, dir);
    let mut lessons = Vec::new();
    for path in paths {
        lessons.push(lesson_source(root, &path, Some(chapter_slug.clone()))?);
    }
    lessons.sort_by(|a, b| (a.name.sort_key(), &a.rel).cmp(&(b.name.sort_key(), &b.rel)));
    check_numbers(dir, lessons.iter().filter_map(|l| l.name.order))?;
    Ok(lessons)
}

fn lesson_source(
    root: &Path,
    path: &Path,
    chapter: Option<String>,
) -> Result<LessonSource, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    Ok(LessonSource {
        name: parse_entry_name(&stem),
        path: path.to_path_buf(),
        rel,
        chapter,
    })
}

/// Error on duplicate number prefixes within one directory.
fn check_numbers(dir: &Path, numbers: impl Iterator<Item = u32>) -> Result<(), ScanError> {
    let mut seen = std::collections::BTreeSet::new();
    for number in numbers {
        if !seen.insert(number) {
            return Err(ScanError::DuplicateNumber(number, dir.to_path_buf()));
        }
    }
    Ok(())
}

/// Fall back to the raw entry name when the slug is empty (number-only names
/// like `010.md`).
fn slug_or_stem(name: &EntryName, path: &Path) -> String {
    if name.slug.is_empty() {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    } else {
        name.slug.clone()
    }
}

/// Flatten units into document order, read bodies, assign section ids, and
/// build the navigation tree.
fn assign_sections(units: Vec<Unit>) -> Result<(Vec<Lesson>, Vec<NavItem>), ScanError> {
    let mut lessons = Vec::new();
    let mut navigation = Vec::new();
    let mut next_section = 1u32;

    for unit in units {
        match unit {
            Unit::Lesson(source) => {
                let lesson = read_lesson(source, &mut next_section)?;
                if lesson.in_nav {
                    navigation.push(NavItem {
                        title: lesson.link_title.clone(),
                        href: lesson.href.clone(),
                        children: vec![],
                    });
                }
                lessons.push(lesson);
            }
            Unit::Chapter {
                name,
                lessons: chapter_lessons,
                ..
            } => {
                let mut children = Vec::new();
                let chapter_in_nav = name.in_nav();
                for source in chapter_lessons {
                    let lesson = read_lesson(source, &mut next_section)?;
                    if chapter_in_nav && lesson.in_nav {
                        children.push(NavItem {
                            title: lesson.link_title.clone(),
                            href: lesson.href.clone(),
                            children: vec![],
                        });
                    }
                    lessons.push(lesson);
                }
                if chapter_in_nav {
                    navigation.push(NavItem {
                        title: name.title.clone(),
                        href: children
                            .first()
                            .map(|c| c.href.clone())
                            .unwrap_or_default(),
                        children,
                    });
                }
            }
        }
    }

    Ok((lessons, navigation))
}

fn read_lesson(source: LessonSource, next_section: &mut u32) -> Result<Lesson, ScanError> {
    let body = fs::read_to_string(&source.path)?;
    let link_title = if source.name.title.is_empty() {
        slug_or_stem(&source.name, &source.path)
    } else {
        source.name.title.clone()
    };

    // Title comes from the first `# heading`, falling back to the filename.
    let title = body
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .unwrap_or_else(|| link_title.clone());

    let slug = slug_or_stem(&source.name, &source.path);
    let href = match &source.chapter {
        Some(chapter) => format!("{chapter}/{slug}.html"),
        None => format!("{slug}.html"),
    };

    let section = SectionId(*next_section);
    *next_section += 1;

    Ok(Lesson {
        title,
        link_title,
        href,
        source: source.rel,
        body,
        in_nav: source.name.in_nav(),
        section,
    })
}
