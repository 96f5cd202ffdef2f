//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest and generates the
//! final static course site.
//!
//! ## Generated Pages
//!
//! - **Home page** (`/index.html`): course title and lesson listing
//! - **Lesson pages** (`/{lesson}.html`, `/{chapter}/{lesson}.html`):
//!   markdown bodies with term references resolved to links
//! - **Glossary page** (`/glossary.html`): every displayed term and alias,
//!   alphabetically, with back-links to the lessons that used it
//! - **References page** (`/references.html`): the bibliography
//!
//! ## Term references
//!
//! Lesson markdown may reference vocabulary with `[[Name]]` or
//! `[[Name|display text]]`. Spans resolve against the term index first
//! (recording the lesson as a usage site), then the bibliography. An
//! unresolvable span falls back to its literal text and is reported as a
//! warning — broken vocabulary never aborts a build, and no placeholder
//! text leaks into the output. Fenced code blocks and inline code are left
//! alone, so bracketed syntax in code samples survives verbatim.
//!
//! ## Navigation
//!
//! Every page carries a [`PageRole`]; prev/next links come from the page's
//! position in the sequence home → lessons → glossary → references, wired by
//! matching on the role tag.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating
//! with automatic XSS escaping. The stylesheet is embedded at compile time;
//! theme colors from `config.toml` are injected as CSS custom properties.

use crate::config;
use crate::index::Index;
use crate::references::References;
use crate::term::SectionId;
use crate::types::{Lesson, Manifest, NavItem, PageRole};
use crate::vocab::{self, VocabError};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Vocabulary error: {0}")]
    Vocab(#[from] VocabError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// What a generation run produced, for CLI reporting.
#[derive(Debug)]
pub struct GenerateReport {
    /// Total pages written (lessons + home + glossary + references).
    pub pages: usize,
    /// Duplicate-vocabulary and unresolved-reference warnings, in the order
    /// they were discovered.
    pub warnings: Vec<String>,
}

/// One position in the site's page sequence.
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    pub role: PageRole,
    /// Output path relative to the site root (`index.html`, `loops.html`, ...).
    pub href: String,
    pub title: String,
}

pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    generate_site(&manifest, output_dir)
}

pub fn generate_site(
    manifest: &Manifest,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let vocabulary = vocab::build(
        &manifest.vocabulary,
        manifest.config.vocabulary.on_duplicate_term,
    )?;
    let mut index = vocabulary.index;
    let references = vocabulary.references;
    let mut warnings = vocabulary.warnings;

    let css = format!(
        "{}\n\n{}",
        config::generate_theme_css(&manifest.config.theme),
        CSS_STATIC
    );

    let sequence = page_sequence(manifest);

    fs::create_dir_all(output_dir)?;

    // Render bodies first: this is the pass that accumulates usage sites on
    // the index, so it must complete before the glossary is rendered.
    let mut bodies = Vec::with_capacity(manifest.lessons.len());
    for lesson in &manifest.lessons {
        let substituted = replace_page_refs(
            &lesson.body,
            lesson.section,
            &lesson.source,
            &mut index,
            &references,
            &mut warnings,
        );
        let parser = Parser::new(&substituted);
        let mut body_html = String::new();
        md_html::push_html(&mut body_html, parser);
        bodies.push(body_html);
    }

    for (lesson, body_html) in manifest.lessons.iter().zip(&bodies) {
        let page = render_lesson_page(manifest, lesson, body_html, &sequence, &css);
        let out = output_dir.join(&lesson.href);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(out, page.into_string())?;
    }

    // Section table for glossary back-links.
    let sections: BTreeMap<SectionId, &Lesson> =
        manifest.lessons.iter().map(|l| (l.section, l)).collect();

    let glossary = render_glossary_page(manifest, &index, &sections, &sequence, &css);
    fs::write(output_dir.join("glossary.html"), glossary.into_string())?;

    let bibliography = render_references_page(manifest, &references, &index, &sequence, &css);
    fs::write(output_dir.join("references.html"), bibliography.into_string())?;

    let home = render_home_page(manifest, &sequence, &css);
    fs::write(output_dir.join("index.html"), home.into_string())?;

    Ok(GenerateReport {
        pages: manifest.lessons.len() + 3,
        warnings,
    })
}

// ============================================================================
// Term reference resolution
// ============================================================================

/// Replace `[[Name]]` / `[[Name|display text]]` spans with resolved links.
///
/// The index is consulted first (recording `site` as a usage location), then
/// the bibliography. Unresolved spans become their literal display text and
/// push a warning naming the lesson.
///
/// Code regions are exempt: spans inside fenced code blocks and inline code
/// pass through untouched, so constructs like C++ `[[nodiscard]]` in code
/// samples are never rewritten.
pub fn replace_page_refs(
    body: &str,
    site: SectionId,
    source: &str,
    index: &mut Index,
    references: &References,
    warnings: &mut Vec<String>,
) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_fence = false;
    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if in_fence {
            out.push_str(line);
            continue;
        }
        substitute_outside_inline_code(line, site, source, index, references, warnings, &mut out);
    }
    out
}

/// Substitute spans in one line, leaving backtick-delimited inline code
/// alone. Splitting on `` ` `` alternates plain (even) and code (odd)
/// segments; an unclosed backtick leaves the trailing segment as code,
/// which errs on the side of not rewriting.
fn substitute_outside_inline_code(
    line: &str,
    site: SectionId,
    source: &str,
    index: &mut Index,
    references: &References,
    warnings: &mut Vec<String>,
    out: &mut String,
) {
    if !line.contains('`') {
        substitute_spans(line, site, source, index, references, warnings, out);
        return;
    }
    for (i, segment) in line.split('`').enumerate() {
        if i > 0 {
            out.push('`');
        }
        if i % 2 == 0 {
            substitute_spans(segment, site, source, index, references, warnings, out);
        } else {
            out.push_str(segment);
        }
    }
}

fn substitute_spans(
    chunk: &str,
    site: SectionId,
    source: &str,
    index: &mut Index,
    references: &References,
    warnings: &mut Vec<String>,
    out: &mut String,
) {
    let mut rest = chunk;
    while let Some(start) = rest.find("[[") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = match (after.find("]]"), after.find("[[")) {
            (Some(end), Some(open)) if open > end => Some(end),
            (Some(end), None) => Some(end),
            _ => None,
        };
        let Some(end) = end else {
            // Unclosed opener, or another opener before the close: these
            // brackets are literal text. Rescan from the next candidate so
            // a valid span following a stray `[[` still resolves.
            out.push_str("[[");
            rest = after;
            continue;
        };
        let span = &after[..end];
        let (name, text) = match span.split_once('|') {
            Some((name, text)) => (name.trim(), Some(text.trim())),
            None => (span.trim(), None),
        };
        let resolved = index
            .resolve(name, text, Some(site))
            .or_else(|| references.resolve(name, text));
        match resolved {
            Some(link) => out.push_str(&link.into_string()),
            None => {
                warnings.push(format!("{source}: unresolved reference [[{span}]]"));
                out.push_str(text.unwrap_or(name));
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
}

// ============================================================================
// Page sequence and navigation
// ============================================================================

/// The site's linear page order: home, lessons in document order (hidden
/// lessons excluded), glossary, references.
pub fn page_sequence(manifest: &Manifest) -> Vec<PageDescriptor> {
    let mut pages = vec![PageDescriptor {
        role: PageRole::Home,
        href: "index.html".to_string(),
        title: manifest.config.title.clone(),
    }];
    for lesson in manifest.lessons.iter().filter(|l| l.in_nav) {
        pages.push(PageDescriptor {
            role: PageRole::Lesson,
            href: lesson.href.clone(),
            title: lesson.title.clone(),
        });
    }
    pages.push(PageDescriptor {
        role: PageRole::Glossary,
        href: "glossary.html".to_string(),
        title: "Glossary".to_string(),
    });
    pages.push(PageDescriptor {
        role: PageRole::References,
        href: "references.html".to_string(),
        title: "References".to_string(),
    });
    pages
}

/// Prev/next descriptors for the page at `href`. Pages outside the sequence
/// (hidden lessons) get neither.
pub fn neighbors<'a>(
    sequence: &'a [PageDescriptor],
    href: &str,
) -> (Option<&'a PageDescriptor>, Option<&'a PageDescriptor>) {
    let Some(pos) = sequence.iter().position(|p| p.href == href) else {
        return (None, None);
    };
    let prev = pos.checked_sub(1).and_then(|i| sequence.get(i));
    (prev, sequence.get(pos + 1))
}

/// Root-absolute URL for a page href; the home page collapses to `/`.
fn abs(href: &str) -> String {
    if href == "index.html" {
        "/".to_string()
    } else {
        format!("/{href}")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(title: &str, site_title: &str, css: &str, content: Markup) -> Markup {
    let full_title = if title == site_title {
        title.to_string()
    } else {
        format!("{title} - {site_title}")
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb and navigation.
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.site-nav {
                (nav)
            }
        }
    }
}

/// Renders the navigation menu: lessons and chapters, then the glossary and
/// references links after a separator.
pub fn render_nav(items: &[NavItem], current_href: &str) -> Markup {
    html! {
        ul {
            @for item in items {
                (render_nav_item(item, current_href))
            }
            li.nav-separator role="separator" {}
            li class=[(current_href == "glossary.html").then_some("current")] {
                a href="/glossary.html" { "Glossary" }
            }
            li class=[(current_href == "references.html").then_some("current")] {
                a href="/references.html" { "References" }
            }
        }
    }
}

/// Renders a single navigation item (chapters carry children).
fn render_nav_item(item: &NavItem, current_href: &str) -> Markup {
    let is_current = item.href == current_href
        || item.children.iter().any(|child| child.href == current_href);

    html! {
        li class=[is_current.then_some("current")] {
            @if item.children.is_empty() {
                a href=(abs(&item.href)) { (item.title) }
            } @else {
                a.nav-group href=(abs(&item.href)) { (item.title) }
                ul {
                    @for child in &item.children {
                        (render_nav_item(child, current_href))
                    }
                }
            }
        }
    }
}

/// Renders the prev/next pager from the page sequence.
fn render_pager(sequence: &[PageDescriptor], href: &str) -> Markup {
    let (prev, next) = neighbors(sequence, href);
    html! {
        @if prev.is_some() || next.is_some() {
            nav.pager {
                @if let Some(page) = prev {
                    a.prev href=(abs(&page.href)) { "← " (page.title) }
                }
                @if let Some(page) = next {
                    a.next href=(abs(&page.href)) { (page.title) " →" }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page: course title plus the lesson listing.
fn render_home_page(manifest: &Manifest, sequence: &[PageDescriptor], css: &str) -> Markup {
    let nav = render_nav(&manifest.navigation, "");
    let breadcrumb = html! {
        a href="/" { (manifest.config.title) }
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.home-page {
            h1 { (manifest.config.title) }
            ul.lesson-list {
                @for item in &manifest.navigation {
                    li {
                        a href=(abs(&item.href)) { (item.title) }
                        @if !item.children.is_empty() {
                            ul {
                                @for child in &item.children {
                                    li {
                                        a href=(abs(&child.href)) { (child.title) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        (render_pager(sequence, "index.html"))
    };

    base_document(&manifest.config.title, &manifest.config.title, css, content)
}

/// Renders one lesson page from its pre-rendered markdown body.
fn render_lesson_page(
    manifest: &Manifest,
    lesson: &Lesson,
    body_html: &str,
    sequence: &[PageDescriptor],
    css: &str,
) -> Markup {
    let nav = render_nav(&manifest.navigation, &lesson.href);
    let breadcrumb = html! {
        a href="/" { (manifest.config.title) }
        " › "
        (lesson.title)
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.lesson-page {
            article.lesson-content {
                (PreEscaped(body_html))
            }
        }
        (render_pager(sequence, &lesson.href))
    };

    base_document(&lesson.title, &manifest.config.title, css, content)
}

/// Renders the glossary page: one row per displayed term or alias, in
/// alphabetical order, each with its substituted description and back-links
/// to the lessons that used it (in document order).
fn render_glossary_page(
    manifest: &Manifest,
    index: &Index,
    sections: &BTreeMap<SectionId, &Lesson>,
    sequence: &[PageDescriptor],
    css: &str,
) -> Markup {
    let nav = render_nav(&manifest.navigation, "glossary.html");
    let breadcrumb = html! {
        a href="/" { (manifest.config.title) }
        " › "
        "Glossary"
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.glossary-page {
            h1 { "Glossary" }
            ul.glossary-list {
                @for entry in index.display_entries() {
                    li {
                        (entry.term.term().link_with_description(entry.label, index))
                        @if entry.term.has_usages() {
                            " ("
                            @for (i, site) in entry.term.usage_sites().enumerate() {
                                @if i > 0 { ", " }
                                @if let Some(lesson) = sections.get(&site) {
                                    a href=(abs(&lesson.href)) { (lesson.title) }
                                }
                            }
                            ")"
                        }
                    }
                }
            }
        }
        (render_pager(sequence, "glossary.html"))
    };

    base_document("Glossary", &manifest.config.title, css, content)
}

/// Renders the references page: the bibliography in sorted order. Reference
/// descriptions may quote glossary terms, so substitution consults the index.
fn render_references_page(
    manifest: &Manifest,
    references: &References,
    index: &Index,
    sequence: &[PageDescriptor],
    css: &str,
) -> Markup {
    let nav = render_nav(&manifest.navigation, "references.html");
    let breadcrumb = html! {
        a href="/" { (manifest.config.title) }
        " › "
        "References"
    };

    let content = html! {
        (site_header(breadcrumb, nav))
        main.references-page {
            h1 { "References" }
            ul.reference-list {
                @for (name, term) in references.entries() {
                    li {
                        (term.link_with_description(name, index))
                    }
                }
            }
        }
        (render_pager(sequence, "references.html"))
    };

    base_document("References", &manifest.config.title, css, content)
}

// ============================================================================
// Tests
// ============================================================================
