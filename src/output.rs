//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**: the primary line for
//! every lesson is its positional index and title, with the source file shown
//! as an indented `Source:` context line. Vocabulary and warning summaries
//! follow the content listing.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Lessons
//! 001 Getting Started
//!     Source: 010-getting-started.md
//! 002 If and Else
//!     Source: 030-Control-Flow/010-if-else.md
//!
//! Vocabulary
//!     12 terms, 3 references
//! ```
//!
//! ## Generate
//!
//! ```text
//! Generated 6 pages
//!
//! Warnings
//!     010-intro.md: unresolved reference [[NoSuchTerm]]
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::generate::GenerateReport;
use crate::types::Manifest;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

/// Format the scan stage result: lesson listing plus vocabulary summary.
pub fn format_scan_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = vec!["Lessons".to_string()];
    for (pos, lesson) in manifest.lessons.iter().enumerate() {
        let marker = if lesson.in_nav { "" } else { " (hidden)" };
        lines.push(format!("{} {}{}", format_index(pos + 1), lesson.title, marker));
        lines.push(format!("    Source: {}", lesson.source));
    }

    lines.push(String::new());
    lines.push("Vocabulary".to_string());
    lines.push(format!(
        "    {} terms, {} references",
        manifest.vocabulary.terms.len(),
        manifest.vocabulary.references.len()
    ));
    lines
}

/// Format the generate stage result: page count plus any warnings.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!("Generated {} pages", report.pages)];
    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &report.warnings {
            lines.push(format!("    {warning}"));
        }
    }
    lines
}

pub fn print_scan_output(manifest: &Manifest) {
    for line in format_scan_output(manifest) {
        println!("{line}");
    }
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{line}");
    }
}
