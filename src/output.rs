//! CLI output formatting for `check` and `generate`.
//!
//! Output is an inventory of the site, not a file listing: each document is
//! shown by its navigation title first, with the file it maps to as
//! secondary context.
//!
//! ## Check
//!
//! ```text
//! Site
//!     B-repair&service
//!     Root: ./site
//! Documents
//! 001 Home → index.html
//! 002 Services → services.html (missing)
//! ...
//! Content
//!     4 services
//!     4 gallery entries in 3 categories
//!     3 stats
//!     4 prices
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Home → index.html
//! 002 Services → services.html
//! ...
//! Generated 6 documents in ./site
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::config::SiteConfig;
use crate::routes::DocumentId;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `001 Home → index.html`, with an optional trailing note.
fn document_line(index: usize, doc: DocumentId, note: Option<&str>) -> String {
    let base = format!("{} {} \u{2192} {}", format_index(index), doc.title(), doc.file_name());
    match note {
        Some(n) => format!("{base} ({n})"),
        None => base,
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Whether each document's file exists under `root`, in [`DocumentId::ALL`] order.
pub fn document_presence(root: &Path) -> Vec<(DocumentId, bool)> {
    DocumentId::ALL
        .iter()
        .map(|doc| (*doc, root.join(doc.file_name()).is_file()))
        .collect()
}

pub fn format_check_output(config: &SiteConfig, documents: &[(DocumentId, bool)]) -> Vec<String> {
    let mut lines = vec![
        "Site".to_string(),
        format!("{}{}", indent(1), config.site.name),
        format!("{}Root: {}", indent(1), config.server.root.display()),
        "Documents".to_string(),
    ];
    for (i, (doc, present)) in documents.iter().enumerate() {
        let note = (!present).then_some("missing");
        lines.push(document_line(i + 1, *doc, note));
    }

    lines.push("Content".to_string());
    lines.push(format!("{}{}", indent(1), plural(config.services.len(), "service", "services")));
    lines.push(format!(
        "{}{} in {}",
        indent(1),
        plural(config.gallery.len(), "gallery entry", "gallery entries"),
        plural(config.gallery_categories().len(), "category", "categories")
    ));
    lines.push(format!("{}{}", indent(1), plural(config.stats.len(), "stat", "stats")));
    lines.push(format!("{}{}", indent(1), plural(config.prices.len(), "price", "prices")));
    lines
}

pub fn print_check_output(config: &SiteConfig, documents: &[(DocumentId, bool)]) {
    for line in format_check_output(config, documents) {
        println!("{}", line);
    }
}

pub fn format_generate_output(written: &[PathBuf], output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = DocumentId::ALL
        .iter()
        .enumerate()
        .filter(|(_, doc)| written.iter().any(|p| p.ends_with(doc.file_name())))
        .map(|(i, doc)| document_line(i + 1, *doc, None))
        .collect();
    lines.push(format!(
        "Generated {} in {}",
        plural(written.len(), "document", "documents"),
        output_dir.display()
    ));
    lines
}

pub fn print_generate_output(written: &[PathBuf], output_dir: &Path) {
    for line in format_generate_output(written, output_dir) {
        println!("{}", line);
    }
}
