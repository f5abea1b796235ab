//! Request path → document resolution.
//!
//! The site is six static documents. Any top-level page request is mapped to
//! one of them by keyword, so `/services`, `/services/`, `/de/services/akku`
//! all land on the services page and anything unrecognised lands on home.
//!
//! ## Rules
//!
//! 1. A path containing `.` is a static asset reference. It is never mapped
//!    to a document; the caller serves the file or answers 404.
//! 2. Otherwise the path is searched for each keyword in [`DocumentId::KEYWORDS`]
//!    order, case-sensitively, and the first hit wins.
//! 3. No hit → [`DocumentId::Home`].
//!
//! A path carrying several keywords (`/gallery-and-contact`) resolves by
//! keyword priority, not by position in the path.

use std::fmt;

/// One of the fixed documents the server can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentId {
    Home,
    Services,
    Gallery,
    About,
    Contact,
    Preisliste,
}

impl DocumentId {
    /// Every document, home first.
    pub const ALL: [DocumentId; 6] = [
        DocumentId::Home,
        DocumentId::Services,
        DocumentId::Gallery,
        DocumentId::About,
        DocumentId::Contact,
        DocumentId::Preisliste,
    ];

    /// Keyword priority list. Order matters for multi-keyword paths.
    pub const KEYWORDS: [(&'static str, DocumentId); 5] = [
        ("services", DocumentId::Services),
        ("gallery", DocumentId::Gallery),
        ("about", DocumentId::About),
        ("contact", DocumentId::Contact),
        ("preisliste", DocumentId::Preisliste),
    ];

    /// File name of the document inside the site root.
    pub fn file_name(self) -> &'static str {
        match self {
            DocumentId::Home => "index.html",
            DocumentId::Services => "services.html",
            DocumentId::Gallery => "gallery.html",
            DocumentId::About => "about.html",
            DocumentId::Contact => "contact.html",
            DocumentId::Preisliste => "preisliste.html",
        }
    }

    /// Canonical URL path used in navigation links.
    pub fn href(self) -> &'static str {
        match self {
            DocumentId::Home => "/",
            DocumentId::Services => "/services",
            DocumentId::Gallery => "/gallery",
            DocumentId::About => "/about",
            DocumentId::Contact => "/contact",
            DocumentId::Preisliste => "/preisliste",
        }
    }

    /// Navigation label.
    pub fn title(self) -> &'static str {
        match self {
            DocumentId::Home => "Home",
            DocumentId::Services => "Services",
            DocumentId::Gallery => "Galerie",
            DocumentId::About => "Über uns",
            DocumentId::Contact => "Kontakt",
            DocumentId::Preisliste => "Preisliste",
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Outcome of resolving a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Serve this document.
    Document(DocumentId),
    /// The path names a static asset; it is not a page.
    Asset,
}

/// Map a request path to a document.
pub fn resolve(path: &str) -> Resolution {
    if path.contains('.') {
        return Resolution::Asset;
    }
    let doc = DocumentId::KEYWORDS
        .iter()
        .find(|(keyword, _)| path.contains(keyword))
        .map(|(_, doc)| *doc)
        .unwrap_or(DocumentId::Home);
    Resolution::Document(doc)
}
