//! # repair-site
//!
//! The website of a phone-repair shop: six documents, the controllers that
//! make them interactive, and a small server that hands them out.
//!
//! # Architecture
//!
//! ```text
//!   config.toml ──▶ generate ──▶ site root (*.html) ──▶ server ──▶ browser
//!                      │                                             │
//!                      └── page_hooks ──▶ view::page::Page ◀── UI events
//! ```
//!
//! The same [`config::SiteConfig`] feeds the markup and the controllers, and
//! both spell their shared class names through [`view::hooks`], so a
//! document and the controllers mounted on it always agree on which nodes
//! exist.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, validation, merging, CSS color generation |
//! | [`types`] | Content entries shared by config, markup and controllers |
//! | [`routes`] | Request path → document resolution |
//! | [`server`] | axum document server with no-cache responses |
//! | [`generate`] | maud rendering of the six documents |
//! | [`view`] | Page controllers: menu, gallery filter, lightbox, contact form, reveal |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | tracing subscriber setup |
//!
//! # Design Decisions
//!
//! ## Controllers Without a DOM
//!
//! Each interactive behaviour is a plain state machine that writes through
//! the [`view::View`] trait. Nothing in [`view`] knows about a browser, so
//! every behaviour (including timing, which runs on a virtual clock) is
//! unit tested against a recording fake.
//!
//! ## Keyword Routing
//!
//! Page URLs are matched by keyword rather than exact path, so old links
//! and localized prefixes (`/de/services`) keep working. The price is that
//! a path naming two keywords resolves by keyword priority; see
//! [`routes`].

pub mod config;
pub mod generate;
pub mod logging;
pub mod output;
pub mod routes;
pub mod server;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
