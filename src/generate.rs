//! HTML document generation.
//!
//! Renders the six site documents from [`SiteConfig`] into the site root,
//! where the [`server`](crate::server) picks them up.
//!
//! ## Generated Documents
//!
//! | Document | Interactive parts |
//! |----------|-------------------|
//! | `index.html` | service cards, stat counters |
//! | `services.html` | service cards with icon tooltips |
//! | `gallery.html` | filter buttons, gallery items with metadata blocks, lightbox |
//! | `about.html` | mission items, stat counters |
//! | `contact.html` | contact form with per-field error slots and result banners |
//! | `preisliste.html` | price table |
//!
//! Every document carries the same header with the hamburger and the nav
//! menu.
//!
//! ## Markup Contract
//!
//! The page controllers in [`view`](crate::view) find their nodes through
//! the class and attribute names in [`hooks`]. Everything here that a
//! controller reacts to is spelled through those constants, and
//! [`page_hooks`] reports the inventory each rendered document carries, so
//! the markup and the controllers cannot drift apart silently.
//!
//! ## CSS
//!
//! `static/site.css` is embedded at compile time and prefixed with the
//! color variables from `[colors]`. Animatable elements start hidden only
//! under `html.js`, so a page whose script never runs still shows all of
//! its content.
//!
//! ## Script
//!
//! `static/site.js` is embedded at the end of every `<body>`. It wires the
//! DOM to the same hooks and rules the controllers in [`view`](crate::view)
//! implement, reading timings and form messages from `data-*` attributes on
//! `<body>`. A one-line marker in `<head>` adds the `js` class first.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! so every interpolated config string is escaped.

use crate::config::{self, SiteConfig};
use crate::routes::DocumentId;
use crate::types::{GalleryEntry, Service, Stat};
use crate::view::form::FieldSpec;
use crate::view::gallery::ALL;
use crate::view::hooks;
use crate::view::lightbox::ItemInfo;
use crate::view::page::PageHooks;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const CSS_STATIC: &str = include_str!("../static/site.css");
const JS: &str = include_str!("../static/site.js");

/// Runs in `<head>` so the hidden-until-revealed styles only apply when the
/// page script will be there to reveal them.
const JS_MARKER: &str = "document.documentElement.classList.add('js');";

/// Label of the filter button that shows everything.
const ALL_LABEL: &str = "Alle";

/// Initial text of the contact form's submit button.
pub const SUBMIT_LABEL: &str = "Nachricht senden";

/// What the shop stands for, shown on the about page.
const MISSION: [(&str, &str); 3] = [
    ("Qualität", "Nur geprüfte Ersatzteile und sorgfältige Arbeit."),
    ("Schnelligkeit", "Die meisten Reparaturen sind am selben Tag erledigt."),
    ("Fairness", "Transparente Preise ohne versteckte Kosten."),
];

/// A control of the contact form.
struct FormField {
    name: &'static str,
    label: &'static str,
    /// `None` renders a textarea.
    input_type: Option<&'static str>,
    required: bool,
}

const CONTACT_FIELDS: [FormField; 4] = [
    FormField {
        name: "name",
        label: "Name",
        input_type: Some("text"),
        required: true,
    },
    FormField {
        name: "email",
        label: "E-Mail",
        input_type: Some("email"),
        required: true,
    },
    FormField {
        name: "phone",
        label: "Telefon",
        input_type: Some("tel"),
        required: false,
    },
    FormField {
        name: "message",
        label: "Nachricht",
        input_type: None,
        required: true,
    },
];

/// Render every document into `output_dir`. Returns the written paths in
/// [`DocumentId::ALL`] order.
pub fn generate(config: &SiteConfig, output_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);

    fs::create_dir_all(output_dir).map_err(|source| GenerateError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(DocumentId::ALL.len());
    for doc in DocumentId::ALL {
        let path = output_dir.join(doc.file_name());
        let markup = render_document(config, doc, &css);
        fs::write(&path, markup.into_string()).map_err(|source| GenerateError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(document = %doc, path = %path.display(), "generated");
        written.push(path);
    }
    Ok(written)
}

/// Render one document.
pub fn render_document(config: &SiteConfig, doc: DocumentId, css: &str) -> Markup {
    let content = match doc {
        DocumentId::Home => render_home(config),
        DocumentId::Services => render_services(&config.services),
        DocumentId::Gallery => render_gallery(config),
        DocumentId::About => render_about(&config.stats),
        DocumentId::Contact => render_contact(config),
        DocumentId::Preisliste => render_prices(config),
    };
    let title = match doc {
        DocumentId::Home => config.site.name.clone(),
        other => format!("{} | {}", other.title(), config.site.name),
    };
    base_document(
        &title,
        css,
        config,
        html! {
            (site_header(config, doc))
            main { (content) }
            (site_footer(config))
        },
    )
}

/// Interactive nodes carried by a rendered document, in document order.
pub fn page_hooks(config: &SiteConfig, doc: DocumentId) -> PageHooks {
    let stats = || {
        (
            (0..config.stats.len()).collect::<Vec<_>>(),
            config.stats.iter().map(stat_text).collect::<Vec<_>>(),
        )
    };
    let mut hooks = PageHooks {
        nav_links: DocumentId::ALL.len(),
        ..PageHooks::default()
    };
    match doc {
        DocumentId::Home => {
            let (stat_items, counters) = stats();
            hooks.animated = (0..config.services.len()).chain(stat_items).collect();
            hooks.counters = counters;
        }
        DocumentId::Services => {
            hooks.animated = (0..config.services.len()).collect();
            hooks.tooltips = config.services.iter().map(|s| s.name.clone()).collect();
        }
        DocumentId::Gallery => {
            hooks.gallery_items = config
                .gallery
                .iter()
                .map(|g| (g.category.clone(), Some(item_info(g))))
                .collect();
            hooks.filter_buttons = std::iter::once(ALL.to_string())
                .chain(config.gallery_categories().into_iter().map(|(c, _)| c.to_string()))
                .collect();
            hooks.lightbox = true;
            hooks.animated = (0..config.gallery.len()).collect();
        }
        DocumentId::About => {
            let (stat_items, counters) = stats();
            hooks.animated = (0..MISSION.len()).chain(stat_items).collect();
            hooks.counters = counters;
        }
        DocumentId::Contact => {
            hooks.form = Some(
                CONTACT_FIELDS
                    .iter()
                    .map(|f| FieldSpec::new(f.name, f.required))
                    .collect(),
            );
            hooks.submit_label = SUBMIT_LABEL.to_string();
        }
        DocumentId::Preisliste => {}
    }
    hooks
}

fn item_info(entry: &GalleryEntry) -> ItemInfo {
    ItemInfo {
        title: entry.title.clone(),
        description: entry.description.clone(),
        category: entry.category_label.clone(),
    }
}

/// Text a stat counter is rendered with and later counts up to.
fn stat_text(stat: &Stat) -> String {
    format!("{}{}", stat.value, stat.suffix)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
///
/// `<body>` carries the timings, breakpoints and form messages the page
/// script reads, and the script itself closes the body.
fn base_document(title: &str, css: &str, config: &SiteConfig, content: Markup) -> Markup {
    let timing = &config.timing;
    let messages = &config.messages;
    html! {
        (DOCTYPE)
        html lang="de" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
                script { (PreEscaped(JS_MARKER)) }
            }
            body
                data-breakpoint=(config.navigation.breakpoint)
                data-anchor-offset=(config.navigation.anchor_offset)
                data-settle=(timing.settle)
                data-hide=(timing.hide)
                data-submit-delay=(timing.submit_delay)
                data-banner=(timing.banner)
                data-counter-duration=(timing.counter_duration)
                data-counter-tick=(timing.counter_tick)
                data-msg-required=(messages.required)
                data-msg-email=(messages.invalid_email)
                data-msg-phone=(messages.invalid_phone)
                data-msg-sending=(messages.sending)
            {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

/// Fixed header with brand, hamburger and nav menu
fn site_header(config: &SiteConfig, current: DocumentId) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (config.site.name) }
            div class=(hooks::HAMBURGER) {
                span.bar {}
                span.bar {}
                span.bar {}
            }
            ul class=(hooks::NAV_MENU) {
                @for doc in DocumentId::ALL {
                    @let class = if doc == current {
                        format!("{} current", hooks::NAV_LINK)
                    } else {
                        hooks::NAV_LINK.to_string()
                    };
                    li {
                        a class=(class) href=(doc.href()) { (doc.title()) }
                    }
                }
            }
        }
    }
}

fn site_footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p { (config.site.name) " · " (config.site.tagline) }
            p { a href={ "mailto:" (config.site.email) } { (config.site.email) } }
        }
    }
}

fn service_card(service: &Service, with_tooltip: bool) -> Markup {
    html! {
        div.service-card {
            @if with_tooltip {
                i class={ "fas " (service.icon) } data-tooltip=(service.name) {}
            } @else {
                i class={ "fas " (service.icon) } {}
            }
            h3 { (service.name) }
            p { (service.description) }
        }
    }
}

fn stats_grid(stats: &[Stat]) -> Markup {
    html! {
        div.stats-grid {
            @for stat in stats {
                div.stat-item {
                    span class=(hooks::STAT_NUMBER) { (stat_text(stat)) }
                    span.stat-label { (stat.label) }
                }
            }
        }
    }
}

// ============================================================================
// Document Renderers
// ============================================================================

fn render_home(config: &SiteConfig) -> Markup {
    html! {
        section.hero {
            h1 { (config.site.name) }
            p.tagline { (config.site.tagline) }
            a.cta href=(DocumentId::Contact.href()) { "Jetzt Reparatur anfragen" }
        }
        section {
            h2 { "Unsere Leistungen" }
            div.services-grid {
                @for service in &config.services {
                    (service_card(service, false))
                }
            }
        }
        section {
            (stats_grid(&config.stats))
        }
    }
}

fn render_services(services: &[Service]) -> Markup {
    html! {
        section {
            h1 { "Services" }
            div.services-grid {
                @for service in services {
                    (service_card(service, true))
                }
            }
        }
    }
}

fn render_gallery(config: &SiteConfig) -> Markup {
    html! {
        section {
            h1 { "Galerie" }
            div.gallery-filters {
                button class={ (hooks::FILTER_BUTTON) " active" } data-filter=(ALL) { (ALL_LABEL) }
                @for (category, label) in config.gallery_categories() {
                    button class=(hooks::FILTER_BUTTON) data-filter=(category) { (label) }
                }
            }
            div.gallery-grid {
                @for entry in &config.gallery {
                    div class=(hooks::GALLERY_ITEM) data-category=(entry.category) {
                        @if let Some(image) = &entry.image {
                            img src=(image) alt=(entry.title) loading="lazy";
                        }
                        div class=(hooks::GALLERY_INFO) {
                            h3 { (entry.title) }
                            p { (entry.description) }
                            span class=(hooks::GALLERY_CATEGORY) { (entry.category_label) }
                        }
                    }
                }
            }
        }
        div.lightbox id=(hooks::LIGHTBOX_ID) {
            div class=(hooks::LIGHTBOX_CONTENT) {
                span class=(hooks::LIGHTBOX_CLOSE) { "×" }
                h3 id=(hooks::LIGHTBOX_TITLE_ID) {}
                p id=(hooks::LIGHTBOX_DESCRIPTION_ID) {}
                span id=(hooks::LIGHTBOX_CATEGORY_ID) {}
            }
        }
    }
}

fn render_about(stats: &[Stat]) -> Markup {
    html! {
        section {
            h1 { "Über uns" }
            div.mission-grid {
                @for (title, text) in MISSION {
                    div.mission-item {
                        h3 { (title) }
                        p { (text) }
                    }
                }
            }
        }
        section {
            (stats_grid(stats))
        }
    }
}

fn render_contact(config: &SiteConfig) -> Markup {
    html! {
        section {
            h1 { "Kontakt" }
            form id=(hooks::CONTACT_FORM_ID) {
                @for field in &CONTACT_FIELDS {
                    div.form-group {
                        label for=(field.name) {
                            (field.label)
                            @if field.required { " *" }
                        }
                        @match field.input_type {
                            Some(kind) => {
                                input type=(kind) id=(field.name) name=(field.name) required[field.required];
                            }
                            None => {
                                textarea id=(field.name) name=(field.name) rows="5" required[field.required] {}
                            }
                        }
                        span class=(hooks::FIELD_ERROR) {}
                    }
                }
                button.submit-btn type="submit" { (SUBMIT_LABEL) }
                div class=(hooks::FORM_SUCCESS) { (config.messages.success) }
                div class=(hooks::FORM_FAILURE) { (config.messages.failure) }
            }
            p.contact-email {
                "Oder direkt per E-Mail: "
                a href={ "mailto:" (config.site.email) } { (config.site.email) }
            }
        }
    }
}

fn render_prices(config: &SiteConfig) -> Markup {
    html! {
        section {
            h1 { "Preisliste" }
            table.price-table {
                thead {
                    tr { th { "Gerät" } th { "Reparatur" } th { "Preis (CHF)" } }
                }
                tbody {
                    @for row in &config.prices {
                        tr { td { (row.device) } td { (row.repair) } td { (row.price) } }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stock() -> SiteConfig {
        let mut config = SiteConfig::default();
        config::stock_content(&mut config);
        config
    }

    fn render(doc: DocumentId) -> String {
        render_document(&stock(), doc, "").into_string()
    }

    fn count(html: &str, needle: &str) -> usize {
        html.matches(needle).count()
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn base_document_includes_doctype() {
        let doc = base_document("Test", "body {}", &stock(), html! { p { "test" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<style>body {}</style>"));
    }

    #[test]
    fn body_carries_script_settings() {
        let html = render(DocumentId::Contact);
        assert!(html.contains(r#"data-breakpoint="768""#));
        assert!(html.contains(r#"data-settle="100""#));
        assert!(html.contains(r#"data-counter-tick="16""#));
        assert!(html.contains(r#"data-msg-required="Dieses Feld ist erforderlich.""#));
        assert!(html.contains(r#"data-msg-sending="Wird gesendet...""#));
    }

    #[test]
    fn header_marks_current_link() {
        let header = site_header(&stock(), DocumentId::Gallery).into_string();
        assert_eq!(count(&header, r#"class="nav-link""#), 5);
        assert!(header.contains(r#"class="nav-link current" href="/gallery""#));
        assert!(header.contains(r#"class="hamburger""#));
        assert!(header.contains(r#"class="nav-menu""#));
    }

    #[test]
    fn config_text_is_escaped() {
        let mut config = stock();
        config.site.name = "<script>alert(1)</script>".to_string();
        let html = render_document(&config, DocumentId::Home, "").into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)"));
    }

    // =========================================================================
    // Markup carries the hooks the controllers expect
    // =========================================================================

    #[test]
    fn gallery_markup_matches_hooks() {
        let config = stock();
        let html = render(DocumentId::Gallery);
        let hooks = page_hooks(&config, DocumentId::Gallery);

        assert_eq!(count(&html, r#"class="gallery-item""#), hooks.gallery_items.len());
        assert_eq!(count(&html, "data-filter="), hooks.filter_buttons.len());
        assert_eq!(count(&html, r#"class="gallery-info""#), config.gallery.len());
        assert!(html.contains(r#"id="lightboxModal""#));
        assert!(html.contains(r#"class="lightbox-close""#));
        assert!(html.contains(r#"class="filter-btn active" data-filter="all""#));
        for (category, _) in &hooks.gallery_items {
            assert!(html.contains(&format!(r#"data-category="{category}""#)));
        }
    }

    #[test]
    fn filter_buttons_are_distinct_categories_after_all() {
        let hooks = page_hooks(&stock(), DocumentId::Gallery);
        assert_eq!(hooks.filter_buttons, ["all", "screen", "battery", "water"]);
        let first = hooks.gallery_items[0].1.as_ref().unwrap();
        assert_eq!(first.category, "Display");
    }

    #[test]
    fn contact_markup_matches_hooks() {
        let html = render(DocumentId::Contact);
        let hooks = page_hooks(&stock(), DocumentId::Contact);
        let fields = hooks.form.unwrap();

        assert!(html.contains(r#"id="contactForm""#));
        assert_eq!(count(&html, r#"class="field-error""#), fields.len());
        assert_eq!(count(&html, " required"), fields.iter().filter(|f| f.required).count());
        assert!(html.contains(r#"<input type="tel" id="phone" name="phone">"#));
        assert!(html.contains(r#"class="form-success""#));
        assert!(html.contains(SUBMIT_LABEL));
        assert_eq!(hooks.submit_label, SUBMIT_LABEL);
    }

    #[test]
    fn counters_render_their_target_text() {
        let config = stock();
        let html = render(DocumentId::Home);
        let hooks = page_hooks(&config, DocumentId::Home);
        assert_eq!(hooks.counters, ["5000+", "98%", "10"]);
        for text in &hooks.counters {
            assert!(html.contains(&format!(r#"<span class="stat-number">{text}</span>"#)));
        }
        let cards = count(&html, r#"class="service-card""#) + count(&html, r#"class="stat-item""#);
        assert_eq!(cards, hooks.animated.len());
    }

    #[test]
    fn about_staggers_each_grid_separately() {
        let hooks = page_hooks(&stock(), DocumentId::About);
        assert_eq!(hooks.animated, [0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn services_tooltips_match_markup() {
        let html = render(DocumentId::Services);
        let hooks = page_hooks(&stock(), DocumentId::Services);
        assert_eq!(count(&html, "data-tooltip="), hooks.tooltips.len());
        assert!(html.contains(r#"data-tooltip="Akku-Austausch""#));
    }

    #[test]
    fn price_list_has_every_row() {
        let config = stock();
        let html = render(DocumentId::Preisliste);
        assert_eq!(count(&html, "<tr>"), config.prices.len() + 1);
        assert!(page_hooks(&config, DocumentId::Preisliste).form.is_none());
    }

    // =========================================================================
    // Output
    // =========================================================================

    #[test]
    fn generate_writes_all_documents() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("site");
        let written = generate(&stock(), &out).unwrap();
        assert_eq!(written.len(), 6);
        for doc in DocumentId::ALL {
            let html = fs::read_to_string(out.join(doc.file_name())).unwrap();
            assert!(html.contains("--color-primary"), "{doc} missing colors");
        }
    }

    /// Animatable elements may only start hidden under `html.js`, and a
    /// generated page must ship both the marker and the script that reveals.
    #[test]
    fn generated_content_can_become_visible() {
        let tmp = TempDir::new().unwrap();
        generate(&stock(), tmp.path()).unwrap();
        let html = fs::read_to_string(tmp.path().join("index.html")).unwrap();

        let head_end = html.find("</head>").unwrap();
        assert!(html[..head_end].contains(JS_MARKER));
        let body_end = html.rfind("</body>").unwrap();
        assert!(html[..body_end].ends_with("</script>"));
        assert!(html.contains(JS));
        for class in hooks::ANIMATED {
            assert!(JS.contains(&format!(".{class}")), "script never reveals .{class}");
        }
        assert!(JS.contains(hooks::FADE_IN));

        for rule in CSS_STATIC.split('}') {
            let Some((selector, decls)) = rule.split_once('{') else {
                continue;
            };
            let hides = decls.contains("opacity: 0;");
            let animated = hooks::ANIMATED.iter().any(|c| selector.contains(&format!(".{c}")));
            if hides && animated {
                for part in selector.split(',') {
                    assert!(
                        part.trim().starts_with("html.js "),
                        "{} hidden without the page script",
                        part.trim()
                    );
                }
            }
        }
    }

    #[test]
    fn contact_form_keeps_native_validation_without_script() {
        let html = render(DocumentId::Contact);
        assert!(!html.contains("novalidate"));
        assert!(JS.contains("noValidate = true"));
    }

    #[test]
    fn generate_reports_unwritable_target() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = generate(&stock(), &blocker.join("site")).unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }
}
