//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the site directory next to the generated HTML documents and is layered on
//! top of the stock defaults, so it only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "B-repair&service"
//! tagline = "Handy-Reparatur in der Schweiz"
//! email = "info@b-repairservice.ch"
//!
//! [server]
//! host = "0.0.0.0"          # Bind address
//! port = 5000               # Overridden by the PORT environment variable
//! root = "."                # Directory holding the HTML documents and assets
//!
//! [navigation]
//! breakpoint = 768          # Viewport width (px) at or below which the menu is mobile
//! anchor_offset = 80        # Fixed header height subtracted from anchor scroll targets
//!
//! [timing]                  # All values in milliseconds
//! settle = 100              # Gallery: delay before a shown item settles
//! hide = 300                # Gallery: fade-out time before an item leaves the layout
//! submit_delay = 2000       # Simulated delivery latency of the contact form
//! banner = 5000             # How long the success/failure banner stays up
//! counter_duration = 2000   # Stat counter animation length
//! counter_tick = 16         # Stat counter frame interval
//!
//! [colors]
//! primary = "#2563eb"
//! accent = "#10b981"
//! text = "#1e293b"
//! background = "#ffffff"
//! error = "#ef4444"
//!
//! [messages]
//! required = "Dieses Feld ist erforderlich."
//! # ...
//! ```
//!
//! Content lists (`[[services]]`, `[[gallery]]`, `[[stats]]`, `[[prices]]`)
//! replace the stock lists wholesale rather than merging item by item.
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{GalleryEntry, PriceRow, Service, Stat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults matching the live site. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Business identity shown in headers and the footer.
    pub site: SiteInfo,
    /// Listening address and document root.
    pub server: ServerConfig,
    /// Mobile menu breakpoint and anchor scrolling.
    pub navigation: NavigationConfig,
    /// Every fixed delay the page controllers use.
    pub timing: TimingConfig,
    /// Brand colors, emitted as CSS custom properties.
    pub colors: ColorConfig,
    /// User-facing form and banner texts.
    pub messages: MessagesConfig,
    pub services: Vec<Service>,
    pub gallery: Vec<GalleryEntry>,
    pub stats: Vec<Stat>,
    pub prices: Vec<PriceRow>,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.counter_tick == 0 || t.counter_duration == 0 {
            return Err(ConfigError::Validation(
                "timing.counter_tick and timing.counter_duration must be non-zero".into(),
            ));
        }
        if t.hide < t.settle {
            return Err(ConfigError::Validation(
                "timing.hide must not be shorter than timing.settle".into(),
            ));
        }
        if t.banner == 0 {
            return Err(ConfigError::Validation(
                "timing.banner must be non-zero".into(),
            ));
        }
        if let Some(entry) = self.gallery.iter().find(|g| g.category.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "gallery entry '{}' has an empty category",
                entry.title
            )));
        }
        if self.gallery.iter().any(|g| g.category == crate::view::gallery::ALL) {
            return Err(ConfigError::Validation(format!(
                "gallery category '{}' is reserved",
                crate::view::gallery::ALL
            )));
        }
        Ok(())
    }

    /// Distinct gallery categories in first-seen order.
    ///
    /// These become the filter buttons (after the implicit "all" button).
    pub fn gallery_categories(&self) -> Vec<(&str, &str)> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        for entry in &self.gallery {
            if !seen.iter().any(|(c, _)| *c == entry.category) {
                seen.push((&entry.category, &entry.category_label));
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub name: String,
    pub tagline: String,
    pub email: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "B-repair&service".to_string(),
            tagline: "Handy-Reparatur in der Schweiz".to_string(),
            email: "info@b-repairservice.ch".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Interface to bind; all interfaces by default.
    pub host: String,
    pub port: u16,
    /// Directory holding the documents and static assets, relative to the
    /// site directory unless absolute.
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `SocketAddr` parsing.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Widths at or below this are treated as the mobile layout.
    pub breakpoint: u32,
    /// Pixels subtracted from an anchor target so the fixed header doesn't cover it.
    pub anchor_offset: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768,
            anchor_offset: 80,
        }
    }
}

/// Fixed delays, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub settle: u64,
    pub hide: u64,
    pub submit_delay: u64,
    pub banner: u64,
    pub counter_duration: u64,
    pub counter_tick: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle: 100,
            hide: 300,
            submit_delay: 2000,
            banner: 5000,
            counter_duration: 2000,
            counter_tick: 16,
        }
    }
}

impl TimingConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle)
    }

    pub fn hide(&self) -> Duration {
        Duration::from_millis(self.hide)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay)
    }

    pub fn banner(&self) -> Duration {
        Duration::from_millis(self.banner)
    }

    pub fn counter_tick(&self) -> Duration {
        Duration::from_millis(self.counter_tick)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub primary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
    pub error: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "#2563eb".to_string(),
            accent: "#10b981".to_string(),
            text: "#1e293b".to_string(),
            background: "#ffffff".to_string(),
            error: "#ef4444".to_string(),
        }
    }
}

/// Texts shown by the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessagesConfig {
    pub required: String,
    pub invalid_email: String,
    pub invalid_phone: String,
    /// Submit button label while a message is being delivered.
    pub sending: String,
    pub success: String,
    pub failure: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            required: "Dieses Feld ist erforderlich.".to_string(),
            invalid_email: "Bitte geben Sie eine gültige E-Mail-Adresse ein.".to_string(),
            invalid_phone: "Bitte geben Sie eine gültige Telefonnummer ein.".to_string(),
            sending: "Wird gesendet...".to_string(),
            success: "Vielen Dank für Ihre Nachricht! Wir werden uns bald bei Ihnen melden."
                .to_string(),
            failure: "Ihre Nachricht konnte nicht gesendet werden. Bitte versuchen Sie es später erneut."
                .to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// The stock content lists are empty here; [`stock_content`] fills them in
/// when no user list is given.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the site directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize, fill in
/// stock content and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    stock_content(&mut config);
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory and apply
/// environment overrides.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    let mut config = resolve_config(base, overlay)?;
    apply_env(&mut config, std::env::var(PORT_ENV).ok().as_deref())?;
    if config.server.root.is_relative() {
        config.server.root = dir.join(&config.server.root);
    }
    Ok(config)
}

/// Apply the `PORT` override. An unparsable value is an error rather than a
/// silent fallback, so a typo in a deployment doesn't bind the wrong port.
pub fn apply_env(config: &mut SiteConfig, port: Option<&str>) -> Result<(), ConfigError> {
    if let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) {
        config.server.port = raw
            .parse()
            .map_err(|_| ConfigError::Validation(format!("{PORT_ENV}={raw} is not a valid port")))?;
    }
    Ok(())
}

/// Fill empty content lists with the shop's stock content.
pub fn stock_content(config: &mut SiteConfig) {
    if config.services.is_empty() {
        config.services = vec![
            service("Display-Reparatur", "Gebrochenes Glas oder defektes Display? Wir ersetzen es mit Originalqualität.", "fa-mobile-alt"),
            service("Akku-Austausch", "Ihr Akku hält nicht mehr? Neuer Akku in unter einer Stunde.", "fa-battery-full"),
            service("Wasserschaden", "Professionelle Reinigung und Trocknung nach Flüssigkeitskontakt.", "fa-tint"),
            service("Datenrettung", "Wir retten Fotos, Kontakte und Nachrichten von defekten Geräten.", "fa-database"),
        ];
    }
    if config.gallery.is_empty() {
        config.gallery = vec![
            entry("iPhone 14 Pro Display", "Komplettes Display ersetzt, inkl. Face ID Test.", "screen", "Display"),
            entry("Samsung S22 Akku", "Aufgeblähter Akku sicher entfernt und ersetzt.", "battery", "Akku"),
            entry("iPhone 12 Wasserschaden", "Platine gereinigt, Gerät voll funktionsfähig.", "water", "Wasserschaden"),
            entry("Pixel 7 Rückglas", "Rückseite getauscht, Kamera kalibriert.", "screen", "Display"),
        ];
    }
    if config.stats.is_empty() {
        config.stats = vec![
            stat("Reparaturen", 5000, "+"),
            stat("Zufriedene Kunden", 98, "%"),
            stat("Jahre Erfahrung", 10, ""),
        ];
    }
    if config.prices.is_empty() {
        config.prices = vec![
            price("iPhone", "Display", "ab 129.-"),
            price("iPhone", "Akku", "ab 69.-"),
            price("Samsung", "Display", "ab 149.-"),
            price("Samsung", "Akku", "ab 79.-"),
        ];
    }
}

fn service(name: &str, description: &str, icon: &str) -> Service {
    Service {
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    }
}

fn entry(title: &str, description: &str, category: &str, label: &str) -> GalleryEntry {
    GalleryEntry {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        category_label: label.to_string(),
        image: None,
    }
}

fn stat(label: &str, value: u32, suffix: &str) -> Stat {
    Stat {
        label: label.to_string(),
        value,
        suffix: suffix.to_string(),
    }
}

fn price(device: &str, repair: &str, price: &str) -> PriceRow {
    PriceRow {
        device: device.to_string(),
        repair: repair.to_string(),
        price: price.to_string(),
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# repair-site configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

[site]
name = "B-repair&service"
tagline = "Handy-Reparatur in der Schweiz"
email = "info@b-repairservice.ch"

# ---------------------------------------------------------------------------
# Document server
# ---------------------------------------------------------------------------
[server]
# Interface to bind. "0.0.0.0" listens on all interfaces.
host = "0.0.0.0"
# The PORT environment variable takes precedence over this value.
port = 5000
# Directory with index.html, services.html, ... and static assets.
# Relative paths are resolved against the directory holding this file.
root = "."

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[navigation]
# At or below this viewport width (px) the hamburger menu is used and
# clicking a nav link closes the menu.
breakpoint = 768
# Height of the fixed header, subtracted from in-page anchor targets.
anchor_offset = 80

# ---------------------------------------------------------------------------
# Timing (milliseconds)
# ---------------------------------------------------------------------------
[timing]
# Gallery: a matching item settles this long after it is shown.
settle = 100
# Gallery: a non-matching item leaves the layout after its fade-out.
# Must not be shorter than `settle`.
hide = 300
# Simulated delivery latency of the contact form.
submit_delay = 2000
# How long the success/failure banner stays visible.
banner = 5000
# Stat counters count up over this window in fixed ticks.
counter_duration = 2000
counter_tick = 16

# ---------------------------------------------------------------------------
# Colors (emitted as CSS custom properties)
# ---------------------------------------------------------------------------
[colors]
primary = "#2563eb"
accent = "#10b981"
text = "#1e293b"
background = "#ffffff"
error = "#ef4444"

# ---------------------------------------------------------------------------
# Contact form texts
# ---------------------------------------------------------------------------
[messages]
required = "Dieses Feld ist erforderlich."
invalid_email = "Bitte geben Sie eine gültige E-Mail-Adresse ein."
invalid_phone = "Bitte geben Sie eine gültige Telefonnummer ein."
sending = "Wird gesendet..."
success = "Vielen Dank für Ihre Nachricht! Wir werden uns bald bei Ihnen melden."
failure = "Ihre Nachricht konnte nicht gesendet werden. Bitte versuchen Sie es später erneut."

# ---------------------------------------------------------------------------
# Content lists. Each list replaces the stock list entirely.
# ---------------------------------------------------------------------------
# [[services]]
# name = "Display-Reparatur"
# description = "Gebrochenes Glas oder defektes Display?"
# icon = "fa-mobile-alt"
#
# [[gallery]]
# title = "iPhone 14 Pro Display"
# description = "Komplettes Display ersetzt."
# category = "screen"          # filter value; "all" is reserved
# category_label = "Display"
# image = "img/iphone14.jpg"   # optional
#
# [[stats]]
# label = "Reparaturen"
# value = 5000
# suffix = "+"
#
# [[prices]]
# device = "iPhone"
# repair = "Display"
# price = "ab 129.-"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-accent: {accent};
    --color-text: {text};
    --color-bg: {background};
    --color-error: {error};
}}"#,
        primary = colors.primary,
        accent = colors.accent,
        text = colors.text,
        background = colors.background,
        error = colors.error,
    )
}
