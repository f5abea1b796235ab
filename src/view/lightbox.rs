//! Gallery lightbox.

use super::hooks::ACTIVE;
use super::{Ctx, Holder, Node};

/// Text from a gallery item's metadata block (`.gallery-info`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    pub title: String,
    pub description: String,
    /// Display label, not the filter value.
    pub category: String,
}

#[derive(Debug, Default)]
pub struct Lightbox {
    shown: Option<ItemInfo>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.shown.is_some()
    }

    pub fn current(&self) -> Option<&ItemInfo> {
        self.shown.as_ref()
    }

    /// Show `info` in the lightbox. An item without a metadata block leaves
    /// the lightbox untouched and returns false.
    pub fn open(&mut self, info: Option<&ItemInfo>, cx: &mut Ctx<'_>) -> bool {
        let Some(info) = info else {
            tracing::debug!("gallery item has no metadata block; lightbox not opened");
            return false;
        };
        cx.view.set_text(&Node::LightboxTitle, &info.title);
        cx.view.set_text(&Node::LightboxDescription, &info.description);
        cx.view.set_text(&Node::LightboxCategory, &info.category);
        cx.view.set_class(&Node::Lightbox, ACTIVE, true);
        cx.view.set_property(
            &Node::LightboxContent,
            "animation",
            "lightboxFadeIn 0.3s ease-out",
        );
        cx.scroll.set(Holder::Lightbox, true, cx.view);
        self.shown = Some(info.clone());
        true
    }

    pub fn close(&mut self, cx: &mut Ctx<'_>) {
        cx.view.set_class(&Node::Lightbox, ACTIVE, false);
        cx.scroll.set(Holder::Lightbox, false, cx.view);
        self.shown = None;
    }

    /// Close on the close button or on the backdrop itself. A click that
    /// starts inside the content has the content as its target, so it never
    /// counts as a backdrop click.
    pub fn on_click(&mut self, path: &[Node], cx: &mut Ctx<'_>) {
        if !self.is_open() {
            return;
        }
        let on_backdrop = path.first() == Some(&Node::Lightbox);
        if on_backdrop || path.contains(&Node::LightboxClose) {
            self.close(cx);
        }
    }

    pub fn on_key(&mut self, key: &str, cx: &mut Ctx<'_>) {
        if key == "Escape" && self.is_open() {
            self.close(cx);
        }
    }
}
