//! Hover tooltips for elements carrying `data-tooltip`.
//!
//! There is one shared bubble. Entering a host fills it with that host's
//! text and anchors it above the host; leaving the host it belongs to hides
//! it again.

use super::hooks::TOOLTIP;
use super::{Ctx, Node};

#[derive(Debug)]
pub struct Tooltips {
    texts: Vec<String>,
    shown_for: Option<usize>,
}

impl Tooltips {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            texts,
            shown_for: None,
        }
    }

    /// Index of the host whose text is currently shown.
    pub fn shown_for(&self) -> Option<usize> {
        self.shown_for
    }

    pub fn on_enter(&mut self, host: usize, cx: &mut Ctx<'_>) {
        let Some(text) = self.texts.get(host) else {
            return;
        };
        cx.view.set_text(&Node::Tooltip, text);
        cx.view.set_property(&Node::Tooltip, "anchor", &format!("{TOOLTIP}-host-{host}"));
        cx.view.set_visible(&Node::Tooltip, true);
        self.shown_for = Some(host);
    }

    pub fn on_leave(&mut self, host: usize, cx: &mut Ctx<'_>) {
        if self.shown_for == Some(host) {
            cx.view.set_visible(&Node::Tooltip, false);
            self.shown_for = None;
        }
    }
}
