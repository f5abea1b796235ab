//! Gallery category filter.
//!
//! `set_filter` shows matching items at once and lets them settle after a
//! short delay; non-matching items start fading immediately and leave the
//! layout only once the fade has had time to finish. The asymmetry is
//! intentional: a hidden item must stay in flow until it is invisible,
//! a shown one can fade in while the layout reflows.
//!
//! Each call bumps a generation counter and stamps its timers with it.
//! Timers from an older call are ignored when they fire, so after a burst
//! of filter clicks the last one decides what is visible.

use super::hooks::{ACTIVE, FADE_IN};
use super::lightbox::ItemInfo;
use super::timers::Timer;
use super::{Ctx, Node};
use std::time::Duration;

/// Filter value that matches every item.
pub const ALL: &str = "all";

/// Where an item is in its show/hide cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPhase {
    /// In layout, fading in.
    Shown,
    /// In layout, fully visible.
    Settled,
    /// Still in layout, fading out.
    Leaving,
    /// Removed from layout.
    Hidden,
}

#[derive(Debug, Clone)]
pub struct GalleryItem {
    category: String,
    info: Option<ItemInfo>,
    phase: ItemPhase,
}

impl GalleryItem {
    pub fn new(category: impl Into<String>, info: Option<ItemInfo>) -> Self {
        Self {
            category: category.into(),
            info,
            phase: ItemPhase::Settled,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// The item's metadata block, if its markup has one.
    pub fn info(&self) -> Option<&ItemInfo> {
        self.info.as_ref()
    }

    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    fn matches(&self, filter: &str) -> bool {
        filter == ALL || self.category == filter
    }
}

#[derive(Debug)]
pub struct Gallery {
    current: String,
    generation: u64,
    items: Vec<GalleryItem>,
    buttons: Vec<String>,
    settle: Duration,
    hide: Duration,
}

impl Gallery {
    /// `buttons` holds each filter button's `data-filter` value in document order.
    pub fn new(items: Vec<GalleryItem>, buttons: Vec<String>, settle: Duration, hide: Duration) -> Self {
        Self {
            current: ALL.to_string(),
            generation: 0,
            items,
            buttons,
            settle,
            hide,
        }
    }

    pub fn current_filter(&self) -> &str {
        &self.current
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    /// Item is in layout and not on its way out.
    pub fn is_visible(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|i| matches!(i.phase, ItemPhase::Shown | ItemPhase::Settled))
    }

    /// Item still occupies space in the layout.
    pub fn in_layout(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|i| i.phase != ItemPhase::Hidden)
    }

    pub fn set_filter(&mut self, filter: &str, cx: &mut Ctx<'_>) {
        self.generation += 1;
        self.current = filter.to_string();
        let generation = self.generation;

        for (index, button) in self.buttons.iter().enumerate() {
            cx.view
                .set_class(&Node::FilterButton(index), ACTIVE, button == filter);
        }

        for (index, item) in self.items.iter_mut().enumerate() {
            let node = Node::GalleryItem(index);
            if item.matches(filter) {
                item.phase = ItemPhase::Shown;
                cx.view.set_visible(&node, true);
                cx.view.set_class(&node, FADE_IN, true);
                cx.timers
                    .schedule(self.settle, Timer::GallerySettle { item: index, generation });
            } else {
                item.phase = ItemPhase::Leaving;
                cx.view.set_property(&node, "opacity", "0");
                cx.view.set_property(&node, "transform", "translateY(20px)");
                cx.timers
                    .schedule(self.hide, Timer::GalleryHide { item: index, generation });
            }
        }

        let shown = self.items.iter().filter(|i| i.matches(filter)).count();
        tracing::debug!(filter, shown, total = self.items.len(), "gallery filter applied");
    }

    /// Apply the filter of the clicked button, if a filter button was hit.
    pub fn on_click(&mut self, path: &[Node], cx: &mut Ctx<'_>) {
        let button = path.iter().find_map(|n| match n {
            Node::FilterButton(i) => Some(*i),
            _ => None,
        });
        if let Some(filter) = button.and_then(|i| self.buttons.get(i)).cloned() {
            self.set_filter(&filter, cx);
        }
    }

    pub fn on_timer(&mut self, timer: &Timer, cx: &mut Ctx<'_>) {
        match *timer {
            Timer::GallerySettle { item, generation } if generation == self.generation => {
                let Some(entry) = self.items.get_mut(item) else {
                    return;
                };
                entry.phase = ItemPhase::Settled;
                let node = Node::GalleryItem(item);
                cx.view.set_property(&node, "opacity", "1");
                cx.view.set_property(&node, "transform", "translateY(0)");
            }
            Timer::GalleryHide { item, generation } if generation == self.generation => {
                let Some(entry) = self.items.get_mut(item) else {
                    return;
                };
                entry.phase = ItemPhase::Hidden;
                let node = Node::GalleryItem(item);
                cx.view.set_visible(&node, false);
                cx.view.set_class(&node, FADE_IN, false);
            }
            Timer::GallerySettle { .. } | Timer::GalleryHide { .. } => {
                tracing::trace!(?timer, current = self.generation, "superseded gallery timer");
            }
            _ => {}
        }
    }
}
