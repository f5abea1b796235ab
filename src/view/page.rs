//! Page-level event loop.
//!
//! A [`Page`] is mounted once per document with a [`PageHooks`] inventory of
//! the interactive nodes that document actually contains. Controllers whose
//! nodes are missing are simply not created, so events aimed at them fall
//! through as no-ops.
//!
//! Input arrives one item at a time, either directly through
//! [`Page::dispatch`] / [`Page::advance`] or as [`PageInput`] messages
//! drained by [`Page::run`]. A handler that panics is logged and the loop
//! keeps going; one broken widget must not take the rest of the page down.

use super::form::{ContactForm, FieldSpec, SimulatedTransport, Transport};
use super::gallery::{ALL, Gallery, GalleryItem};
use super::lightbox::{ItemInfo, Lightbox};
use super::nav::{NavMenu, anchor_scroll_top};
use super::reveal::{Rect, Reveal};
use super::timers::{Timer, TimerQueue};
use super::tooltip::Tooltips;
use super::{Ctx, Node, ScrollLock, View};
use crate::config::SiteConfig;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Something the user (or the host) did.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// `path` runs from the click target outwards through its ancestors.
    Click { path: Vec<Node> },
    KeyDown { key: String },
    Blur { field: String },
    Input { field: String, value: String },
    Submit,
    Resize { width: u32 },
    /// Current geometry of an observed node.
    Visibility {
        node: Node,
        rect: Rect,
        viewport_height: f64,
    },
    MouseEnter { node: Node },
    MouseLeave { node: Node },
    /// Click on an in-page link; `target_top` is the document offset of
    /// the element it points at, if any.
    AnchorClick { href: String, target_top: Option<u32> },
    /// Outcome reported by a host-driven transport.
    SubmissionFinished(Result<(), String>),
}

impl UiEvent {
    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UiEvent::Click { .. } => "click",
            UiEvent::KeyDown { .. } => "keydown",
            UiEvent::Blur { .. } => "blur",
            UiEvent::Input { .. } => "input",
            UiEvent::Submit => "submit",
            UiEvent::Resize { .. } => "resize",
            UiEvent::Visibility { .. } => "visibility",
            UiEvent::MouseEnter { .. } => "mouseenter",
            UiEvent::MouseLeave { .. } => "mouseleave",
            UiEvent::AnchorClick { .. } => "anchor-click",
            UiEvent::SubmissionFinished(_) => "submission-finished",
        }
    }
}

/// One entry on the page's input queue.
#[derive(Debug, Clone, PartialEq)]
pub enum PageInput {
    Event(UiEvent),
    /// Let virtual time pass, firing whatever falls due.
    Elapse(Duration),
}

/// Inventory of interactive nodes present in a document.
#[derive(Debug, Clone)]
pub struct PageHooks {
    /// Number of `.nav-link`s. Zero means the page has no navigation menu.
    pub nav_links: usize,
    /// `data-category` and metadata block of each `.gallery-item`.
    pub gallery_items: Vec<(String, Option<ItemInfo>)>,
    /// `data-filter` of each `.filter-btn`.
    pub filter_buttons: Vec<String>,
    pub lightbox: bool,
    pub form: Option<Vec<FieldSpec>>,
    /// Initial text of the submit button, restored after sending.
    pub submit_label: String,
    /// Sibling index of each animatable element.
    pub animated: Vec<usize>,
    /// Rendered text of each `.stat-number`.
    pub counters: Vec<String>,
    /// `data-tooltip` text of each tooltip host.
    pub tooltips: Vec<String>,
    pub observer_supported: bool,
    pub viewport_width: u32,
}

impl Default for PageHooks {
    fn default() -> Self {
        Self {
            nav_links: 0,
            gallery_items: Vec::new(),
            filter_buttons: Vec::new(),
            lightbox: false,
            form: None,
            submit_label: String::new(),
            animated: Vec::new(),
            counters: Vec::new(),
            tooltips: Vec::new(),
            observer_supported: true,
            viewport_width: 1280,
        }
    }
}

pub struct Page<V: View> {
    view: V,
    timers: TimerQueue,
    scroll: ScrollLock,
    viewport_width: u32,
    anchor_offset: u32,
    nav: Option<NavMenu>,
    gallery: Option<Gallery>,
    lightbox: Option<Lightbox>,
    form: Option<ContactForm>,
    reveal: Reveal,
    tooltips: Option<Tooltips>,
    transport: Box<dyn Transport>,
}

impl<V: View> Page<V> {
    pub fn mount(hooks: PageHooks, config: &SiteConfig, view: V) -> Self {
        let timing = &config.timing;
        let has_gallery = !hooks.gallery_items.is_empty() || !hooks.filter_buttons.is_empty();
        let mut page = Self {
            view,
            timers: TimerQueue::new(),
            scroll: ScrollLock::default(),
            viewport_width: hooks.viewport_width,
            anchor_offset: config.navigation.anchor_offset,
            nav: (hooks.nav_links > 0).then(|| NavMenu::new(config.navigation.breakpoint)),
            gallery: has_gallery.then(|| {
                let items = hooks
                    .gallery_items
                    .into_iter()
                    .map(|(category, info)| GalleryItem::new(category, info))
                    .collect();
                Gallery::new(items, hooks.filter_buttons, timing.settle(), timing.hide())
            }),
            lightbox: hooks.lightbox.then(Lightbox::new),
            form: hooks.form.map(|fields| {
                ContactForm::new(
                    fields,
                    hooks.submit_label,
                    config.messages.clone(),
                    timing.banner(),
                )
            }),
            reveal: Reveal::new(hooks.animated, hooks.counters, timing),
            tooltips: (!hooks.tooltips.is_empty()).then(|| Tooltips::new(hooks.tooltips)),
            transport: Box::new(SimulatedTransport::new(timing.submit_delay())),
        };

        let observer_supported = hooks.observer_supported;
        let Page {
            view,
            timers,
            scroll,
            gallery,
            reveal,
            ..
        } = &mut page;
        let mut cx = Ctx {
            view,
            timers,
            scroll,
        };
        if let Some(gallery) = gallery {
            gallery.set_filter(ALL, &mut cx);
        }
        reveal.mount(observer_supported, &mut cx);
        tracing::debug!(
            nav = page.nav.is_some(),
            gallery = page.gallery.is_some(),
            lightbox = page.lightbox.is_some(),
            form = page.form.is_some(),
            "page mounted"
        );
        page
    }

    /// Replace the form transport.
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Handle one event. A panicking handler is logged and swallowed.
    pub fn dispatch(&mut self, event: UiEvent) {
        let kind = event.kind();
        if catch_unwind(AssertUnwindSafe(|| self.handle(event))).is_err() {
            tracing::warn!(event = kind, "event handler panicked; continuing");
        }
    }

    /// Let `elapsed` pass on the virtual clock, firing due timers in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timers.now() + elapsed;
        while let Some(timer) = self.timers.pop_due(until) {
            if catch_unwind(AssertUnwindSafe(|| self.fire(timer))).is_err() {
                tracing::warn!(?timer, "timer handler panicked; continuing");
            }
        }
        self.timers.set_now(until);
    }

    /// Drain `inputs` until every sender is gone.
    pub fn run(&mut self, inputs: Receiver<PageInput>) {
        for input in inputs {
            match input {
                PageInput::Event(event) => self.dispatch(event),
                PageInput::Elapse(elapsed) => self.advance(elapsed),
            }
        }
        tracing::debug!(now = ?self.timers.now(), "page input closed");
    }

    fn handle(&mut self, event: UiEvent) {
        let Page {
            view,
            timers,
            scroll,
            viewport_width,
            anchor_offset,
            nav,
            gallery,
            lightbox,
            form,
            reveal,
            tooltips,
            transport,
        } = self;
        let mut cx = Ctx {
            view,
            timers,
            scroll,
        };

        match event {
            UiEvent::Click { path } => {
                if let Some(nav) = nav {
                    nav.on_click(&path, *viewport_width, &mut cx);
                }
                if let Some(gallery) = gallery.as_mut() {
                    gallery.on_click(&path, &mut cx);
                }
                if let Some(lightbox) = lightbox {
                    lightbox.on_click(&path, &mut cx);
                    let item = path.iter().find_map(|n| match n {
                        Node::GalleryItem(i) => Some(*i),
                        _ => None,
                    });
                    if let Some(index) = item {
                        let info = (*gallery)
                            .as_ref()
                            .and_then(|g| g.item(index))
                            .and_then(GalleryItem::info);
                        lightbox.open(info, &mut cx);
                    }
                }
            }
            UiEvent::KeyDown { key } => {
                if let Some(lightbox) = lightbox {
                    lightbox.on_key(&key, &mut cx);
                }
            }
            UiEvent::Blur { field } => {
                if let Some(form) = form {
                    form.on_blur(&field, &mut cx);
                }
            }
            UiEvent::Input { field, value } => {
                if let Some(form) = form {
                    form.on_input(&field, &value, &mut cx);
                }
            }
            UiEvent::Submit => {
                if let Some(form) = form {
                    form.submit(&mut **transport, &mut cx);
                }
            }
            UiEvent::SubmissionFinished(result) => {
                if let Some(form) = form {
                    form.finish(result, &mut cx);
                }
            }
            UiEvent::Resize { width } => {
                *viewport_width = width;
                if let Some(nav) = nav {
                    nav.on_resize(width, &mut cx);
                }
            }
            UiEvent::Visibility {
                node,
                rect,
                viewport_height,
            } => reveal.on_visibility(&node, rect, viewport_height, &mut cx),
            UiEvent::MouseEnter {
                node: Node::TooltipHost(host),
            } => {
                if let Some(tooltips) = tooltips {
                    tooltips.on_enter(host, &mut cx);
                }
            }
            UiEvent::MouseLeave {
                node: Node::TooltipHost(host),
            } => {
                if let Some(tooltips) = tooltips {
                    tooltips.on_leave(host, &mut cx);
                }
            }
            UiEvent::MouseEnter { .. } | UiEvent::MouseLeave { .. } => {}
            UiEvent::AnchorClick { href, target_top } => {
                if let Some(top) = anchor_scroll_top(&href, target_top, *anchor_offset) {
                    cx.view
                        .set_property(&Node::Window, "scroll-top", &top.to_string());
                }
            }
        }
    }

    fn fire(&mut self, timer: Timer) {
        let mut cx = Ctx {
            view: &mut self.view,
            timers: &mut self.timers,
            scroll: &mut self.scroll,
        };
        match timer {
            Timer::GallerySettle { .. } | Timer::GalleryHide { .. } => {
                if let Some(gallery) = &mut self.gallery {
                    gallery.on_timer(&timer, &mut cx);
                }
            }
            Timer::DeliveryComplete => {
                if let Some(form) = &mut self.form {
                    form.finish(Ok(()), &mut cx);
                }
            }
            Timer::BannerDismiss { .. } => {
                if let Some(form) = &mut self.form {
                    form.on_timer(&timer, &mut cx);
                }
            }
            Timer::CounterTick { .. } => self.reveal.on_timer(&timer, &mut cx),
        }
    }

    /// Apply a gallery filter directly, as a filter button would.
    pub fn set_filter(&mut self, filter: &str) {
        let mut cx = Ctx {
            view: &mut self.view,
            timers: &mut self.timers,
            scroll: &mut self.scroll,
        };
        if let Some(gallery) = &mut self.gallery {
            gallery.set_filter(filter, &mut cx);
        }
    }

    /// Change the viewport width without notifying any controller, as when
    /// the browser never delivered the resize event.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn nav(&self) -> Option<&NavMenu> {
        self.nav.as_ref()
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }

    pub fn tooltips(&self) -> Option<&Tooltips> {
        self.tooltips.as_ref()
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll.is_locked()
    }

    /// No deferred work is pending.
    pub fn timers_idle(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }
}
