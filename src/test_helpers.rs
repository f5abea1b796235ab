//! Shared test utilities.
//!
//! [`RecordingView`] stands in for the browser: it applies every write to an
//! in-memory node table and keeps the raw operation log, so tests can assert
//! either on the resulting state or on what was written.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut page = gallery_page();
//! page.dispatch(click(Node::FilterButton(1)));
//! page.advance(ms(300));
//! assert!(!page.view().is_visible(&Node::GalleryItem(1)));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::config::SiteConfig;
use crate::view::form::FieldSpec;
use crate::view::lightbox::ItemInfo;
use crate::view::page::{Page, PageHooks, UiEvent};
use crate::view::timers::TimerQueue;
use crate::view::{Ctx, Node, ScrollLock, View};

/// One write made through the [`View`] trait.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Visible(Node, bool),
    Class(Node, String, bool),
    Text(Node, String),
    Property(Node, String, String),
}

#[derive(Debug, Default, Clone)]
pub struct NodeState {
    /// `None` until something writes it; unwritten nodes count as visible.
    pub visible: Option<bool>,
    pub classes: BTreeSet<String>,
    pub text: Option<String>,
    pub props: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct RecordingView {
    nodes: BTreeMap<Node, NodeState>,
    ops: Vec<Op>,
}

impl RecordingView {
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn is_visible(&self, node: &Node) -> bool {
        self.nodes
            .get(node)
            .and_then(|n| n.visible)
            .unwrap_or(true)
    }

    pub fn has_class(&self, node: &Node, class: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn text(&self, node: &Node) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.text.as_deref())
    }

    pub fn prop(&self, node: &Node, name: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|n| n.props.get(name))
            .map(String::as_str)
    }

    fn node(&mut self, node: &Node) -> &mut NodeState {
        self.nodes.entry(node.clone()).or_default()
    }
}

impl View for RecordingView {
    fn set_visible(&mut self, node: &Node, visible: bool) {
        self.node(node).visible = Some(visible);
        self.ops.push(Op::Visible(node.clone(), visible));
    }

    fn set_class(&mut self, node: &Node, class: &str, on: bool) {
        let state = self.node(node);
        if on {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
        self.ops.push(Op::Class(node.clone(), class.to_string(), on));
    }

    fn set_text(&mut self, node: &Node, text: &str) {
        self.node(node).text = Some(text.to_string());
        self.ops.push(Op::Text(node.clone(), text.to_string()));
    }

    fn set_property(&mut self, node: &Node, name: &str, value: &str) {
        self.node(node)
            .props
            .insert(name.to_string(), value.to_string());
        self.ops
            .push(Op::Property(node.clone(), name.to_string(), value.to_string()));
    }
}

// =========================================================================
// Event shorthands
// =========================================================================

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// A click on `target` with no enclosing nodes of interest.
pub fn click(target: Node) -> UiEvent {
    UiEvent::Click { path: vec![target] }
}

/// A click whose composed path runs from `path[0]` outwards.
pub fn click_path(path: &[Node]) -> UiEvent {
    UiEvent::Click {
        path: path.to_vec(),
    }
}

pub fn input(field: &str, value: &str) -> UiEvent {
    UiEvent::Input {
        field: field.to_string(),
        value: value.to_string(),
    }
}

pub fn blur(field: &str) -> UiEvent {
    UiEvent::Blur {
        field: field.to_string(),
    }
}

pub fn key(name: &str) -> UiEvent {
    UiEvent::KeyDown {
        key: name.to_string(),
    }
}

// =========================================================================
// Page fixtures
// =========================================================================

pub fn info(title: &str, category: &str) -> ItemInfo {
    ItemInfo {
        title: title.to_string(),
        description: format!("{title} description"),
        category: category.to_string(),
    }
}

/// Gallery page with items `screen, battery, screen, water` and buttons
/// `all, screen, battery, water`. Item 3 has no metadata block.
pub fn gallery_page() -> Page<RecordingView> {
    let hooks = PageHooks {
        nav_links: 3,
        gallery_items: vec![
            ("screen".to_string(), Some(info("iPhone display", "Display"))),
            ("battery".to_string(), Some(info("Samsung battery", "Akku"))),
            ("screen".to_string(), Some(info("Pixel back glass", "Display"))),
            ("water".to_string(), None),
        ],
        filter_buttons: ["all", "screen", "battery", "water"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        lightbox: true,
        ..PageHooks::default()
    };
    Page::mount(hooks, &SiteConfig::default(), RecordingView::default())
}

/// Contact page with the standard four fields.
pub fn contact_page() -> Page<RecordingView> {
    let hooks = PageHooks {
        nav_links: 3,
        form: Some(vec![
            FieldSpec::new("name", true),
            FieldSpec::new("email", true),
            FieldSpec::new("phone", false),
            FieldSpec::new("message", true),
        ]),
        submit_label: "Nachricht senden".to_string(),
        ..PageHooks::default()
    };
    Page::mount(hooks, &SiteConfig::default(), RecordingView::default())
}

/// Fill every field of [`contact_page`] with valid values.
pub fn fill_valid(page: &mut Page<RecordingView>) {
    page.dispatch(input("name", "Anna Muster"));
    page.dispatch(input("email", "anna@example.ch"));
    page.dispatch(input("phone", "+41 79 123 45 67"));
    page.dispatch(input("message", "Display kaputt"));
}

/// Standalone view, clock and scroll lock for driving one controller
/// without a [`Page`].
#[derive(Default)]
pub struct Harness {
    pub view: RecordingView,
    pub timers: TimerQueue,
    pub scroll: ScrollLock,
}

impl Harness {
    pub fn cx(&mut self) -> Ctx<'_> {
        Ctx {
            view: &mut self.view,
            timers: &mut self.timers,
            scroll: &mut self.scroll,
        }
    }
}
