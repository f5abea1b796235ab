//! Page controllers.
//!
//! Every interactive behaviour of the site is a small state machine that
//! reacts to UI events and writes its result through the [`View`] trait:
//!
//! | Module | State | Reacts to |
//! |--------|-------|-----------|
//! | [`nav`] | menu open flag | hamburger click, nav link click, outside click, resize |
//! | [`gallery`] | current filter | filter button click, settle/hide timers |
//! | [`lightbox`] | displayed item | gallery item click, close button, backdrop, Escape |
//! | [`form`] | per-field errors, submission state | blur, input, submit, delivery result |
//! | [`reveal`] | revealed elements, running counters | viewport intersection, counter ticks |
//! | [`tooltip`] | hovered element | mouse enter/leave |
//!
//! [`page::Page`] owns one instance of each controller that the current
//! document actually has, and dispatches events to them in arrival order.
//! Deferred work (fades, simulated delivery, banner dismissal, counter
//! frames) goes through a virtual clock in [`timers`], so the whole page
//! is driven deterministically by [`Page::dispatch`](page::Page::dispatch)
//! and [`Page::advance`](page::Page::advance).
//!
//! Nothing here touches a real DOM. A host implements [`View`] by mapping
//! each [`Node`] to the element carrying the matching hook from [`hooks`];
//! tests use a recording fake. The generated documents ship
//! `static/site.js`, which drives those same hooks in the browser.

pub mod form;
pub mod gallery;
pub mod lightbox;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod timers;
pub mod tooltip;

use timers::TimerQueue;

/// Class and attribute names shared by the markup and the controllers.
///
/// Renaming any of these breaks the link between generated HTML and
/// behaviour, so both sides import them from here.
pub mod hooks {
    pub const ACTIVE: &str = "active";
    pub const FADE_IN: &str = "fade-in";
    pub const ERROR: &str = "error";

    pub const HAMBURGER: &str = "hamburger";
    pub const NAV_MENU: &str = "nav-menu";
    pub const NAV_LINK: &str = "nav-link";

    pub const FILTER_BUTTON: &str = "filter-btn";
    pub const DATA_FILTER: &str = "data-filter";
    pub const GALLERY_ITEM: &str = "gallery-item";
    pub const DATA_CATEGORY: &str = "data-category";
    pub const GALLERY_INFO: &str = "gallery-info";
    pub const GALLERY_CATEGORY: &str = "gallery-category";

    pub const LIGHTBOX_ID: &str = "lightboxModal";
    pub const LIGHTBOX_CONTENT: &str = "lightbox-content";
    pub const LIGHTBOX_CLOSE: &str = "lightbox-close";
    pub const LIGHTBOX_TITLE_ID: &str = "lightboxTitle";
    pub const LIGHTBOX_DESCRIPTION_ID: &str = "lightboxDescription";
    pub const LIGHTBOX_CATEGORY_ID: &str = "lightboxCategory";

    pub const CONTACT_FORM_ID: &str = "contactForm";
    pub const FIELD_ERROR: &str = "field-error";
    pub const FORM_SUCCESS: &str = "form-success";
    pub const FORM_FAILURE: &str = "form-failure";

    pub const DATA_TOOLTIP: &str = "data-tooltip";
    pub const TOOLTIP: &str = "tooltip";
    pub const STAT_NUMBER: &str = "stat-number";

    /// Elements that fade in when scrolled into view.
    pub const ANIMATED: [&str; 5] = [
        "service-card",
        "gallery-item",
        "team-member",
        "mission-item",
        "stat-item",
    ];
}

/// A node the controllers can address.
///
/// Indexed variants count elements of that kind in document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Body,
    Window,
    Hamburger,
    NavMenu,
    NavLink(usize),
    FilterButton(usize),
    GalleryItem(usize),
    Lightbox,
    LightboxContent,
    LightboxClose,
    LightboxTitle,
    LightboxDescription,
    LightboxCategory,
    Field(String),
    FieldError(String),
    SubmitButton,
    SuccessBanner,
    FailureBanner,
    Animated(usize),
    Counter(usize),
    TooltipHost(usize),
    Tooltip,
}

/// Rendering surface the controllers write to.
pub trait View {
    /// Include or remove the node from layout (`display`).
    fn set_visible(&mut self, node: &Node, visible: bool);
    /// Add (`on`) or remove a class.
    fn set_class(&mut self, node: &Node, class: &str, on: bool);
    /// Replace the node's text content.
    fn set_text(&mut self, node: &Node, text: &str);
    /// Set an inline style or DOM property. An empty value clears it.
    fn set_property(&mut self, node: &Node, name: &str, value: &str);
}

/// Who is holding the body scroll lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    Menu,
    Lightbox,
}

/// Body scroll lock shared by the menu and the lightbox.
///
/// The body stays locked while either holder wants it, so closing the
/// lightbox never unlocks scrolling under an open menu.
#[derive(Debug, Default)]
pub struct ScrollLock {
    menu: bool,
    lightbox: bool,
}

impl ScrollLock {
    pub fn set(&mut self, holder: Holder, locked: bool, view: &mut dyn View) {
        let before = self.is_locked();
        match holder {
            Holder::Menu => self.menu = locked,
            Holder::Lightbox => self.lightbox = locked,
        }
        let after = self.is_locked();
        if before != after {
            view.set_property(&Node::Body, "overflow", if after { "hidden" } else { "" });
        }
    }

    pub fn is_locked(&self) -> bool {
        self.menu || self.lightbox
    }

    pub fn is_held_by(&self, holder: Holder) -> bool {
        match holder {
            Holder::Menu => self.menu,
            Holder::Lightbox => self.lightbox,
        }
    }
}

/// Everything a controller may touch while handling one event.
pub struct Ctx<'a> {
    pub view: &'a mut dyn View,
    pub timers: &'a mut TimerQueue,
    pub scroll: &'a mut ScrollLock,
}
