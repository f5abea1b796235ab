//! Mobile navigation menu.
//!
//! One boolean, four ways to change it. Whatever the trigger, the menu is
//! open exactly when the hamburger and the menu panel both carry `active`
//! and the menu holds the body scroll lock.

use super::hooks::ACTIVE;
use super::{Ctx, Holder, Node};

#[derive(Debug)]
pub struct NavMenu {
    is_open: bool,
    breakpoint: u32,
}

impl NavMenu {
    pub fn new(breakpoint: u32) -> Self {
        Self {
            is_open: false,
            breakpoint,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether `width` is the narrow (hamburger) layout.
    pub fn is_narrow(&self, width: u32) -> bool {
        width <= self.breakpoint
    }

    pub fn toggle(&mut self, cx: &mut Ctx<'_>) {
        self.is_open = !self.is_open;
        self.sync(cx);
        tracing::debug!(open = self.is_open, "menu toggled");
    }

    /// Close the menu. Returns whether it was open.
    pub fn close_if_open(&mut self, cx: &mut Ctx<'_>) -> bool {
        if !self.is_open {
            return false;
        }
        self.is_open = false;
        self.sync(cx);
        tracing::debug!("menu closed");
        true
    }

    /// Handle a click. `path` runs from the click target outwards.
    pub fn on_click(&mut self, path: &[Node], viewport_width: u32, cx: &mut Ctx<'_>) {
        if path.contains(&Node::Hamburger) {
            self.toggle(cx);
            return;
        }
        let on_link = path.iter().any(|n| matches!(n, Node::NavLink(_)));
        if on_link && self.is_narrow(viewport_width) {
            self.close_if_open(cx);
        } else if !path.contains(&Node::NavMenu) {
            self.close_if_open(cx);
        }
    }

    pub fn on_resize(&mut self, width: u32, cx: &mut Ctx<'_>) {
        if !self.is_narrow(width) {
            self.close_if_open(cx);
        }
    }

    fn sync(&self, cx: &mut Ctx<'_>) {
        cx.view.set_class(&Node::Hamburger, ACTIVE, self.is_open);
        cx.view.set_class(&Node::NavMenu, ACTIVE, self.is_open);
        cx.scroll.set(Holder::Menu, self.is_open, cx.view);
    }
}

/// Scroll position for an in-page anchor link.
///
/// `href` is the link's raw `href`, `target_top` the document offset of the
/// element it points at (if that element exists). Bare `#` links and missing
/// targets don't scroll.
pub fn anchor_scroll_top(href: &str, target_top: Option<u32>, header_offset: u32) -> Option<u32> {
    if href == "#" || !href.starts_with('#') {
        return None;
    }
    target_top.map(|top| top.saturating_sub(header_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::view::page::UiEvent;

    fn assert_closed(page: &crate::view::page::Page<RecordingView>) {
        let nav = page.nav().unwrap();
        assert!(!nav.is_open());
        assert!(!page.view().has_class(&Node::Hamburger, ACTIVE));
        assert!(!page.view().has_class(&Node::NavMenu, ACTIVE));
        assert!(!page.scroll_locked());
    }

    fn open_menu() -> crate::view::page::Page<RecordingView> {
        let mut page = gallery_page();
        page.dispatch(UiEvent::Resize { width: 400 });
        page.dispatch(click(Node::Hamburger));
        assert!(page.nav().unwrap().is_open());
        assert!(page.view().has_class(&Node::Hamburger, ACTIVE));
        assert!(page.view().has_class(&Node::NavMenu, ACTIVE));
        assert!(page.scroll_locked());
        page
    }

    #[test]
    fn hamburger_toggles() {
        let mut page = open_menu();
        page.dispatch(click_path(&[Node::Hamburger]));
        assert_closed(&page);
    }

    #[test]
    fn click_inside_hamburger_icon_toggles() {
        let mut page = gallery_page();
        // the icon bars are children of the hamburger control
        page.dispatch(click_path(&[Node::Hamburger, Node::Body]));
        assert!(page.nav().unwrap().is_open());
    }

    #[test]
    fn nav_link_closes_on_narrow_viewport() {
        let mut page = open_menu();
        page.dispatch(click_path(&[Node::NavLink(1), Node::NavMenu, Node::Body]));
        assert_closed(&page);
    }

    #[test]
    fn nav_link_keeps_menu_on_wide_viewport() {
        let mut page = open_menu();
        // width changes without a resize event reaching the menu
        page.set_viewport_width(1024);
        page.dispatch(click_path(&[Node::NavLink(1), Node::NavMenu, Node::Body]));
        assert!(page.nav().unwrap().is_open());
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let nav = NavMenu::new(768);
        assert!(nav.is_narrow(768));
        assert!(!nav.is_narrow(769));
    }

    #[test]
    fn outside_click_closes() {
        let mut page = open_menu();
        page.dispatch(click(Node::Body));
        assert_closed(&page);
    }

    #[test]
    fn click_inside_menu_panel_keeps_it_open() {
        let mut page = open_menu();
        page.dispatch(click_path(&[Node::NavMenu, Node::Body]));
        assert!(page.nav().unwrap().is_open());
    }

    #[test]
    fn resize_to_wide_closes_and_releases_scroll() {
        let mut page = open_menu();
        page.dispatch(UiEvent::Resize { width: 1200 });
        assert_closed(&page);
    }

    #[test]
    fn resize_within_narrow_keeps_menu() {
        let mut page = open_menu();
        page.dispatch(UiEvent::Resize { width: 600 });
        assert!(page.nav().unwrap().is_open());
    }

    #[test]
    fn closing_a_closed_menu_writes_nothing() {
        let mut page = gallery_page();
        page.view_mut().clear_ops();
        page.dispatch(click(Node::Body));
        page.dispatch(UiEvent::Resize { width: 1200 });
        assert!(page.view().ops().is_empty());
    }

    #[test]
    fn anchor_scroll_subtracts_header() {
        assert_eq!(anchor_scroll_top("#contact", Some(500), 80), Some(420));
        assert_eq!(anchor_scroll_top("#top", Some(30), 80), Some(0));
    }

    #[test]
    fn bare_hash_and_missing_target_do_not_scroll() {
        assert_eq!(anchor_scroll_top("#", Some(500), 80), None);
        assert_eq!(anchor_scroll_top("#nowhere", None, 80), None);
        assert_eq!(anchor_scroll_top("/about", Some(10), 80), None);
    }
}
