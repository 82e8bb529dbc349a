//! Collapsible mobile menu.

use crate::surface::{self, Surface};
use pf_types::NodeId;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

pub const TRIGGER_ID: &str = "hamburger";
pub const MENU_ID: &str = "nav-menu";

pub struct MobileMenu {
    surface: Rc<dyn Surface>,
    trigger: NodeId,
    menu: NodeId,
    open: Cell<bool>,
}

impl MobileMenu {
    /// `None` when the page has no hamburger or no menu.
    pub fn bind(surface: Rc<dyn Surface>) -> Option<Self> {
        let trigger = surface.by_id(TRIGGER_ID)?;
        let menu = surface.by_id(MENU_ID)?;
        Some(Self {
            surface,
            trigger,
            menu,
            open: Cell::new(false),
        })
    }

    pub fn trigger(&self) -> NodeId {
        self.trigger
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn toggle(&self) {
        self.set_open(!self.open.get());
    }

    pub fn close(&self) {
        self.set_open(false);
    }

    /// Close unless the click landed on the trigger or inside the menu.
    pub fn on_document_click(&self, target: Option<NodeId>) {
        let inside = target.is_some_and(|t| {
            self.surface.contains(self.trigger, t) || self.surface.contains(self.menu, t)
        });
        if !inside {
            self.close();
        }
    }

    fn set_open(&self, open: bool) {
        if self.open.replace(open) != open {
            debug!("mobile menu {}", if open { "opened" } else { "closed" });
        }
        let s = self.surface.as_ref();
        surface::toggle_class(s, self.trigger, "active", open);
        surface::toggle_class(s, self.menu, "active", open);
    }
}
