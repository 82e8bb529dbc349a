use crate::surface::{self, Surface};
use pf_types::NodeId;
use std::rc::Rc;

pub const NAVBAR: &str = ".navbar";

/// Restyles the fixed navigation bar once the page is scrolled.
pub struct Navbar {
    surface: Rc<dyn Surface>,
    navbar: NodeId,
    threshold: f64,
}

impl Navbar {
    pub fn bind(surface: Rc<dyn Surface>, threshold: f64) -> Option<Self> {
        let navbar = surface.query(NAVBAR)?;
        Some(Self {
            surface,
            navbar,
            threshold,
        })
    }

    pub fn on_scroll(&self) {
        let scrolled = self.surface.scroll_offset().max(0.0) > self.threshold;
        surface::toggle_class(self.surface.as_ref(), self.navbar, "scrolled", scrolled);
    }
}
