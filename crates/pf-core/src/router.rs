//! Smooth scrolling to in-page anchors.

use crate::menu::MobileMenu;
use crate::surface::{self, Surface};
use pf_types::NodeId;
use std::rc::Rc;
use tracing::debug;

/// Links that scroll and then close the mobile menu.
pub const NAV_LINKS: &str = ".nav-link, .scroll-indicator";
/// Hero call-to-action buttons; only their `#…` links are routed.
pub const HERO_BUTTONS: &str = ".hero-buttons .btn";

pub struct ScrollRouter {
    surface: Rc<dyn Surface>,
    menu: Option<Rc<MobileMenu>>,
    navbar_offset: f64,
}

/// A link the router takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutedLink {
    pub node: NodeId,
    pub close_menu: bool,
}

impl ScrollRouter {
    pub fn new(surface: Rc<dyn Surface>, menu: Option<Rc<MobileMenu>>, navbar_offset: f64) -> Self {
        Self {
            surface,
            menu,
            navbar_offset,
        }
    }

    pub fn links(&self) -> Vec<RoutedLink> {
        let mut links: Vec<RoutedLink> = self
            .surface
            .query_all(NAV_LINKS)
            .into_iter()
            .map(|node| RoutedLink {
                node,
                close_menu: true,
            })
            .collect();
        links.extend(
            self.surface
                .query_all(HERO_BUTTONS)
                .into_iter()
                .filter(|node| is_in_page(self.surface.attribute(*node, "href").as_deref()))
                .map(|node| RoutedLink {
                    node,
                    close_menu: false,
                }),
        );
        links
    }

    /// Scroll offset for an `#id` href, or `None` when nothing matches.
    pub fn resolve(&self, href: &str) -> Option<f64> {
        let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        let target = self.surface.by_id(id)?;
        Some(self.surface.offset_top(target) - self.navbar_offset)
    }

    /// Handle a click on a routed link. Returns whether the browser's default
    /// navigation must be suppressed.
    pub fn activate(&self, link: RoutedLink) -> bool {
        let href = self.surface.attribute(link.node, "href");
        let Some(href) = href.filter(|h| is_in_page(Some(h))) else {
            return false;
        };

        match self.resolve(&href) {
            Some(top) => {
                debug!("scrolling to {} at {}", href, top);
                surface::scroll_to(self.surface.as_ref(), top);
                if link.close_menu {
                    if let Some(menu) = &self.menu {
                        menu.close();
                    }
                }
            }
            None => debug!("no scroll target for {}", href),
        }
        true
    }
}

fn is_in_page(href: Option<&str>) -> bool {
    href.is_some_and(|h| h.starts_with('#'))
}
