//! Page-level touches: title swap, image fade-in, external links, and the
//! reveal-animation stylesheet.

use crate::surface::{self, Surface};
use pf_types::{Mutation, NodeId};
use std::rc::Rc;

pub const ANIMATION_STYLES: &str = include_str!("../assets/animations.css");
pub const IMAGES: &str = "img";
pub const EXTERNAL_LINKS: &str = "a[href^=\"http\"]";

pub struct PageChrome {
    surface: Rc<dyn Surface>,
    title_visible: String,
    title_hidden: String,
}

impl PageChrome {
    pub fn new(surface: Rc<dyn Surface>, title_visible: String, title_hidden: String) -> Self {
        Self {
            surface,
            title_visible,
            title_hidden,
        }
    }

    pub fn inject_styles(&self) {
        self.surface.apply(Mutation::InjectStyles {
            css: ANIMATION_STYLES.to_owned(),
        });
    }

    pub fn on_visibility_change(&self) {
        let title = if self.surface.document_hidden() {
            &self.title_hidden
        } else {
            &self.title_visible
        };
        self.surface.apply(Mutation::SetTitle {
            title: title.clone(),
        });
    }

    /// Hide every image until it loads. Returns the images to listen on.
    pub fn prepare_images(&self) -> Vec<NodeId> {
        let s = self.surface.as_ref();
        let images = s.query_all(IMAGES);
        for img in &images {
            surface::set_style(s, *img, "opacity", "0");
            surface::set_style(s, *img, "transition", "opacity 0.3s ease");
        }
        images
    }

    pub fn on_image_load(&self, img: NodeId) {
        surface::set_style(self.surface.as_ref(), img, "opacity", "1");
    }

    pub fn on_image_error(&self, img: NodeId) {
        surface::set_style(self.surface.as_ref(), img, "display", "none");
    }

    /// Open absolute http(s) links in a new tab without handing it `window.opener`.
    pub fn open_external_links(&self) {
        let s = self.surface.as_ref();
        for link in s.query_all(EXTERNAL_LINKS) {
            surface::set_attribute(s, link, "target", "_blank");
            surface::set_attribute(s, link, "rel", "noopener noreferrer");
        }
    }
}
