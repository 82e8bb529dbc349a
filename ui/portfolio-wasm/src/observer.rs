//! `IntersectionObserver` binding.

use crate::dom::{host_error, WebSurface};
use pf_core::{IntersectionCallback, IntersectionSource, PortfolioError, Result};
use pf_types::{IntersectionEntry, NodeId, ObserverOptions};
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

pub struct WebIntersections {
    surface: Rc<WebSurface>,
}

impl WebIntersections {
    pub fn new(surface: Rc<WebSurface>) -> Self {
        Self { surface }
    }

    fn supported() -> bool {
        js_sys::Reflect::has(&gloo_utils::window(), &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false)
    }
}

impl IntersectionSource for WebIntersections {
    fn observe(
        &self,
        options: &ObserverOptions,
        targets: &[NodeId],
        mut callback: IntersectionCallback,
    ) -> Result<()> {
        if !Self::supported() {
            return Err(PortfolioError::Unsupported("IntersectionObserver"));
        }

        let surface = Rc::clone(&self.surface);
        let cb = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            let batch: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| IntersectionEntry {
                    target: surface.intern(entry.target()),
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            callback(&batch);
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init)
            .map_err(host_error)?;

        for target in targets {
            match self.surface.element(*target) {
                Some(el) => observer.observe(&el),
                None => debug!("skipping unknown observer target {}", target),
            }
        }
        // The observer lives as long as its targets; the callback must too.
        cb.forget();
        Ok(())
    }
}
