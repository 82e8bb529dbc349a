//! Event binding.
//!
//! Attaches one browser listener per entry of [`App::listeners`] and forwards
//! each event to [`App::dispatch`].

use crate::dom::WebSurface;
use pf_core::{App, HostEvent, ListenTarget};
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget};

/// Bind all listeners. Call once after mount.
pub fn bind_events(app: &Rc<App>, surface: &Rc<WebSurface>) -> Result<(), JsValue> {
    for listener in app.listeners() {
        let target: EventTarget = match listener.target {
            ListenTarget::Window => gloo_utils::window().into(),
            ListenTarget::Document => gloo_utils::document().into(),
            ListenTarget::Node(node) => match surface.element(node) {
                Some(el) => el.into(),
                None => {
                    debug!("no element behind {}, skipping {}", node, listener.event);
                    continue;
                }
            },
        };

        let app2 = Rc::clone(app);
        let surface2 = Rc::clone(surface);
        let action = listener.action;
        let cb = Closure::wrap(Box::new(move |event: Event| {
            let host_event = HostEvent {
                target: event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map(|el| surface2.intern(el)),
            };
            if app2.dispatch(action, &host_event).prevent_default {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        target.add_event_listener_with_callback(listener.event.as_str(), cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}
