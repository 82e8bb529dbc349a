//! Portfolio page WASM frontend.
//!
//! Browser implementations of the `pf-core` collaborators, plus the entry
//! point that mounts the page once the document has been parsed.

pub mod config;
pub mod dom;
pub mod events;
pub mod logging;
pub mod observer;
pub mod registry;
pub mod timers;

use dom::WebSurface;
use observer::WebIntersections;
use pf_core::{App, Collaborators, PortfolioError};
use pf_types::Severity;
use std::cell::RefCell;
use std::rc::Rc;
use timers::WebScheduler;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

fn to_js(err: PortfolioError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    let document = gloo_utils::document();
    if document.ready_state() != "loading" {
        return mount();
    }
    let cb = Closure::once(move || {
        if let Err(err) = mount() {
            warn!("page mount failed: {:?}", err);
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn mount() -> Result<(), JsValue> {
    let document = gloo_utils::document();
    let config = config::load(&document);
    let surface = Rc::new(WebSurface::new(document));

    let app = Rc::new(App::mount(
        Collaborators {
            surface: surface.clone(),
            scheduler: Rc::new(WebScheduler::default()),
            intersections: Rc::new(WebIntersections::new(surface.clone())),
        },
        config,
    ));
    events::bind_events(&app, &surface)?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Show a toast from page scripts. `severity` is `info`, `success` or
/// `error`; anything else falls back to `info`.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, severity: Option<String>) -> Result<(), JsValue> {
    let severity = match severity.as_deref() {
        Some("success") => Severity::Success,
        Some("error") => Severity::Error,
        _ => Severity::Info,
    };
    let app = APP
        .with(|slot| slot.borrow().clone())
        .ok_or_else(|| JsValue::from_str("portfolio page is not mounted yet"))?;
    app.notify(message, severity).map(|_| ()).map_err(to_js)
}
