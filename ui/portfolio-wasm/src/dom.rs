//! Browser DOM surface.
//!
//! Elements are handed to the page logic as [`NodeId`]s. Each element is
//! interned into a handle table the first time it is seen; the same element
//! always maps to the same handle until it is removed from the page. Removing
//! an element releases its handle and the handles of everything inside it.

use pf_core::{PortfolioError, Result, Surface};
use crate::registry::Registry;
use js_sys::Map;
use pf_types::{Mutation, NodeId};
use std::cell::RefCell;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, NodeList, ScrollIntoViewOptions,
    ScrollBehavior, ScrollLogicalPosition, ScrollToOptions,
};

// ── Helpers ──

fn elements(list: NodeList) -> Vec<Element> {
    let mut v = Vec::new();
    for i in 0..list.length() {
        if let Some(node) = list.item(i) {
            if let Ok(el) = node.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn host_error(err: JsValue) -> PortfolioError {
    PortfolioError::Host(format!("{err:?}"))
}

// ── Surface ──

pub struct WebSurface {
    document: Document,
    /// Element to handle.
    index: Map,
    nodes: RefCell<Registry<Element>>,
}

impl WebSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            index: Map::new(),
            nodes: RefCell::new(Registry::default()),
        }
    }

    /// Handle for `element`, interning it on first sight.
    pub fn intern(&self, element: Element) -> NodeId {
        if let Some(id) = self.index.get(&element).as_f64() {
            return NodeId(id as u32);
        }
        let id = self.nodes.borrow_mut().insert(element.clone());
        self.index.set(&element, &JsValue::from(id));
        NodeId(id)
    }

    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.0).cloned()
    }

    fn release(&self, element: &Element) {
        if let Some(id) = self.index.get(element).as_f64() {
            self.index.delete(element);
            self.nodes.borrow_mut().take(id as u32);
        }
    }

    fn release_subtree(&self, root: &Element) -> std::result::Result<(), JsValue> {
        for el in elements(root.query_selector_all("*")?) {
            self.release(&el);
        }
        self.release(root);
        Ok(())
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn try_apply(&self, mutation: &Mutation) -> std::result::Result<(), JsValue> {
        let missing = |node: NodeId| JsValue::from_str(&format!("stale handle {node}"));
        let element = |node: &NodeId| self.element(*node).ok_or_else(|| missing(*node));

        match mutation {
            Mutation::AddClass { node, class } => element(node)?.class_list().add_1(class),
            Mutation::RemoveClass { node, class } => {
                element(node)?.class_list().remove_1(class)
            }
            Mutation::SetStyle {
                node,
                property,
                value,
            } => self
                .html(*node)
                .ok_or_else(|| missing(*node))?
                .style()
                .set_property(property, value),
            Mutation::SetText { node, text } => {
                element(node)?.set_text_content(Some(text));
                Ok(())
            }
            Mutation::SetAttribute { node, name, value } => {
                element(node)?.set_attribute(name, value)
            }
            Mutation::SetDisabled { node, disabled } => {
                let el = element(node)?;
                match el.dyn_ref::<HtmlButtonElement>() {
                    Some(button) => {
                        button.set_disabled(*disabled);
                        Ok(())
                    }
                    None if *disabled => el.set_attribute("disabled", ""),
                    None => el.remove_attribute("disabled"),
                }
            }
            Mutation::ResetForm { form } => {
                if let Some(form) = element(form)?.dyn_ref::<HtmlFormElement>() {
                    form.reset();
                }
                Ok(())
            }
            Mutation::Append { parent, child } => {
                let parent: Element = match parent {
                    Some(parent) => element(parent)?,
                    None => self
                        .document
                        .body()
                        .ok_or_else(|| JsValue::from_str("document has no body"))?
                        .into(),
                };
                let child: Element = element(child)?;
                parent.append_child(&child).map(|_| ())
            }
            Mutation::Remove { node } => {
                let el = element(node)?;
                el.remove();
                self.release_subtree(&el)
            }
            Mutation::ScrollTo { top } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(ScrollBehavior::Smooth);
                gloo_utils::window().scroll_to_with_scroll_to_options(&options);
                Ok(())
            }
            Mutation::ScrollIntoView { node } => {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Center);
                element(node)?.scroll_into_view_with_scroll_into_view_options(&options);
                Ok(())
            }
            Mutation::SetTitle { title } => {
                self.document.set_title(title);
                Ok(())
            }
            Mutation::InjectStyles { css } => {
                let style = self.document.create_element("style")?;
                style.set_text_content(Some(css));
                let head = self
                    .document
                    .head()
                    .ok_or_else(|| JsValue::from_str("document has no head"))?;
                head.append_child(&style).map(|_| ())
            }
        }
    }
}

impl Surface for WebSurface {
    fn by_id(&self, id: &str) -> Option<NodeId> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.intern(el))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        let el = self.document.query_selector(selector).ok()??;
        Some(self.intern(el))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(list).into_iter().map(|el| self.intern(el)).collect(),
            Err(err) => {
                debug!("bad selector {}: {:?}", selector, err);
                Vec::new()
            }
        }
    }

    fn query_within(&self, parent: NodeId, selector: &str) -> Option<NodeId> {
        let el = self.element(parent)?.query_selector(selector).ok()??;
        Some(self.intern(el))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn text(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|el| el.text_content())
            .unwrap_or_default()
    }

    fn value(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.html(node).map_or(0.0, |el| f64::from(el.offset_top()))
    }

    fn scroll_offset(&self) -> f64 {
        gloo_utils::window().scroll_y().unwrap_or(0.0)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(ancestor), Some(node)) => ancestor.contains(Some(node.as_ref())),
            _ => false,
        }
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.is_connected())
    }

    fn document_hidden(&self) -> bool {
        self.document.hidden()
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        let el = self.document.create_element(tag).map_err(host_error)?;
        Ok(self.intern(el))
    }

    fn apply(&self, mutation: Mutation) {
        if let Err(err) = self.try_apply(&mutation) {
            warn!("could not apply {:?}: {:?}", mutation, err);
        }
    }
}
