//! Collaborator seams.
//!
//! The page logic never touches a browser directly. It reads through a
//! [`Surface`], writes by applying [`Mutation`]s to it, schedules delayed
//! work on a [`Scheduler`], and subscribes to viewport intersections through
//! an [`IntersectionSource`]. The browser crate implements all three on top
//! of `web-sys`; tests use the fakes in `crate::testing`.

use crate::error::Result;
use pf_types::{IntersectionEntry, Mutation, NodeId, ObserverOptions};
use std::time::Duration;

pub trait Surface {
    fn by_id(&self, id: &str) -> Option<NodeId>;
    fn query(&self, selector: &str) -> Option<NodeId>;
    fn query_all(&self, selector: &str) -> Vec<NodeId>;
    fn query_within(&self, parent: NodeId, selector: &str) -> Option<NodeId>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn text(&self, node: NodeId) -> String;
    /// Current value of a form control; empty for anything else.
    fn value(&self, node: NodeId) -> String;
    /// Distance from the top of the document to the node.
    fn offset_top(&self, node: NodeId) -> f64;
    /// Vertical scroll offset of the page.
    fn scroll_offset(&self) -> f64;
    /// True when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
    fn is_attached(&self, node: NodeId) -> bool;
    fn document_hidden(&self) -> bool;

    fn create_element(&self, tag: &str) -> Result<NodeId>;
    fn apply(&self, mutation: Mutation);
}

pub trait Scheduler {
    /// Run `task` once after `delay`. Pending tasks die with the scheduler.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

pub type IntersectionCallback = Box<dyn FnMut(&[IntersectionEntry])>;

pub trait IntersectionSource {
    /// Start watching `targets`. Batches are delivered to `callback` in the
    /// order the platform reports them.
    fn observe(
        &self,
        options: &ObserverOptions,
        targets: &[NodeId],
        callback: IntersectionCallback,
    ) -> Result<()>;
}

// ── Mutation helpers ──

pub fn add_class(surface: &dyn Surface, node: NodeId, class: &str) {
    surface.apply(Mutation::AddClass {
        node,
        class: class.to_owned(),
    });
}

pub fn remove_class(surface: &dyn Surface, node: NodeId, class: &str) {
    surface.apply(Mutation::RemoveClass {
        node,
        class: class.to_owned(),
    });
}

pub fn toggle_class(surface: &dyn Surface, node: NodeId, class: &str, force: bool) {
    if force {
        add_class(surface, node, class);
    } else {
        remove_class(surface, node, class);
    }
}

pub fn set_style(surface: &dyn Surface, node: NodeId, property: &str, value: &str) {
    surface.apply(Mutation::SetStyle {
        node,
        property: property.to_owned(),
        value: value.to_owned(),
    });
}

pub fn set_text(surface: &dyn Surface, node: NodeId, text: &str) {
    surface.apply(Mutation::SetText {
        node,
        text: text.to_owned(),
    });
}

pub fn set_attribute(surface: &dyn Surface, node: NodeId, name: &str, value: &str) {
    surface.apply(Mutation::SetAttribute {
        node,
        name: name.to_owned(),
        value: value.to_owned(),
    });
}

pub fn append(surface: &dyn Surface, parent: Option<NodeId>, child: NodeId) {
    surface.apply(Mutation::Append { parent, child });
}

pub fn scroll_to(surface: &dyn Surface, top: f64) {
    surface.apply(Mutation::ScrollTo { top });
}
