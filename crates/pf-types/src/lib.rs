use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node owned by the DOM surface. Equal handles name the same node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Email,
    Subject,
    Message,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Name,
        FieldKind::Email,
        FieldKind::Subject,
        FieldKind::Message,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Email => "email",
            FieldKind::Subject => "subject",
            FieldKind::Message => "message",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect commands the page logic issues against the DOM surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    SetStyle { node: NodeId, property: String, value: String },
    SetText { node: NodeId, text: String },
    SetAttribute { node: NodeId, name: String, value: String },
    SetDisabled { node: NodeId, disabled: bool },
    ResetForm { form: NodeId },
    /// Append `child` to `parent`, or to the document body when `parent` is `None`.
    Append { parent: Option<NodeId>, child: NodeId },
    Remove { node: NodeId },
    /// Smooth scroll of the page to `top`.
    ScrollTo { top: f64 },
    /// Smooth scroll bringing `node` to the vertical centre.
    ScrollIntoView { node: NodeId },
    SetTitle { title: String },
    InjectStyles { css: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}
