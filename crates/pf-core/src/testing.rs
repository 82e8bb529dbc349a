//! In-memory collaborators for unit tests.

use crate::error::{PortfolioError, Result};
use crate::surface::{IntersectionCallback, IntersectionSource, Scheduler, Surface};
use pf_types::{IntersectionEntry, Mutation, NodeId, ObserverOptions};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

// ── Fake DOM ──

#[derive(Debug, Default, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    offset_top: f64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    title: String,
    scroll_offset: f64,
    hidden: bool,
    injected_styles: Vec<String>,
    log: Vec<Mutation>,
}

const BODY: NodeId = NodeId(0);

impl Tree {
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn is_attached(&self, mut id: NodeId) -> bool {
        loop {
            if id == BODY {
                return true;
            }
            match self.node(id).parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(root).children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let groups: Vec<Vec<Compound>> = selector
            .split(',')
            .map(|group| group.split_whitespace().map(Compound::parse).collect())
            .collect();
        let mut all = Vec::new();
        self.descendants(root, &mut all);
        all.into_iter()
            .filter(|id| groups.iter().any(|chain| self.matches_chain(*id, chain)))
            .collect()
    }

    fn matches_chain(&self, id: NodeId, chain: &[Compound]) -> bool {
        let Some((last, ancestors)) = chain.split_last() else {
            return false;
        };
        if !last.matches(self.node(id)) {
            return false;
        }
        let mut current = self.node(id).parent;
        let mut remaining = ancestors.iter().rev().peekable();
        while let Some(wanted) = remaining.peek() {
            let Some(ancestor) = current else {
                return false;
            };
            if wanted.matches(self.node(ancestor)) {
                remaining.next();
            }
            current = self.node(ancestor).parent;
        }
        true
    }

    fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::AddClass { node, class } => {
                let classes = &mut self.node_mut(*node).classes;
                if !classes.contains(class) {
                    classes.push(class.clone());
                }
            }
            Mutation::RemoveClass { node, class } => {
                self.node_mut(*node).classes.retain(|c| c != class);
            }
            Mutation::SetStyle {
                node,
                property,
                value,
            } => {
                self.node_mut(*node)
                    .styles
                    .insert(property.clone(), value.clone());
            }
            Mutation::SetText { node, text } => self.node_mut(*node).text = text.clone(),
            Mutation::SetAttribute { node, name, value } => {
                self.node_mut(*node)
                    .attributes
                    .insert(name.clone(), value.clone());
            }
            Mutation::SetDisabled { node, disabled } => self.node_mut(*node).disabled = *disabled,
            Mutation::ResetForm { form } => {
                let mut inner = Vec::new();
                self.descendants(*form, &mut inner);
                for id in inner {
                    let node = self.node_mut(id);
                    if matches!(node.tag.as_str(), "input" | "textarea" | "select") {
                        node.value.clear();
                    }
                }
            }
            Mutation::Append { parent, child } => self.attach(parent.unwrap_or(BODY), *child),
            Mutation::Remove { node } => self.detach(*node),
            Mutation::ScrollTo { top } => self.scroll_offset = *top,
            Mutation::ScrollIntoView { .. } => {}
            Mutation::SetTitle { title } => self.title = title.clone(),
            Mutation::InjectStyles { css } => self.injected_styles.push(css.clone()),
        }
    }
}

/// One compound selector: `tag.class#id[attr][attr="v"][attr^="v"]`.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
    attributes: Vec<AttrTest>,
}

#[derive(Debug)]
enum AttrTest {
    Present(String),
    Equals(String, String),
    Prefix(String, String),
}

impl Compound {
    fn parse(raw: &str) -> Compound {
        let mut compound = Compound::default();
        let mut rest = raw;

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            compound.tag = Some(rest[..tag_end].to_owned());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(['.', '#', '[']).unwrap_or(body.len());
                    if first == '.' {
                        compound.classes.push(body[..end].to_owned());
                    } else {
                        compound.id = Some(body[..end].to_owned());
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let end = rest.find(']').expect("unterminated attribute selector");
                    let inner = &rest[1..end];
                    compound.attributes.push(AttrTest::parse(inner));
                    rest = &rest[end + 1..];
                }
                other => panic!("unsupported selector character '{other}' in '{raw}'"),
            }
        }
        compound
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }
        self.classes.iter().all(|c| node.classes.contains(c))
            && self.attributes.iter().all(|test| test.matches(node))
    }
}

impl AttrTest {
    fn parse(inner: &str) -> AttrTest {
        let unquote = |v: &str| v.trim_matches('"').to_owned();
        if let Some((name, value)) = inner.split_once("^=") {
            AttrTest::Prefix(name.to_owned(), unquote(value))
        } else if let Some((name, value)) = inner.split_once('=') {
            AttrTest::Equals(name.to_owned(), unquote(value))
        } else {
            AttrTest::Present(inner.to_owned())
        }
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            AttrTest::Present(name) => node.attributes.contains_key(name),
            AttrTest::Equals(name, value) => node.attributes.get(name) == Some(value),
            AttrTest::Prefix(name, prefix) => node
                .attributes
                .get(name)
                .is_some_and(|v| v.starts_with(prefix.as_str())),
        }
    }
}

/// A DOM tree held in memory. Node 0 is the document body.
pub struct FakeSurface {
    tree: RefCell<Tree>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        let mut tree = Tree::default();
        tree.push(Node {
            tag: "body".to_owned(),
            ..Node::default()
        });
        Self {
            tree: RefCell::new(tree),
        }
    }
}

impl FakeSurface {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Build a node under `parent` (the body when `None`). A `class`
    /// attribute is split into the class list.
    pub fn add(&self, parent: Option<NodeId>, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut node = Node {
            tag: tag.to_owned(),
            ..Node::default()
        };
        for (name, value) in attributes {
            if *name == "class" {
                node.classes = value.split_whitespace().map(str::to_owned).collect();
            } else {
                node.attributes.insert((*name).to_owned(), (*value).to_owned());
            }
        }
        let mut tree = self.tree.borrow_mut();
        let id = tree.push(node);
        tree.attach(parent.unwrap_or(BODY), id);
        id
    }

    pub fn set_text_content(&self, node: NodeId, text: &str) {
        self.tree.borrow_mut().node_mut(node).text = text.to_owned();
    }

    /// Simulate typing: replaces the control value without logging a mutation.
    pub fn type_into(&self, node: NodeId, value: &str) {
        self.tree.borrow_mut().node_mut(node).value = value.to_owned();
    }

    pub fn set_offset_top(&self, node: NodeId, top: f64) {
        self.tree.borrow_mut().node_mut(node).offset_top = top;
    }

    pub fn set_scroll_offset(&self, offset: f64) {
        self.tree.borrow_mut().scroll_offset = offset;
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.tree.borrow_mut().hidden = hidden;
    }

    pub fn detach(&self, node: NodeId) {
        self.tree.borrow_mut().detach(node);
    }

    pub fn attach(&self, parent: Option<NodeId>, node: NodeId) {
        self.tree.borrow_mut().attach(parent.unwrap_or(BODY), node);
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.tree.borrow().node(node).classes.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree.borrow().node(node).styles.get(property).cloned()
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.tree.borrow().node(node).disabled
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.borrow().node(node).children.clone()
    }

    pub fn body_children(&self) -> Vec<NodeId> {
        self.children(BODY)
    }

    pub fn title(&self) -> String {
        self.tree.borrow().title.clone()
    }

    pub fn injected_styles(&self) -> Vec<String> {
        self.tree.borrow().injected_styles.clone()
    }

    pub fn log(&self) -> Vec<Mutation> {
        self.tree.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.tree.borrow_mut().log.clear();
    }

    pub fn scroll_commands(&self) -> Vec<Mutation> {
        self.log()
            .into_iter()
            .filter(|m| matches!(m, Mutation::ScrollTo { .. } | Mutation::ScrollIntoView { .. }))
            .collect()
    }

    /// Attached nodes carrying `class`.
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(&format!(".{class}"))
    }
}

impl Surface for FakeSurface {
    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.query(&format!("#{id}"))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.tree.borrow().select(BODY, selector)
    }

    fn query_within(&self, parent: NodeId, selector: &str) -> Option<NodeId> {
        self.tree.borrow().select(parent, selector).into_iter().next()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.tree.borrow().node(node).attributes.get(name).cloned()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.borrow().node(node).classes.iter().any(|c| c == class)
    }

    fn text(&self, node: NodeId) -> String {
        self.tree.borrow().node(node).text.clone()
    }

    fn value(&self, node: NodeId) -> String {
        self.tree.borrow().node(node).value.clone()
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.tree.borrow().node(node).offset_top
    }

    fn scroll_offset(&self) -> f64 {
        self.tree.borrow().scroll_offset
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let tree = self.tree.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = tree.node(id).parent;
        }
        false
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.tree.borrow().is_attached(node)
    }

    fn document_hidden(&self) -> bool {
        self.tree.borrow().hidden
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        Ok(self.tree.borrow_mut().push(Node {
            tag: tag.to_owned(),
            ..Node::default()
        }))
    }

    fn apply(&self, mutation: Mutation) {
        let mut tree = self.tree.borrow_mut();
        tree.apply(&mutation);
        tree.log.push(mutation);
    }
}

// ── Virtual clock ──

struct Pending {
    due: Duration,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

/// Scheduler driven by an explicit virtual clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    seq: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Move the clock forward, running every task that falls due in order.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let due = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);
                due.map(|i| pending.remove(i))
            };
            let Some(next) = next else {
                break;
            };
            self.now.set(next.due);
            (next.task)();
        }
        self.now.set(target);
    }

    /// Drop every pending task, as when the page context goes away.
    pub fn shutdown(&self) {
        self.pending.borrow_mut().clear();
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.pending.borrow_mut().push(Pending {
            due: self.now.get() + delay,
            seq,
            task,
        });
    }
}

// ── Intersection source ──

struct Registration {
    options: ObserverOptions,
    targets: Vec<NodeId>,
    callback: Option<IntersectionCallback>,
}

pub struct FakeIntersections {
    supported: bool,
    registrations: RefCell<Vec<Registration>>,
}

impl FakeIntersections {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            supported: true,
            registrations: RefCell::new(Vec::new()),
        })
    }

    pub fn unsupported() -> Rc<Self> {
        Rc::new(Self {
            supported: false,
            registrations: RefCell::new(Vec::new()),
        })
    }

    pub fn observer_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    pub fn targets(&self, threshold: f64) -> Vec<NodeId> {
        self.registrations
            .borrow()
            .iter()
            .find(|r| r.options.threshold == threshold)
            .map(|r| r.targets.clone())
            .unwrap_or_default()
    }

    /// Deliver one batch to the observer registered with `threshold`.
    pub fn deliver(&self, threshold: f64, entries: &[IntersectionEntry]) {
        let (index, mut callback) = {
            let mut registrations = self.registrations.borrow_mut();
            let index = registrations
                .iter()
                .position(|r| r.options.threshold == threshold)
                .expect("no observer registered with that threshold");
            let callback = registrations[index]
                .callback
                .take()
                .expect("observer callback re-entered");
            (index, callback)
        };
        callback(entries);
        self.registrations.borrow_mut()[index].callback = Some(callback);
    }
}

impl IntersectionSource for FakeIntersections {
    fn observe(
        &self,
        options: &ObserverOptions,
        targets: &[NodeId],
        callback: IntersectionCallback,
    ) -> Result<()> {
        if !self.supported {
            return Err(PortfolioError::Unsupported("IntersectionObserver"));
        }
        self.registrations.borrow_mut().push(Registration {
            options: options.clone(),
            targets: targets.to_vec(),
            callback: Some(callback),
        });
        Ok(())
    }
}

pub fn entering(target: NodeId) -> IntersectionEntry {
    IntersectionEntry {
        target,
        is_intersecting: true,
    }
}

pub fn leaving(target: NodeId) -> IntersectionEntry {
    IntersectionEntry {
        target,
        is_intersecting: false,
    }
}

// ── Page fixture ──

/// Handles to the interesting nodes of [`portfolio_page`].
pub struct PageNodes {
    pub navbar: NodeId,
    pub hamburger: NodeId,
    pub nav_menu: NodeId,
    pub nav_home: NodeId,
    pub nav_about: NodeId,
    pub nav_contact: NodeId,
    pub home: NodeId,
    pub about: NodeId,
    pub contact: NodeId,
    pub skill_card: NodeId,
    pub hero_contact: NodeId,
    pub hero_resume: NodeId,
    pub scroll_indicator: NodeId,
    pub portrait: NodeId,
    pub github_link: NodeId,
    pub mail_link: NodeId,
    pub form: NodeId,
    pub name: NodeId,
    pub email: NodeId,
    pub subject: NodeId,
    pub message: NodeId,
    pub name_error: NodeId,
    pub email_error: NodeId,
    pub subject_error: NodeId,
    pub message_error: NodeId,
    pub submit: NodeId,
    pub footer_text: NodeId,
}

/// A trimmed-down portfolio page with every element the app binds to.
pub fn portfolio_page() -> (Rc<FakeSurface>, PageNodes) {
    let s = FakeSurface::new();

    let navbar = s.add(None, "nav", &[("class", "navbar")]);
    let hamburger = s.add(Some(navbar), "div", &[("id", "hamburger"), ("class", "hamburger")]);
    let nav_menu = s.add(Some(navbar), "ul", &[("id", "nav-menu"), ("class", "nav-menu")]);
    let nav_home = s.add(Some(nav_menu), "a", &[("class", "nav-link"), ("href", "#home")]);
    let nav_about = s.add(Some(nav_menu), "a", &[("class", "nav-link"), ("href", "#about")]);
    let nav_contact = s.add(Some(nav_menu), "a", &[("class", "nav-link"), ("href", "#contact")]);

    let home = s.add(None, "section", &[("id", "home"), ("class", "hero")]);
    let hero_buttons = s.add(Some(home), "div", &[("class", "hero-buttons")]);
    let hero_contact = s.add(Some(hero_buttons), "a", &[("class", "btn btn--primary"), ("href", "#contact")]);
    let hero_resume = s.add(Some(hero_buttons), "a", &[("class", "btn"), ("href", "resume.pdf")]);
    let scroll_indicator = s.add(Some(home), "a", &[("class", "scroll-indicator"), ("href", "#about")]);
    let portrait = s.add(Some(home), "img", &[("src", "me.jpg")]);

    let about = s.add(None, "section", &[("id", "about")]);
    let skill_card = s.add(Some(about), "div", &[("class", "skill-category")]);
    let github_link = s.add(Some(about), "a", &[("href", "https://github.com/selvamani")]);
    let mail_link = s.add(Some(about), "a", &[("href", "mailto:hello@example.com")]);

    let contact = s.add(None, "section", &[("id", "contact")]);
    let form = s.add(Some(contact), "form", &[("id", "contactForm")]);
    let name = s.add(Some(form), "input", &[("id", "name")]);
    let name_error = s.add(Some(form), "div", &[("id", "nameError"), ("class", "error-message")]);
    let email = s.add(Some(form), "input", &[("id", "email")]);
    let email_error = s.add(Some(form), "div", &[("id", "emailError"), ("class", "error-message")]);
    let subject = s.add(Some(form), "input", &[("id", "subject")]);
    let subject_error = s.add(Some(form), "div", &[("id", "subjectError"), ("class", "error-message")]);
    let message = s.add(Some(form), "textarea", &[("id", "message")]);
    let message_error = s.add(Some(form), "div", &[("id", "messageError"), ("class", "error-message")]);
    let submit = s.add(Some(form), "button", &[("type", "submit"), ("class", "btn")]);
    s.set_text_content(submit, "Send Message");

    let footer = s.add(None, "footer", &[]);
    let footer_text = s.add(Some(footer), "p", &[]);

    s.set_offset_top(home, 0.0);
    s.set_offset_top(about, 900.0);
    s.set_offset_top(contact, 2_400.0);

    let nodes = PageNodes {
        navbar,
        hamburger,
        nav_menu,
        nav_home,
        nav_about,
        nav_contact,
        home,
        about,
        contact,
        skill_card,
        hero_contact,
        hero_resume,
        scroll_indicator,
        portrait,
        github_link,
        mail_link,
        form,
        name,
        email,
        subject,
        message,
        name_error,
        email_error,
        subject_error,
        message_error,
        submit,
        footer_text,
    };
    (s, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_matcher_handles_page_selectors() {
        let (s, n) = portfolio_page();

        assert_eq!(s.query_all(".nav-link"), vec![n.nav_home, n.nav_about, n.nav_contact]);
        assert_eq!(s.query_all(".hero-buttons .btn"), vec![n.hero_contact, n.hero_resume]);
        assert_eq!(s.query_all("section[id]"), vec![n.home, n.about, n.contact]);
        assert_eq!(s.query(".nav-link[href=\"#about\"]"), Some(n.nav_about));
        assert_eq!(s.query_all("a[href^=\"http\"]"), vec![n.github_link]);
        assert_eq!(s.query_within(n.form, "button[type=\"submit\"]"), Some(n.submit));
        assert_eq!(s.by_id("messageError"), Some(n.message_error));
        assert!(s.query_within(n.home, ".skill-category").is_none());
    }

    #[test]
    fn manual_scheduler_runs_tasks_in_due_order() {
        let scheduler = ManualScheduler::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let seen = Rc::clone(&seen);
            scheduler.schedule(Duration::from_millis(delay), Box::new(move || seen.borrow_mut().push(label)));
        }

        scheduler.advance(Duration::from_millis(20));
        assert_eq!(*seen.borrow(), vec!["a", "a2", "b"]);
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(Duration::from_millis(10));
        assert_eq!(*seen.borrow(), vec!["a", "a2", "b", "c"]);
    }
}
