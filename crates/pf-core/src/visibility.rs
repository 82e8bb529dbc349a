//! Viewport visibility tracking.
//!
//! Two projections are derived from intersection batches, each fed by its
//! own observer:
//!
//! - **Reveal**: animated elements gain `animate-in` the first time they
//!   intersect. The transition is one-shot; leaving or re-entering the
//!   viewport afterwards changes nothing.
//! - **Active link**: whenever a section with an id intersects, every
//!   `.nav-link` loses `active` and the link pointing at that section gains
//!   it. Entries are handled in delivered order, so when several sections
//!   intersect in one batch the last one wins. At most one link is active
//!   after any batch.
//!
//! Both projections are plain state machines returning [`Mutation`]s; the
//! [`VisibilityTracker`] feeds them from an [`IntersectionSource`] and applies
//! their output to the surface. When the platform cannot observe
//! intersections the tracker leaves the page exactly as it found it.

use crate::config::PageConfig;
use crate::error::PortfolioError;
use crate::surface::{self, IntersectionSource, Surface};
use pf_types::{IntersectionEntry, Mutation, NodeId, ObserverOptions};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, warn};

pub const REVEAL_PENDING: &str = "animate-on-scroll";
pub const REVEALED: &str = "animate-in";
pub const ACTIVE: &str = "active";
pub const SECTIONS: &str = "section";
pub const SECTIONS_WITH_ID: &str = "section[id]";
pub const NAV_LINKS: &str = ".nav-link";

// ── Reveal projection ──

#[derive(Debug, Default)]
pub struct RevealProjection {
    revealed: HashSet<NodeId>,
}

impl RevealProjection {
    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.revealed.contains(&node)
    }

    pub fn apply(&mut self, entries: &[IntersectionEntry]) -> Vec<Mutation> {
        entries
            .iter()
            .filter(|entry| entry.is_intersecting && self.revealed.insert(entry.target))
            .map(|entry| Mutation::AddClass {
                node: entry.target,
                class: REVEALED.to_owned(),
            })
            .collect()
    }
}

// ── Active-link projection ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub node: NodeId,
    /// Section id the link points at (`href` without the leading `#`).
    pub target: Option<String>,
}

#[derive(Debug, Default)]
pub struct ActiveLinkProjection {
    links: Vec<NavLink>,
    sections: HashMap<NodeId, String>,
    active: Option<NodeId>,
}

impl ActiveLinkProjection {
    pub fn new(links: Vec<NavLink>, sections: HashMap<NodeId, String>) -> Self {
        Self {
            links,
            sections,
            active: None,
        }
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn apply(&mut self, entries: &[IntersectionEntry]) -> Vec<Mutation> {
        let mut out = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(section_id) = self.sections.get(&entry.target) else {
                continue;
            };

            out.extend(self.links.iter().map(|link| Mutation::RemoveClass {
                node: link.node,
                class: ACTIVE.to_owned(),
            }));

            self.active = self
                .links
                .iter()
                .find(|link| link.target.as_deref() == Some(section_id.as_str()))
                .map(|link| link.node);

            if let Some(node) = self.active {
                out.push(Mutation::AddClass {
                    node,
                    class: ACTIVE.to_owned(),
                });
            }
        }
        out
    }
}

// ── Tracker ──

pub struct VisibilityTracker {
    reveal: Option<Rc<RefCell<RevealProjection>>>,
    active: Option<Rc<RefCell<ActiveLinkProjection>>>,
    degraded: bool,
}

impl VisibilityTracker {
    /// Register both observers. Each projection that cannot be observed is
    /// skipped; the other one still runs.
    pub fn install(
        surface: Rc<dyn Surface>,
        source: &dyn IntersectionSource,
        config: &PageConfig,
    ) -> Self {
        let mut degraded = false;
        let reveal = settle(
            "reveal animations",
            install_reveal(&surface, source, &config.reveal, &config.animated_selector),
            &mut degraded,
        );
        let active = settle(
            "active link highlighting",
            install_active_links(&surface, source, &config.active_link),
            &mut degraded,
        );
        Self {
            reveal,
            active,
            degraded,
        }
    }

    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.reveal
            .as_ref()
            .is_some_and(|r| r.borrow().is_revealed(node))
    }

    pub fn active_link(&self) -> Option<NodeId> {
        self.active.as_ref().and_then(|a| a.borrow().active())
    }

    /// True when the platform refused at least one observer.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

fn settle<T>(
    feature: &str,
    installed: Result<Option<T>, PortfolioError>,
    degraded: &mut bool,
) -> Option<T> {
    match installed {
        Ok(projection) => projection,
        Err(err) => {
            warn!("{} disabled: {}", feature, err);
            *degraded = true;
            None
        }
    }
}

fn apply_all(surface: &dyn Surface, mutations: Vec<Mutation>) {
    for mutation in mutations {
        surface.apply(mutation);
    }
}

fn install_reveal(
    surface: &Rc<dyn Surface>,
    source: &dyn IntersectionSource,
    options: &ObserverOptions,
    animated_selector: &str,
) -> Result<Option<Rc<RefCell<RevealProjection>>>, PortfolioError> {
    let mut targets = surface.query_all(SECTIONS);
    for node in surface.query_all(animated_selector) {
        if !targets.contains(&node) {
            targets.push(node);
        }
    }
    if targets.is_empty() {
        return Ok(None);
    }

    let projection = Rc::new(RefCell::new(RevealProjection::default()));
    let state = Rc::clone(&projection);
    let sink = Rc::clone(surface);
    source.observe(
        options,
        &targets,
        Box::new(move |entries: &[IntersectionEntry]| {
            let mutations = state.borrow_mut().apply(entries);
            apply_all(sink.as_ref(), mutations);
        }),
    )?;

    // Targets are hidden only once the observer has accepted them.
    for node in &targets {
        surface::add_class(surface.as_ref(), *node, REVEAL_PENDING);
    }
    debug!("observing {} elements for reveal", targets.len());
    Ok(Some(projection))
}

fn install_active_links(
    surface: &Rc<dyn Surface>,
    source: &dyn IntersectionSource,
    options: &ObserverOptions,
) -> Result<Option<Rc<RefCell<ActiveLinkProjection>>>, PortfolioError> {
    let sections: HashMap<NodeId, String> = surface
        .query_all(SECTIONS_WITH_ID)
        .into_iter()
        .filter_map(|node| Some((node, surface.attribute(node, "id")?)))
        .collect();
    if sections.is_empty() {
        return Ok(None);
    }
    let targets: Vec<NodeId> = surface.query_all(SECTIONS_WITH_ID);

    let links = surface
        .query_all(NAV_LINKS)
        .into_iter()
        .map(|node| NavLink {
            node,
            target: surface
                .attribute(node, "href")
                .and_then(|href| href.strip_prefix('#').map(str::to_owned)),
        })
        .collect();

    let projection = Rc::new(RefCell::new(ActiveLinkProjection::new(links, sections)));
    let state = Rc::clone(&projection);
    let sink = Rc::clone(surface);
    source.observe(
        options,
        &targets,
        Box::new(move |entries: &[IntersectionEntry]| {
            let mutations = state.borrow_mut().apply(entries);
            apply_all(sink.as_ref(), mutations);
        }),
    )?;
    Ok(Some(projection))
}
