//! Toast notifications.
//!
//! Each toast is built off-screen, slid in shortly after insertion, slid out
//! once its visible time is up and then removed. Toasts are independent: no
//! queueing, no dedup. Every delayed step re-checks that the toast is still
//! attached, so a toast removed by someone else is simply left alone.

use crate::config::NotificationTimings;
use crate::error::Result;
use crate::surface::{self, Scheduler, Surface};
use pf_types::{Mutation, NodeId, Severity};
use std::rc::Rc;
use tracing::debug;

const HIDDEN: &str = "translateX(100%)";
const SHOWN: &str = "translateX(0)";

pub struct Notifier {
    surface: Rc<dyn Surface>,
    scheduler: Rc<dyn Scheduler>,
    timings: NotificationTimings,
}

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "fa-check-circle",
        Severity::Error => "fa-exclamation-circle",
        Severity::Info => "fa-info-circle",
    }
}

fn background(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "var(--color-success)",
        Severity::Error => "var(--color-error)",
        Severity::Info => "var(--color-info)",
    }
}

impl Notifier {
    pub fn new(
        surface: Rc<dyn Surface>,
        scheduler: Rc<dyn Scheduler>,
        timings: NotificationTimings,
    ) -> Self {
        Self {
            surface,
            scheduler,
            timings,
        }
    }

    /// Insert a toast and start its lifecycle. Returns the toast node.
    pub fn show(&self, message: &str, severity: Severity) -> Result<NodeId> {
        let s = self.surface.as_ref();

        let toast = s.create_element("div")?;
        surface::add_class(s, toast, "notification");
        surface::add_class(s, toast, &format!("notification--{severity}"));

        let content = s.create_element("div")?;
        surface::add_class(s, content, "notification-content");
        let glyph = s.create_element("i")?;
        surface::add_class(s, glyph, "fas");
        surface::add_class(s, glyph, icon(severity));
        let text = s.create_element("span")?;
        surface::set_text(s, text, message);
        surface::append(s, Some(content), glyph);
        surface::append(s, Some(content), text);
        surface::append(s, Some(toast), content);

        let styles = [
            ("position", "fixed"),
            ("top", "100px"),
            ("right", "20px"),
            ("background", background(severity)),
            ("color", "var(--color-white)"),
            ("padding", "var(--space-16) var(--space-20)"),
            ("border-radius", "var(--radius-base)"),
            ("box-shadow", "var(--shadow-lg)"),
            ("z-index", "10000"),
            ("transform", HIDDEN),
            ("transition", "transform var(--duration-normal) var(--ease-standard)"),
            ("max-width", "350px"),
        ];
        for (property, value) in styles {
            surface::set_style(s, toast, property, value);
        }

        surface::append(s, None, toast);
        debug!("notification {} shown ({})", toast, severity);

        let shown = Rc::clone(&self.surface);
        self.scheduler.schedule(
            self.timings.enter(),
            Box::new(move || {
                if shown.is_attached(toast) {
                    surface::set_style(shown.as_ref(), toast, "transform", SHOWN);
                }
            }),
        );

        let hidden = Rc::clone(&self.surface);
        let scheduler = Rc::clone(&self.scheduler);
        let exit = self.timings.exit();
        self.scheduler.schedule(
            self.timings.visible(),
            Box::new(move || {
                if !hidden.is_attached(toast) {
                    return;
                }
                surface::set_style(hidden.as_ref(), toast, "transform", HIDDEN);
                let removed = Rc::clone(&hidden);
                scheduler.schedule(
                    exit,
                    Box::new(move || {
                        if removed.is_attached(toast) {
                            removed.apply(Mutation::Remove { node: toast });
                        }
                    }),
                );
            }),
        );

        Ok(toast)
    }
}
