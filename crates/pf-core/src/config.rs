//! Page configuration.
//!
//! Every tunable constant of the page lives here. The browser host may
//! override any subset from an embedded JSON block; omitted keys keep
//! their defaults.

use crate::error::Result;
use pf_types::ObserverOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Height of the fixed navigation bar, subtracted from scroll targets.
    pub navbar_offset: f64,
    /// Scroll offset past which the navbar gets the `scrolled` class.
    pub scrolled_threshold: f64,
    pub reveal: ObserverOptions,
    pub active_link: ObserverOptions,
    /// Extra elements (besides every `section`) that animate in on scroll.
    pub animated_selector: String,
    pub submit_delay_ms: u64,
    pub sending_label: String,
    pub success_message: String,
    pub notification: NotificationTimings,
    pub title_visible: String,
    pub title_hidden: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationTimings {
    pub enter_ms: u64,
    pub visible_ms: u64,
    pub exit_ms: u64,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            enter_ms: 100,
            visible_ms: 5_000,
            exit_ms: 300,
        }
    }
}

impl NotificationTimings {
    pub fn enter(&self) -> Duration {
        Duration::from_millis(self.enter_ms)
    }

    pub fn visible(&self) -> Duration {
        Duration::from_millis(self.visible_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn total(&self) -> Duration {
        self.visible() + self.exit()
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar_offset: 80.0,
            scrolled_threshold: 100.0,
            reveal: ObserverOptions {
                threshold: 0.1,
                root_margin: "0px 0px -50px 0px".to_owned(),
            },
            active_link: ObserverOptions {
                threshold: 0.3,
                root_margin: "-80px 0px -80px 0px".to_owned(),
            },
            animated_selector: ".skill-category, .portfolio-card, .timeline-item, .achievement-item"
                .to_owned(),
            submit_delay_ms: 2_000,
            sending_label: "Sending...".to_owned(),
            success_message: "Message sent successfully! I'll get back to you soon.".to_owned(),
            notification: NotificationTimings::default(),
            title_visible: "Selvamani K - API Technical Writer".to_owned(),
            title_hidden: "Come back! - Selvamani K".to_owned(),
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}
