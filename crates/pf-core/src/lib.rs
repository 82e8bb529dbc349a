//! Interactive behaviour of the portfolio page, independent of any browser.

pub mod app;
pub mod chrome;
pub mod config;
pub mod error;
pub mod form;
pub mod menu;
pub mod navbar;
pub mod notification;
pub mod router;
pub mod surface;
pub mod validate;
pub mod visibility;

#[cfg(test)]
mod testing;

pub use app::{Action, App, Collaborators, Dispatch, EventKind, HostEvent, ListenTarget, Listener};
pub use config::{NotificationTimings, PageConfig};
pub use error::{PortfolioError, Result};
pub use surface::{IntersectionCallback, IntersectionSource, Scheduler, Surface};
pub use validate::{validate, Validation};
