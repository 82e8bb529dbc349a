//! Composition root.
//!
//! [`App::mount`] builds every component against the injected collaborators
//! and records which browser events the host has to forward. The host attaches
//! one listener per [`Listener`] and calls [`App::dispatch`] with the recorded
//! [`Action`] whenever it fires.

use crate::chrome::PageChrome;
use crate::config::PageConfig;
use crate::error::Result;
use crate::form::ContactForm;
use crate::menu::MobileMenu;
use crate::navbar::Navbar;
use crate::notification::Notifier;
use crate::router::{RoutedLink, ScrollRouter};
use crate::surface::{IntersectionSource, Scheduler, Surface};
use crate::visibility::VisibilityTracker;
use pf_types::{FieldKind, NodeId, Severity};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

pub struct Collaborators {
    pub surface: Rc<dyn Surface>,
    pub scheduler: Rc<dyn Scheduler>,
    pub intersections: Rc<dyn IntersectionSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Click,
    Submit,
    Blur,
    Input,
    VisibilityChange,
    Load,
    Error,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Blur => "blur",
            EventKind::Input => "input",
            EventKind::VisibilityChange => "visibilitychange",
            EventKind::Load => "load",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget {
    Window,
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PageScrolled,
    FollowLink(RoutedLink),
    ToggleMenu,
    DocumentClicked,
    FieldBlurred(FieldKind),
    FieldEdited(FieldKind),
    FormSubmitted,
    VisibilityChanged,
    ImageLoaded(NodeId),
    ImageFailed(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub target: ListenTarget,
    pub event: EventKind,
    pub action: Action,
}

/// What the host knows about the event that fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostEvent {
    /// Node the event was dispatched to, if the surface knows it.
    pub target: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub prevent_default: bool,
}

pub struct App {
    notifier: Rc<Notifier>,
    navbar: Option<Navbar>,
    menu: Option<Rc<MobileMenu>>,
    router: ScrollRouter,
    form: Option<ContactForm>,
    tracker: VisibilityTracker,
    chrome: PageChrome,
    listeners: Vec<Listener>,
}

impl App {
    pub fn mount(collaborators: Collaborators, config: PageConfig) -> Self {
        let Collaborators {
            surface,
            scheduler,
            intersections,
        } = collaborators;
        let mut listeners = Vec::new();
        let mut listen = |target, event, action| {
            listeners.push(Listener {
                target,
                event,
                action,
            })
        };

        let chrome = PageChrome::new(
            Rc::clone(&surface),
            config.title_visible.clone(),
            config.title_hidden.clone(),
        );
        chrome.inject_styles();

        let navbar = Navbar::bind(Rc::clone(&surface), config.scrolled_threshold);
        match navbar {
            Some(_) => listen(ListenTarget::Window, EventKind::Scroll, Action::PageScrolled),
            None => debug!("no navbar on page"),
        }

        let menu = MobileMenu::bind(Rc::clone(&surface)).map(Rc::new);
        match &menu {
            Some(menu) => {
                listen(
                    ListenTarget::Node(menu.trigger()),
                    EventKind::Click,
                    Action::ToggleMenu,
                );
                listen(ListenTarget::Document, EventKind::Click, Action::DocumentClicked);
            }
            None => debug!("no mobile menu on page"),
        }

        let router = ScrollRouter::new(Rc::clone(&surface), menu.clone(), config.navbar_offset);
        for link in router.links() {
            listen(
                ListenTarget::Node(link.node),
                EventKind::Click,
                Action::FollowLink(link),
            );
        }

        let notifier = Rc::new(Notifier::new(
            Rc::clone(&surface),
            Rc::clone(&scheduler),
            config.notification,
        ));
        let form = ContactForm::bind(
            Rc::clone(&surface),
            scheduler,
            Rc::clone(&notifier),
            &config,
        );
        match &form {
            Some(form) => {
                listen(
                    ListenTarget::Node(form.form()),
                    EventKind::Submit,
                    Action::FormSubmitted,
                );
                for (kind, input) in form.inputs() {
                    listen(ListenTarget::Node(input), EventKind::Blur, Action::FieldBlurred(kind));
                    listen(ListenTarget::Node(input), EventKind::Input, Action::FieldEdited(kind));
                }
            }
            None => debug!("no contact form on page"),
        }

        let tracker = VisibilityTracker::install(Rc::clone(&surface), intersections.as_ref(), &config);

        chrome.open_external_links();
        for img in chrome.prepare_images() {
            listen(ListenTarget::Node(img), EventKind::Load, Action::ImageLoaded(img));
            listen(ListenTarget::Node(img), EventKind::Error, Action::ImageFailed(img));
        }
        listen(
            ListenTarget::Document,
            EventKind::VisibilityChange,
            Action::VisibilityChanged,
        );

        info!("portfolio page initialised");
        Self {
            notifier,
            navbar,
            menu,
            router,
            form,
            tracker,
            chrome,
            listeners,
        }
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn dispatch(&self, action: Action, event: &HostEvent) -> Dispatch {
        debug!("dispatch {:?}", action);
        let prevent_default = match action {
            Action::PageScrolled => {
                if let Some(navbar) = &self.navbar {
                    navbar.on_scroll();
                }
                false
            }
            Action::FollowLink(link) => self.router.activate(link),
            Action::ToggleMenu => {
                if let Some(menu) = &self.menu {
                    menu.toggle();
                }
                false
            }
            Action::DocumentClicked => {
                if let Some(menu) = &self.menu {
                    menu.on_document_click(event.target);
                }
                false
            }
            Action::FieldBlurred(kind) => {
                if let Some(form) = &self.form {
                    form.on_blur(kind);
                }
                false
            }
            Action::FieldEdited(kind) => {
                if let Some(form) = &self.form {
                    form.on_input(kind);
                }
                false
            }
            Action::FormSubmitted => {
                if let Some(form) = &self.form {
                    let outcome = form.submit();
                    debug!("submit outcome {:?}", outcome);
                }
                true
            }
            Action::VisibilityChanged => {
                self.chrome.on_visibility_change();
                false
            }
            Action::ImageLoaded(img) => {
                self.chrome.on_image_load(img);
                false
            }
            Action::ImageFailed(img) => {
                self.chrome.on_image_error(img);
                false
            }
        };
        Dispatch { prevent_default }
    }

    /// Show a toast outside of any form flow.
    pub fn notify(&self, message: &str, severity: Severity) -> Result<NodeId> {
        self.notifier.show(message, severity)
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_deref()
    }

    pub fn form(&self) -> Option<&ContactForm> {
        self.form.as_ref()
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }
}
