//! Contact form controller.
//!
//! Blur validates one field, input clears a stale error once the field has
//! content again, submit validates everything and either points the user at
//! the first problem or runs the simulated send: the submit button shows a
//! sending label while disabled, and after a fixed delay a success toast
//! appears, the form is reset and the button restored. Nothing is transmitted.

use crate::config::PageConfig;
use crate::notification::Notifier;
use crate::surface::{self, Scheduler, Surface};
use crate::validate::{validate, Validation};
use pf_types::{FieldKind, Mutation, NodeId, Severity};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const FORM_ID: &str = "contactForm";
pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub kind: FieldKind,
    pub value: String,
    pub error: Option<&'static str>,
    pub touched: bool,
}

impl FormField {
    fn blank(kind: FieldKind) -> Self {
        Self {
            kind,
            value: String::new(),
            error: None,
            touched: false,
        }
    }
}

/// Raw field values at the moment of submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormSnapshot {
    pub fn get(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Name => &self.name,
            FieldKind::Email => &self.email,
            FieldKind::Subject => &self.subject,
            FieldKind::Message => &self.message,
        }
    }

    fn slot(&mut self, kind: FieldKind) -> &mut String {
        match kind {
            FieldKind::Name => &mut self.name,
            FieldKind::Email => &mut self.email,
            FieldKind::Subject => &mut self.subject,
            FieldKind::Message => &mut self.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed; `first_error` was scrolled into view.
    Invalid { first_error: FieldKind },
    /// All fields passed and the simulated send is under way.
    Sending,
    /// A send is already in flight.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct FieldSlot {
    kind: FieldKind,
    input: Option<NodeId>,
    error: Option<NodeId>,
}

fn position(kind: FieldKind) -> usize {
    match kind {
        FieldKind::Name => 0,
        FieldKind::Email => 1,
        FieldKind::Subject => 2,
        FieldKind::Message => 3,
    }
}

#[derive(Debug)]
struct FormState {
    fields: [FormField; 4],
    sending: bool,
}

impl FormState {
    fn new() -> Self {
        Self {
            fields: FieldKind::ALL.map(FormField::blank),
            sending: false,
        }
    }

    fn field_mut(&mut self, kind: FieldKind) -> &mut FormField {
        &mut self.fields[position(kind)]
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

pub struct ContactForm {
    surface: Rc<dyn Surface>,
    scheduler: Rc<dyn Scheduler>,
    notifier: Rc<Notifier>,
    form: NodeId,
    slots: [FieldSlot; 4],
    state: Rc<RefCell<FormState>>,
    submit_delay: Duration,
    sending_label: String,
    success_message: String,
}

impl ContactForm {
    /// `None` when the page has no contact form.
    pub fn bind(
        surface: Rc<dyn Surface>,
        scheduler: Rc<dyn Scheduler>,
        notifier: Rc<Notifier>,
        config: &PageConfig,
    ) -> Option<Self> {
        let form = surface.by_id(FORM_ID)?;
        let slots = FieldKind::ALL.map(|kind| FieldSlot {
            kind,
            input: surface.by_id(kind.as_str()),
            error: surface.by_id(&format!("{kind}Error")),
        });

        Some(Self {
            surface,
            scheduler,
            notifier,
            form,
            slots,
            state: Rc::new(RefCell::new(FormState::new())),
            submit_delay: config.submit_delay(),
            sending_label: config.sending_label.clone(),
            success_message: config.success_message.clone(),
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    /// Inputs present on the page, for the host to attach blur/input to.
    pub fn inputs(&self) -> Vec<(FieldKind, NodeId)> {
        self.slots
            .iter()
            .filter_map(|slot| Some((slot.kind, slot.input?)))
            .collect()
    }

    pub fn field(&self, kind: FieldKind) -> FormField {
        self.state.borrow().fields[position(kind)].clone()
    }

    pub fn is_sending(&self) -> bool {
        self.state.borrow().sending
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let mut snapshot = FormSnapshot::default();
        for slot in &self.slots {
            if let Some(input) = slot.input {
                *snapshot.slot(slot.kind) = self.surface.value(input);
            }
        }
        snapshot
    }

    /// Validate one field's current value and paint the result.
    pub fn validate(&self, kind: FieldKind) -> Validation {
        let raw = self.slot(kind).input.map(|i| self.surface.value(i)).unwrap_or_default();
        self.check(kind, &raw)
    }

    pub fn on_blur(&self, kind: FieldKind) {
        let result = self.validate(kind);
        debug!("{} blurred: valid={}", kind, result.valid);
    }

    pub fn on_input(&self, kind: FieldKind) {
        let slot = self.slot(kind);
        let Some(input) = slot.input else {
            return;
        };
        let value = self.surface.value(input);
        {
            let mut state = self.state.borrow_mut();
            let field = state.field_mut(kind);
            field.value = value.clone();
            if value.trim().is_empty() || !self.surface.has_class(input, "error") {
                return;
            }
            field.error = None;
        }
        self.paint(slot, &Validation::OK);
    }

    pub fn submit(&self) -> SubmitOutcome {
        let snapshot = self.snapshot();
        self.submit_snapshot(&snapshot)
    }

    /// Validate every field present on the page against `snapshot`, then
    /// either scroll to the first failure or start the simulated send.
    pub fn submit_snapshot(&self, snapshot: &FormSnapshot) -> SubmitOutcome {
        if self.state.borrow().sending {
            debug!("submit ignored while sending");
            return SubmitOutcome::Ignored;
        }

        let mut first_error = None;
        for (kind, _) in self.inputs() {
            let result = self.check(kind, snapshot.get(kind));
            if !result.valid && first_error.is_none() {
                first_error = Some(kind);
            }
        }

        if let Some(kind) = first_error {
            if let Some(input) = self.slot(kind).input {
                self.surface.apply(Mutation::ScrollIntoView { node: input });
            }
            return SubmitOutcome::Invalid { first_error: kind };
        }

        self.start_sending();
        SubmitOutcome::Sending
    }

    fn start_sending(&self) {
        let s = self.surface.as_ref();
        let button = s.query_within(self.form, SUBMIT_BUTTON);
        let original_label = button.map(|b| s.text(b));
        if let Some(button) = button {
            surface::set_text(s, button, &self.sending_label);
            s.apply(Mutation::SetDisabled {
                node: button,
                disabled: true,
            });
        } else {
            warn!("contact form has no submit button");
        }
        self.state.borrow_mut().sending = true;
        info!("contact form submitted");

        let surface = Rc::clone(&self.surface);
        let notifier = Rc::clone(&self.notifier);
        let state = Rc::clone(&self.state);
        let form = self.form;
        let success = self.success_message.clone();
        self.scheduler.schedule(
            self.submit_delay,
            Box::new(move || {
                state.borrow_mut().sending = false;
                if !surface.is_attached(form) {
                    return;
                }
                if let Err(err) = notifier.show(&success, Severity::Success) {
                    warn!("could not show confirmation: {}", err);
                }
                surface.apply(Mutation::ResetForm { form });
                state.borrow_mut().reset();
                if let (Some(button), Some(label)) = (button, original_label) {
                    surface::set_text(surface.as_ref(), button, &label);
                    surface.apply(Mutation::SetDisabled {
                        node: button,
                        disabled: false,
                    });
                }
            }),
        );
    }

    fn slot(&self, kind: FieldKind) -> FieldSlot {
        self.slots[position(kind)]
    }

    fn check(&self, kind: FieldKind, raw: &str) -> Validation {
        let result = validate(kind, raw);
        {
            let mut state = self.state.borrow_mut();
            let field = state.field_mut(kind);
            field.value = raw.to_owned();
            field.touched = true;
            field.error = (!result.valid).then_some(result.message);
        }
        self.paint(self.slot(kind), &result);
        result
    }

    fn paint(&self, slot: FieldSlot, result: &Validation) {
        let s = self.surface.as_ref();
        if let Some(input) = slot.input {
            surface::toggle_class(s, input, "error", !result.valid);
        }
        if let Some(error) = slot.error {
            surface::set_text(s, error, result.message);
            surface::toggle_class(s, error, "show", !result.valid);
        }
    }
}
