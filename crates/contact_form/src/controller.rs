//! Form controller.
//!
//! Owns the current registry snapshot plus the form-level flags (`form_dirty`,
//! `all_valid`, `loading`) and turns input events into reducer actions.
//!
//! Flow for a keystroke:
//!   input event -> `handle_update_field` -> `MarkFieldDirty` (first edit only)
//!   -> `UpdateField` -> `handle_validate_all_fields` -> `SetFieldValidity` per
//!   field -> aggregate flag.
//!
//! Every dispatch is applied synchronously, so a read right after a dispatch
//! already sees the new snapshot. The submit gate relies on that: it uses the
//! aggregate returned by its own validation pass instead of the stored flag.

use std::fmt;

use strum::Display;
use tracing::{debug, error, info, warn};

use crate::errors::{FormError, SchemaError, SubmitError};
use crate::field::{FieldKind, SelectOption};
use crate::reducer::{reduce, FieldAction};
use crate::registry::FormRegistry;
use crate::rules::validate;
use crate::schema::FormSchema;
use crate::submit::{LogSubmitter, Submission, Submitter};

/// Submit button text while idle.
pub const SUBMIT_IDLE_LABEL: &str = "SUBMIT";
/// Submit button text while a submission is in flight.
pub const SUBMIT_PENDING_LABEL: &str = "...";

/// Visual state of one field, rendered as a class-like token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FieldStatus {
    #[strum(serialize = "")]
    None,
    #[strum(serialize = "valid")]
    Valid,
    #[strum(serialize = "error")]
    Error,
}

/// A raw input event: the name and current value of the edited input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub name: String,
    pub value: String,
}

impl InputEvent {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// What `handle_update_field` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Text edit coming from an input element.
    Event(InputEvent),
    /// An option picked in a select field.
    Selection { name: String, option: SelectOption },
}

impl From<InputEvent> for FieldInput {
    fn from(event: InputEvent) -> Self {
        FieldInput::Event(event)
    }
}

impl FieldInput {
    pub fn selection(name: impl Into<String>, option: SelectOption) -> Self {
        FieldInput::Selection {
            name: name.into(),
            option,
        }
    }

    fn name(&self) -> &str {
        match self {
            FieldInput::Event(e) => &e.name,
            FieldInput::Selection { name, .. } => name,
        }
    }
}

/// The submit trigger. Its default action is always suppressed by the controller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of [`FormController::try_submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// At least one field is invalid; nothing was submitted.
    Blocked,
    /// The submitter accepted the submission.
    Submitted,
    /// The submitter was called and failed.
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

pub struct FormController {
    registry: FormRegistry,
    form_dirty: bool,
    all_valid: bool,
    loading: bool,
    submitter: Box<dyn Submitter + Send>,
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("registry", &self.registry)
            .field("form_dirty", &self.form_dirty)
            .field("all_valid", &self.all_valid)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl FormController {
    pub fn new(registry: FormRegistry, submitter: impl Submitter + Send + 'static) -> Self {
        Self {
            registry,
            form_dirty: false,
            all_valid: false,
            loading: false,
            submitter: Box::new(submitter),
        }
    }

    pub fn from_schema(
        schema: &FormSchema,
        submitter: impl Submitter + Send + 'static,
    ) -> Result<Self, SchemaError> {
        Ok(Self::new(schema.build()?, submitter))
    }

    /// The built-in contact form wired to the logging submitter.
    pub fn contact() -> Self {
        Self::new(FormRegistry::contact(), LogSubmitter)
    }

    pub fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    pub fn is_form_dirty(&self) -> bool {
        self.form_dirty
    }

    pub fn all_fields_valid(&self) -> bool {
        self.all_valid
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Apply an action and return the snapshot it replaced.
    pub fn dispatch(&mut self, action: FieldAction) -> FormRegistry {
        let next = reduce(&self.registry, action);
        std::mem::replace(&mut self.registry, next)
    }

    /// Status token for one field.
    ///
    /// Stays `None` until both the form *and* the field are dirty. A field
    /// edited before the first submit attempt therefore still reports `None`.
    pub fn classify(&self, name: &str) -> FieldStatus {
        let Some(field) = self.registry.get(name) else {
            warn!(field = name, "classify called for unknown field");
            return FieldStatus::None;
        };
        if !self.form_dirty && !field.dirty {
            return FieldStatus::None;
        }
        if self.form_dirty && field.dirty {
            return if field.valid {
                FieldStatus::Valid
            } else {
                FieldStatus::Error
            };
        }
        FieldStatus::None
    }

    /// Route an input event into the registry.
    pub fn handle_update_field(&mut self, input: impl Into<FieldInput>) -> Result<(), FormError> {
        let input = input.into();
        let name = input.name().to_string();
        let field = self
            .registry
            .get(&name)
            .ok_or_else(|| FormError::UnknownField(name.clone()))?;

        let action = match input {
            FieldInput::Event(InputEvent { name, value }) => FieldAction::update(name, value),
            FieldInput::Selection { name, option } => {
                if field.kind != FieldKind::Select {
                    return Err(FormError::NotSelectable {
                        name,
                        kind: field.kind,
                    });
                }
                // Store the registry's option, not the caller's copy of it.
                let Some(known) = field.option_by_id(option.selection_id) else {
                    return Err(FormError::UnknownOption {
                        name,
                        selection_id: option.selection_id,
                    });
                };
                FieldAction::select(
                    name,
                    known.value.clone(),
                    known.label.clone(),
                    known.selection_id,
                )
            }
        };

        if !self.form_dirty && !field.dirty {
            self.dispatch(FieldAction::mark_dirty(name.clone()));
        }
        self.dispatch(action);
        Ok(())
    }

    /// Validate every field in display order, store each result and the
    /// aggregate, and return the aggregate.
    pub fn handle_validate_all_fields(&mut self) -> bool {
        let results: Vec<(String, bool)> = self
            .registry
            .iter()
            .map(|(name, field)| (name.to_string(), validate(field, &field.candidate())))
            .collect();

        let mut all_valid = true;
        for (name, valid) in results {
            all_valid = all_valid && valid;
            self.dispatch(FieldAction::validity(name, valid));
        }
        self.all_valid = all_valid;
        all_valid
    }

    /// Submit gate. Marks everything dirty, validates, and only calls the
    /// submitter when every field passes.
    pub fn try_submit(&mut self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();
        self.loading = true;
        let was_dirty = self.form_dirty;
        self.form_dirty = true;
        self.dispatch(FieldAction::MarkAllDirty);

        let all_valid = self.handle_validate_all_fields();
        if !all_valid {
            self.loading = false;
            info!(was_dirty, "submission blocked, form has invalid fields");
            return SubmitOutcome::Blocked;
        }

        let submission = Submission::from_registry(&self.registry);
        let result = self.submitter.submit(&submission);
        self.loading = false;
        match result {
            Ok(()) => {
                debug!(fields = submission.len(), "submission accepted");
                SubmitOutcome::Submitted
            }
            Err(err) => {
                error!(%err, "submission failed");
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Whether the form-level error banner should be visible.
    pub fn show_error_banner(&self) -> bool {
        self.form_dirty && !self.all_valid
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            SUBMIT_PENDING_LABEL
        } else {
            SUBMIT_IDLE_LABEL
        }
    }
}
