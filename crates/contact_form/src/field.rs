//! Field type & metadata.
//!
//! This module defines the declarative pieces of a single form input:
//! - `FieldKind`: enumeration of supported input widget types
//! - `SelectOption`: one selectable entry of a select field
//! - `Field`: the tracked state of one input (value, rules, dirty/valid flags)
//!
//! Mutation happens exclusively through the reducer (`reducer.rs`); the
//! helpers here only build fields or derive read-only views of them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::rules::{Candidate, Rule};

/// `selection_id` carried by every non-select field.
pub const NO_SELECTION: i64 = -1;

/// Id of the "nothing chosen yet" option of the built-in contact schema.
pub const PLACEHOLDER_OPTION_ID: i64 = 0;

/// A single input kind supported by the form.
///
/// Notes:
/// - Text / Email render as single-line editors
/// - Multiline accepts line breaks
/// - Select picks one entry out of `Field::options`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Multiline,
    Select,
}

impl FieldKind {
    /// Return true if this kind is edited as free text.
    pub fn is_textual(&self) -> bool {
        !matches!(self, FieldKind::Select)
    }
}

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOption {
    pub selection_id: i64,
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(selection_id: i64, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            selection_id,
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label equals its value.
    pub fn plain(selection_id: i64, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(selection_id, text.clone(), text)
    }
}

/// Tracked state of one form input.
///
/// `label` and `selection_id` are only meaningful for select fields. Text
/// fields keep an empty label and [`NO_SELECTION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub value: String,
    pub label: String,
    pub selection_id: i64,
    pub placeholder: Option<String>,
    pub rules: Vec<Rule>,
    pub kind: FieldKind,
    pub dirty: bool,
    pub valid: bool,
    pub options: Option<Vec<SelectOption>>,
}

impl Field {
    /// Create a textual field (text, email or multiline) with an initial value.
    pub fn textual(kind: FieldKind, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: String::new(),
            selection_id: NO_SELECTION,
            placeholder: None,
            rules: Vec::new(),
            kind,
            dirty: false,
            valid: true,
            options: None,
        }
    }

    /// Create a select field positioned on its first option.
    pub fn select(options: Vec<SelectOption>) -> Self {
        let (value, label, selection_id) = options
            .first()
            .map(|o| (o.value.clone(), o.label.clone(), o.selection_id))
            .unwrap_or_else(|| (String::new(), String::new(), NO_SELECTION));
        Self {
            value,
            label,
            selection_id,
            placeholder: None,
            rules: Vec::new(),
            kind: FieldKind::Select,
            dirty: false,
            valid: true,
            options: Some(options),
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The option currently chosen, as seen by the validation engine.
    pub fn current_option(&self) -> SelectOption {
        SelectOption::new(self.selection_id, self.value.clone(), self.label.clone())
    }

    /// The value the validation engine checks for this field.
    pub fn candidate(&self) -> Candidate<'_> {
        match self.kind {
            FieldKind::Select => Candidate::Choice(self.current_option()),
            _ => Candidate::Text(&self.value),
        }
    }

    /// Text shown to the user: the chosen label for selects, the value otherwise.
    pub fn display_text(&self) -> &str {
        match self.kind {
            FieldKind::Select => &self.label,
            _ => &self.value,
        }
    }

    /// Look up an offered option by id.
    pub fn option_by_id(&self, selection_id: i64) -> Option<&SelectOption> {
        self.options
            .as_deref()
            .and_then(|opts| opts.iter().find(|o| o.selection_id == selection_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interest_options() -> Vec<SelectOption> {
        vec![
            SelectOption::plain(0, "Select one option"),
            SelectOption::plain(1, "Augment"),
        ]
    }

    #[test]
    fn select_starts_on_first_option() {
        let field = Field::select(interest_options());
        assert_eq!(field.selection_id, 0);
        assert_eq!(field.label, "Select one option");
        assert_eq!(field.value, "Select one option");
    }

    #[test]
    fn textual_fields_carry_no_selection() {
        let field = Field::textual(FieldKind::Email, "");
        assert_eq!(field.selection_id, NO_SELECTION);
        assert!(field.options.is_none());
        assert!(matches!(field.candidate(), Candidate::Text("")));
    }

    #[test]
    fn select_candidate_is_the_chosen_option() {
        let field = Field::select(interest_options());
        match field.candidate() {
            Candidate::Choice(opt) => assert_eq!(opt.selection_id, 0),
            other => panic!("expected choice candidate, got {other:?}"),
        }
    }

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(FieldKind::Multiline.to_string(), "multiline");
        assert_eq!("select".parse::<FieldKind>().ok(), Some(FieldKind::Select));
    }
}
