//! Registry reducer.
//!
//! `reduce(&state, action)` is the only way a [`FormRegistry`] changes. It is a
//! pure transition function: the input snapshot is never touched and a new
//! snapshot is returned for every action, even when nothing changed.
//!
//! Policy:
//!   - No side effects beyond `tracing` output.
//!   - Never panics on unknown action kinds or unknown field names; both
//!     return the state unchanged.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::field::Field;
use crate::registry::FormRegistry;

/// Label and option id of a select field, always replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub label: String,
    pub selection_id: i64,
}

/// Transitions understood by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldAction {
    MarkFieldDirty {
        name: String,
    },
    MarkAllDirty,
    UpdateField {
        name: String,
        value: String,
        /// Present only when both `label` and `selection_id` were supplied.
        #[serde(default, flatten, skip_serializing_if = "Option::is_none")]
        selection: Option<Selection>,
    },
    SetFieldValidity {
        name: String,
        valid: bool,
    },
    /// Any action kind this reducer does not know.
    #[serde(other)]
    Unknown,
}

impl FieldAction {
    pub fn mark_dirty(name: impl Into<String>) -> Self {
        FieldAction::MarkFieldDirty { name: name.into() }
    }

    pub fn update(name: impl Into<String>, value: impl Into<String>) -> Self {
        FieldAction::UpdateField {
            name: name.into(),
            value: value.into(),
            selection: None,
        }
    }

    pub fn select(
        name: impl Into<String>,
        value: impl Into<String>,
        label: impl Into<String>,
        selection_id: i64,
    ) -> Self {
        FieldAction::UpdateField {
            name: name.into(),
            value: value.into(),
            selection: Some(Selection {
                label: label.into(),
                selection_id,
            }),
        }
    }

    pub fn validity(name: impl Into<String>, valid: bool) -> Self {
        FieldAction::SetFieldValidity {
            name: name.into(),
            valid,
        }
    }
}

/// Reduce a single action into a new registry snapshot.
pub fn reduce(state: &FormRegistry, action: FieldAction) -> FormRegistry {
    trace!(?action, "reduce");
    match action {
        FieldAction::MarkFieldDirty { name } => state.with_field(&name, |f| Field {
            dirty: true,
            ..f.clone()
        }),
        FieldAction::MarkAllDirty => state.with_every_field(|f| Field {
            dirty: true,
            ..f.clone()
        }),
        FieldAction::UpdateField {
            name,
            value,
            selection,
        } => state.with_field(&name, |f| match selection {
            Some(Selection {
                label,
                selection_id,
            }) => Field {
                value,
                label,
                selection_id,
                ..f.clone()
            },
            None => Field { value, ..f.clone() },
        }),
        FieldAction::SetFieldValidity { name, valid } => {
            state.with_field(&name, |f| Field { valid, ..f.clone() })
        }
        FieldAction::Unknown => {
            warn!("ignoring unknown field action");
            state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NO_SELECTION;
    use pretty_assertions::assert_eq;

    #[test]
    fn mark_field_dirty_sets_flag() {
        let rs = FormRegistry::contact();
        let next = reduce(&rs, FieldAction::mark_dirty("email"));
        assert!(next.get("email").is_some_and(|f| f.dirty));
        assert!(next.get("name").is_some_and(|f| !f.dirty));
        // The old snapshot is untouched.
        assert!(rs.get("email").is_some_and(|f| !f.dirty));
    }

    #[test]
    fn mark_field_dirty_twice_is_noop() {
        let once = reduce(&FormRegistry::contact(), FieldAction::mark_dirty("name"));
        let twice = reduce(&once, FieldAction::mark_dirty("name"));
        assert_eq!(once, twice);
    }

    #[test]
    fn mark_all_dirty_is_idempotent() {
        let once = reduce(&FormRegistry::contact(), FieldAction::MarkAllDirty);
        let twice = reduce(&once, FieldAction::MarkAllDirty);
        assert!(once.iter().all(|(_, f)| f.dirty));
        assert_eq!(once, twice);
    }

    #[test]
    fn update_without_selection_keeps_label_and_id() {
        let rs = FormRegistry::contact();
        let next = reduce(&rs, FieldAction::update("interest", "raw value"));
        let before = rs.get("interest").expect("interest");
        let after = next.get("interest").expect("interest");
        assert_eq!(after.value, "raw value");
        assert_eq!(after.label, before.label);
        assert_eq!(after.selection_id, before.selection_id);
    }

    #[test]
    fn update_with_selection_replaces_pair() {
        let rs = FormRegistry::contact();
        let next = reduce(&rs, FieldAction::select("interest", "v", "L", 2));
        let after = next.get("interest").expect("interest");
        assert_eq!(
            (after.value.as_str(), after.label.as_str(), after.selection_id),
            ("v", "L", 2)
        );
    }

    #[test]
    fn text_update_keeps_sentinel_id() {
        let next = reduce(&FormRegistry::contact(), FieldAction::update("name", "Ada"));
        let name = next.get("name").expect("name");
        assert_eq!(name.value, "Ada");
        assert_eq!(name.selection_id, NO_SELECTION);
        assert_eq!(name.label, "");
    }

    #[test]
    fn set_validity_replaces_flag() {
        let next = reduce(&FormRegistry::contact(), FieldAction::validity("message", true));
        assert!(next.get("message").is_some_and(|f| f.valid));
        let again = reduce(&next, FieldAction::validity("message", false));
        assert!(again.get("message").is_some_and(|f| !f.valid));
    }

    #[test]
    fn unknown_field_leaves_state_unchanged() {
        let rs = FormRegistry::contact();
        assert_eq!(reduce(&rs, FieldAction::mark_dirty("phone")), rs);
        assert_eq!(reduce(&rs, FieldAction::update("phone", "123")), rs);
    }

    #[test]
    fn unknown_action_kind_leaves_state_unchanged() {
        let action: FieldAction =
            serde_json::from_str(r#"{"type":"reset_everything"}"#).expect("parse");
        assert_eq!(action, FieldAction::Unknown);
        let rs = FormRegistry::contact();
        assert_eq!(reduce(&rs, action), rs);
    }

    #[test]
    fn half_a_selection_is_dropped_on_parse() {
        let action: FieldAction = serde_json::from_str(
            r#"{"type":"update_field","name":"interest","value":"v","label":"only label"}"#,
        )
        .expect("parse");
        assert_eq!(action, FieldAction::update("interest", "v"));

        let full: FieldAction = serde_json::from_str(
            r#"{"type":"update_field","name":"interest","value":"v","label":"L","selection_id":3}"#,
        )
        .expect("parse");
        assert_eq!(full, FieldAction::select("interest", "v", "L", 3));
    }
}
