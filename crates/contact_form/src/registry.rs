//! Field registry: the ordered snapshot of every field of a form.
//!
//! A `FormRegistry` is a plain value. The reducer never mutates one in place;
//! it derives a new snapshot through [`FormRegistry::with_field`] /
//! [`FormRegistry::with_every_field`], so an older snapshot stays intact for
//! comparison.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::field::Field;
use crate::schema::FormSchema;

/// Ordered mapping from field name to [`Field`]. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormRegistry {
    fields: IndexMap<String, Field>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in contact form (name, email, interest, message).
    pub fn contact() -> Self {
        FormSchema::contact()
            .build()
            .expect("built-in contact schema is consistent")
    }

    /// Append a field during construction. A repeated name replaces the
    /// earlier definition but keeps its position.
    pub fn insert(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Logical AND of every field's stored `valid` flag.
    pub fn all_valid(&self) -> bool {
        self.fields.values().all(|f| f.valid)
    }

    /// New snapshot in which `name` is replaced by `update(old)`.
    ///
    /// Unknown names leave the snapshot unchanged.
    pub fn with_field(&self, name: &str, update: impl FnOnce(&Field) -> Field) -> Self {
        let Some(current) = self.fields.get(name) else {
            warn!(field = name, "ignoring update for unknown field");
            return self.clone();
        };
        let replacement = update(current);
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| {
                let field = if k == name { replacement.clone() } else { v.clone() };
                (k.clone(), field)
            })
            .collect();
        Self { fields }
    }

    /// New snapshot with `update` applied to every field.
    pub fn with_every_field(&self, update: impl Fn(&Field) -> Field) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), update(v)))
            .collect();
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn contact_registry_order_matches_display_order() {
        let registry = FormRegistry::contact();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["name", "email", "interest", "message"]);
    }

    #[test]
    fn with_field_leaves_old_snapshot_untouched() {
        let before = FormRegistry::new().insert("name", Field::textual(FieldKind::Text, ""));
        let after = before.with_field("name", |f| Field {
            value: "Ada".into(),
            ..f.clone()
        });
        assert_eq!(before.get("name").map(|f| f.value.as_str()), Some(""));
        assert_eq!(after.get("name").map(|f| f.value.as_str()), Some("Ada"));
    }

    #[test]
    fn with_field_unknown_name_is_noop() {
        let before = FormRegistry::new().insert("name", Field::textual(FieldKind::Text, ""));
        let after = before.with_field("nope", |f| Field {
            dirty: true,
            ..f.clone()
        });
        assert_eq!(before, after);
    }

    #[test]
    fn all_valid_is_and_of_flags() {
        let mut invalid = Field::textual(FieldKind::Text, "");
        invalid.valid = false;
        let registry = FormRegistry::new()
            .insert("a", Field::textual(FieldKind::Text, ""))
            .insert("b", invalid);
        assert!(!registry.all_valid());
        assert!(FormRegistry::new().all_valid());
    }
}
