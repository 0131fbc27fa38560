//! Form schema definition.
//!
//! `FormSchema` is the declarative description of a form: its title and an
//! ordered list of `FieldSpec`s. It is what configuration files carry, and it
//! is the only way a [`FormRegistry`] gets its fields.
//!
//! Typical usage:
//! ```
//! use contact_form::schema::FormSchema;
//!
//! let schema = FormSchema::from_toml_str(r#"
//!     title = "Feedback"
//!
//!     [[fields]]
//!     name = "comment"
//!     kind = "multiline"
//!     rules = [{ rule = "min_length", min = 10 }]
//! "#).unwrap();
//! let registry = schema.build().unwrap();
//! assert!(registry.contains("comment"));
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;
use crate::field::{Field, FieldKind, SelectOption, PLACEHOLDER_OPTION_ID};
use crate::registry::FormRegistry;
use crate::rules::{validate, Rule};

/// Declarative schema for a multi-field form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

/// Declarative description of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub options: Option<Vec<SelectOption>>,
    /// Initial value for textual fields. Select fields start on their first option.
    #[serde(default)]
    pub value: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            placeholder: None,
            rules: Vec::new(),
            options: None,
            value: String::new(),
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

    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    fn to_field(&self) -> Result<Field, SchemaError> {
        if let Some(rule) = self.rules.iter().find(|r| !r.applies_to(self.kind)) {
            return Err(SchemaError::RuleMismatch {
                field: self.name.clone(),
                rule: rule.name().to_string(),
                kind: self.kind,
            });
        }

        let mut field = match (self.kind, &self.options) {
            (FieldKind::Select, Some(options)) if !options.is_empty() => {
                Field::select(options.clone())
            }
            (FieldKind::Select, _) => return Err(SchemaError::MissingOptions(self.name.clone())),
            (kind, Some(_)) => {
                return Err(SchemaError::UnexpectedOptions {
                    name: self.name.clone(),
                    kind,
                })
            }
            (kind, None) => Field::textual(kind, self.value.clone()),
        };
        field.placeholder = self.placeholder.clone();
        field.rules = self.rules.clone();
        field.valid = validate(&field, &field.candidate());
        Ok(field)
    }
}

impl FormSchema {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// The built-in contact form.
    pub fn contact() -> Self {
        let interest = vec![
            SelectOption::plain(PLACEHOLDER_OPTION_ID, "Select one option"),
            SelectOption::plain(1, "Have an engineering team, want to augment 🤘"),
            SelectOption::plain(2, "Looking for a standalone product team 🧑‍🚀"),
            SelectOption::plain(3, "Still defining the team, looking for magic ⚡️"),
        ];
        Self::new(
            "Contact",
            vec![
                FieldSpec::new("name", FieldKind::Text)
                    .placeholder("Name")
                    .rule(Rule::MinLength { min: 2 }),
                FieldSpec::new("email", FieldKind::Email)
                    .placeholder("Email")
                    .rule(Rule::MinLength { min: 4 })
                    .rule(Rule::IsEmail),
                FieldSpec::new("interest", FieldKind::Select)
                    .options(interest)
                    .rule(Rule::ExcludesOptionId {
                        id: PLACEHOLDER_OPTION_ID,
                    }),
                FieldSpec::new("message", FieldKind::Multiline)
                    .placeholder("Message")
                    .rule(Rule::MinLength { min: 50 }),
            ],
        )
        .description("Tell us a bit about you and what you are looking for.")
    }

    pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Build the initial registry. Each field starts clean with its validity
    /// computed from the initial value.
    pub fn build(&self) -> Result<FormRegistry, SchemaError> {
        let mut seen = HashSet::new();
        let mut registry = FormRegistry::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateField(spec.name.clone()));
            }
            registry = registry.insert(spec.name.clone(), spec.to_field()?);
        }
        Ok(registry)
    }
}
