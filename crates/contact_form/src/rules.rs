//! Validation engine.
//!
//! Rules are a closed set of tagged variants, each carrying its own typed
//! parameter. A field is valid when every one of its rules passes; a field
//! without rules is always valid.
//!
//! A rule that meets a candidate of the wrong shape (e.g. `MinLength` against
//! a chosen option) is *non-applicable* and does not fail. Schemas are checked
//! up front (`FormSchema::build`) so registry fields never hit that case; the
//! fallback only matters for callers validating ad-hoc candidates.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::field::{Field, FieldKind, SelectOption};

lazy_static! {
    /// Loose structural check: `x@y.z` with no whitespace in the parts.
    /// Deliberately not RFC 5322.
    static ref EMAIL_PATTERN: Regex = Regex::new(r"\S+@\S+\.\S+").expect("static email pattern");
}

/// A named validation predicate with its parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Text must be at least `min` characters long.
    MinLength { min: usize },
    /// Text must look like an e-mail address.
    IsEmail,
    /// The chosen option must not be the one with this id.
    ExcludesOptionId { id: i64 },
}

/// The value a rule is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate<'a> {
    Text(&'a str),
    Choice(SelectOption),
}

impl Rule {
    /// Stable rule name (matches the serde tag).
    pub fn name(&self) -> &'static str {
        match self {
            Rule::MinLength { .. } => "min_length",
            Rule::IsEmail => "is_email",
            Rule::ExcludesOptionId { .. } => "excludes_option_id",
        }
    }

    /// Whether this rule can ever apply to values of the given field kind.
    pub fn applies_to(&self, kind: FieldKind) -> bool {
        match self {
            Rule::MinLength { .. } | Rule::IsEmail => kind.is_textual(),
            Rule::ExcludesOptionId { .. } => kind == FieldKind::Select,
        }
    }

    /// Check a candidate. `None` means the rule does not apply to it.
    pub fn check(&self, candidate: &Candidate<'_>) -> Option<bool> {
        match (self, candidate) {
            (Rule::MinLength { min }, Candidate::Text(text)) => {
                Some(text.chars().count() >= *min)
            }
            (Rule::IsEmail, Candidate::Text(text)) => Some(is_email(text)),
            (Rule::ExcludesOptionId { id }, Candidate::Choice(option)) => {
                Some(option.selection_id != *id)
            }
            _ => None,
        }
    }
}

/// Loose e-mail shape check (see [`Rule::IsEmail`]).
pub fn is_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// Validate `candidate` against all rules of `field`.
pub fn validate(field: &Field, candidate: &Candidate<'_>) -> bool {
    field.rules.iter().all(|rule| match rule.check(candidate) {
        Some(passed) => passed,
        None => {
            trace!(rule = rule.name(), "rule not applicable to candidate, skipping");
            true
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field(rules: Vec<Rule>) -> Field {
        rules
            .into_iter()
            .fold(Field::textual(FieldKind::Text, ""), Field::rule)
    }

    #[test]
    fn min_length_is_inclusive() {
        let field = text_field(vec![Rule::MinLength { min: 2 }]);
        assert!(!validate(&field, &Candidate::Text("")));
        assert!(!validate(&field, &Candidate::Text("a")));
        assert!(validate(&field, &Candidate::Text("ab")));
        assert!(validate(&field, &Candidate::Text("abc")));
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let field = text_field(vec![Rule::MinLength { min: 2 }]);
        // Two bytes, one character.
        assert!(!validate(&field, &Candidate::Text("é")));
        assert!(validate(&field, &Candidate::Text("éé")));
    }

    #[test]
    fn email_shape() {
        assert!(is_email("a@b.co"));
        assert!(is_email("x@y.com"));
        assert!(!is_email("a@b"));
        assert!(!is_email("ab.co"));
        assert!(!is_email(""));
        assert!(!is_email("a @b.co"));
    }

    #[test]
    fn excludes_option_id() {
        let field = Field::select(vec![
            SelectOption::plain(0, "pick"),
            SelectOption::plain(2, "two"),
        ])
        .rule(Rule::ExcludesOptionId { id: 0 });
        assert!(!validate(&field, &Candidate::Choice(SelectOption::plain(0, "pick"))));
        assert!(validate(&field, &Candidate::Choice(SelectOption::plain(2, "two"))));
    }

    #[test]
    fn rules_are_and_combined() {
        let field = text_field(vec![Rule::MinLength { min: 10 }, Rule::IsEmail]);
        assert!(!validate(&field, &Candidate::Text("a@b.co")));
        assert!(validate(&field, &Candidate::Text("someone@b.co")));
    }

    #[test]
    fn no_rules_is_always_valid() {
        let field = text_field(vec![]);
        assert!(validate(&field, &Candidate::Text("")));
    }

    #[test]
    fn mismatched_candidates_do_not_fail() {
        let field = text_field(vec![Rule::MinLength { min: 5 }, Rule::IsEmail]);
        let choice = Candidate::Choice(SelectOption::plain(1, "x"));
        assert_eq!(Rule::MinLength { min: 5 }.check(&choice), None);
        assert!(validate(&field, &choice));

        let rule = Rule::ExcludesOptionId { id: 0 };
        assert_eq!(rule.check(&Candidate::Text("")), None);
    }

    #[test]
    fn rule_kind_compatibility() {
        assert!(Rule::IsEmail.applies_to(FieldKind::Multiline));
        assert!(!Rule::IsEmail.applies_to(FieldKind::Select));
        assert!(Rule::ExcludesOptionId { id: 0 }.applies_to(FieldKind::Select));
        assert!(!Rule::ExcludesOptionId { id: 0 }.applies_to(FieldKind::Text));
    }

    #[test]
    fn rules_deserialize_from_tagged_tables() {
        let rules: Vec<Rule> = serde_json::from_str(
            r#"[{"rule":"min_length","min":2},{"rule":"is_email"},{"rule":"excludes_option_id","id":0}]"#,
        )
        .expect("rules parse");
        assert_eq!(
            rules,
            vec![
                Rule::MinLength { min: 2 },
                Rule::IsEmail,
                Rule::ExcludesOptionId { id: 0 }
            ]
        );
    }
}
