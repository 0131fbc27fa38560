//! Submission boundary.
//!
//! The controller hands a [`Submission`] to a [`Submitter`] once every field
//! passes validation. What happens next (a network call, a mail, a queue) is
//! the submitter's business.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::errors::SubmitError;
use crate::registry::FormRegistry;

/// Field name → submitted value, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Submission {
    values: IndexMap<String, String>,
}

impl Submission {
    pub fn from_registry(registry: &FormRegistry) -> Self {
        let values = registry
            .iter()
            .map(|(name, field)| (name.to_string(), field.value.clone()))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

/// External collaborator that receives validated submissions.
pub trait Submitter {
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError>;
}

impl<F> Submitter for F
where
    F: FnMut(&Submission) -> Result<(), SubmitError>,
{
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError> {
        self(submission)
    }
}

/// Stand-in for a real API call: logs the payload and succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubmitter;

impl Submitter for LogSubmitter {
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError> {
        info!(payload = %submission.to_json(), "Continue now");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_keeps_display_order() {
        let submission = Submission::from_registry(&FormRegistry::contact());
        let json = serde_json::to_string(&submission).expect("serialize");
        let name_at = json.find("\"name\"").expect("name key");
        let message_at = json.find("\"message\"").expect("message key");
        assert!(name_at < message_at);
        assert_eq!(submission.len(), 4);
        assert_eq!(submission.get("interest"), Some("Select one option"));
    }

    #[test]
    fn to_json_is_a_flat_object_of_strings() {
        let submission = Submission::from_registry(&FormRegistry::contact());
        let json = submission.to_json();
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 4);
        assert_eq!(json["interest"], "Select one option");
        assert_eq!(json["name"], "");
        assert_eq!(
            object.keys().map(String::as_str).collect::<Vec<_>>(),
            ["name", "email", "interest", "message"]
        );
    }

    #[test]
    fn closures_are_submitters() {
        let mut calls = 0;
        let mut submitter = |s: &Submission| {
            calls += s.len();
            Ok::<(), SubmitError>(())
        };
        let submission = Submission::from_registry(&FormRegistry::contact());
        submitter.submit(&submission).expect("submit");
        assert_eq!(calls, 4);
    }

    #[test]
    fn log_submitter_accepts() {
        let submission = Submission::from_registry(&FormRegistry::contact());
        assert!(LogSubmitter.submit(&submission).is_ok());
    }
}
