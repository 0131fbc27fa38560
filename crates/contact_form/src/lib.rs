//! Core of the contact form widget.
//!
//! Layers, bottom to top:
//! - `field` / `rules`: field state and the validation engine
//! - `registry` / `reducer`: ordered field snapshots and their pure transitions
//! - `schema`: declarative form definitions (TOML / JSON)
//! - `controller`: input handling, the validation pass and the submit gate
//! - `submit`: the hand-off to whatever receives a valid form
//!
//! Nothing here touches a terminal; the TUI crate renders on top of it.

pub mod controller;
pub mod errors;
pub mod field;
pub mod reducer;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod submit;

pub use controller::{FieldInput, FieldStatus, FormController, InputEvent, SubmitEvent, SubmitOutcome};
pub use errors::{FormError, SchemaError, SubmitError};
pub use field::{Field, FieldKind, SelectOption};
pub use reducer::{reduce, FieldAction};
pub use registry::FormRegistry;
pub use rules::{validate, Rule};
pub use schema::{FieldSpec, FormSchema};
pub use submit::{LogSubmitter, Submission, Submitter};
