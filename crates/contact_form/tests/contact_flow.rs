//! End-to-end flows through the contact form controller:
//! - Submitting an untouched form is blocked
//! - A correctly filled form submits exactly once
//! - Field status tokens only appear once the form has been submitted
//! - Forms built from a TOML schema behave like the built-in one

use std::sync::{Arc, Mutex};

use contact_form::{
    FieldInput, FieldStatus, FormController, FormRegistry, FormSchema, InputEvent, SelectOption,
    SubmitError, SubmitEvent, SubmitOutcome, Submission,
};

type Inbox = Arc<Mutex<Vec<Submission>>>;

fn controller_with_inbox(registry: FormRegistry) -> (FormController, Inbox) {
    let inbox: Inbox = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&inbox);
    let controller = FormController::new(registry, move |s: &Submission| {
        sink.lock().expect("inbox lock").push(s.clone());
        Ok::<(), SubmitError>(())
    });
    (controller, inbox)
}

fn interest_option(controller: &FormController, id: i64) -> SelectOption {
    controller
        .registry()
        .get("interest")
        .and_then(|f| f.option_by_id(id))
        .cloned()
        .expect("interest option")
}

fn type_into(controller: &mut FormController, name: &str, value: &str) {
    controller
        .handle_update_field(InputEvent::new(name, value))
        .expect("known field");
    controller.handle_validate_all_fields();
}

#[test]
fn untouched_form_is_blocked() {
    let (mut c, inbox) = controller_with_inbox(FormRegistry::contact());
    let mut event = SubmitEvent::new();

    assert!(matches!(c.try_submit(&mut event), SubmitOutcome::Blocked));
    assert!(event.default_prevented());
    assert!(inbox.lock().expect("inbox lock").is_empty());

    assert!(c.show_error_banner());
    for name in ["name", "email", "interest", "message"] {
        assert_eq!(c.classify(name), FieldStatus::Error, "{name}");
    }
}

#[test]
fn valid_form_submits_once() {
    let (mut c, inbox) = controller_with_inbox(FormRegistry::contact());

    type_into(&mut c, "name", "Ada Lovelace");
    type_into(&mut c, "email", "x@y.com");
    let option = interest_option(&c, 2);
    c.handle_update_field(FieldInput::selection("interest", option))
        .expect("select");
    type_into(
        &mut c,
        "message",
        "We would like to talk about building an analytical engine together.",
    );

    let outcome = c.try_submit(&mut SubmitEvent::new());
    assert!(outcome.is_submitted());
    assert!(!c.show_error_banner());
    assert_eq!(c.submit_label(), "SUBMIT");

    let inbox = inbox.lock().expect("inbox lock");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].get("email"), Some("x@y.com"));
    assert_eq!(
        inbox[0].get("interest"),
        Some("Looking for a standalone product team 🧑‍🚀")
    );
}

#[test]
fn placeholder_option_blocks_submit() {
    let (mut c, inbox) = controller_with_inbox(FormRegistry::contact());
    type_into(&mut c, "name", "Ada");
    type_into(&mut c, "email", "ada@example.com");
    type_into(&mut c, "message", &"m".repeat(50));

    assert!(matches!(
        c.try_submit(&mut SubmitEvent::new()),
        SubmitOutcome::Blocked
    ));
    assert_eq!(c.classify("interest"), FieldStatus::Error);
    assert_eq!(c.classify("message"), FieldStatus::Valid);
    assert!(inbox.lock().expect("inbox lock").is_empty());
}

#[test]
fn short_name_after_submit_attempt_is_error() {
    let (mut c, _) = controller_with_inbox(FormRegistry::contact());
    c.try_submit(&mut SubmitEvent::new());

    type_into(&mut c, "name", "a");
    assert_eq!(c.classify("name"), FieldStatus::Error);
    assert_eq!(c.classify("name").to_string(), "error");

    type_into(&mut c, "name", "ab");
    assert_eq!(c.classify("name"), FieldStatus::Valid);
}

#[test]
fn status_stays_neutral_before_first_submit() {
    let (mut c, _) = controller_with_inbox(FormRegistry::contact());
    type_into(&mut c, "name", "a");
    type_into(&mut c, "email", "not-an-email");

    assert!(!c.is_form_dirty());
    assert!(!c.show_error_banner());
    assert_eq!(c.classify("name"), FieldStatus::None);
    assert_eq!(c.classify("email").to_string(), "");
}

#[test]
fn toml_schema_drives_the_controller() {
    let schema = FormSchema::from_toml_str(
        r#"
        title = "Newsletter"

        [[fields]]
        name = "email"
        kind = "email"
        rules = [{ rule = "is_email" }]
        "#,
    )
    .expect("schema parses");
    let (mut c, inbox) = controller_with_inbox(schema.build().expect("schema builds"));

    type_into(&mut c, "email", "reader@news.example");
    assert!(c.try_submit(&mut SubmitEvent::new()).is_submitted());
    assert_eq!(inbox.lock().expect("inbox lock").len(), 1);
}
