//! BDD step definitions for request validation feature

use cucumber::gherkin::Step;
use cucumber::{then, when};

use alarm_relay::validation::validate_request;

use crate::world::RelayWorld;

#[when("an empty body is validated")]
fn validate_empty(world: &mut RelayWorld) {
    world.validation_result = Some(validate_request(b""));
}

#[when("this body is validated:")]
fn validate_docstring(world: &mut RelayWorld, step: &Step) {
    let body = step.docstring.as_deref().expect("step needs a doc string");
    world.validation_result = Some(validate_request(body.as_bytes()));
}

#[then(expr = "validation fails with {string}")]
fn validation_fails(world: &mut RelayWorld, message: String) {
    let result = world.validation_result.as_ref().expect("no validation result");
    match result {
        Err(e) => assert_eq!(e.to_string(), message),
        Ok(event) => panic!("expected validation failure, got {event:?}"),
    }
}

#[then(expr = "validation succeeds with {int} reading(s) and {int} recipient(s)")]
fn validation_succeeds(world: &mut RelayWorld, readings: usize, recipients: usize) {
    let result = world.validation_result.as_ref().expect("no validation result");
    let event = result.as_ref().expect("validation failed");
    assert_eq!(event.device_data.len(), readings);
    assert_eq!(event.recipients.len(), recipients);
}

#[then(expr = "the validated site name is {string}")]
fn validated_site_name(world: &mut RelayWorld, site_name: String) {
    let result = world.validation_result.as_ref().expect("no validation result");
    let event = result.as_ref().expect("validation failed");
    assert_eq!(event.site_name, site_name);
}
