//! BDD step definitions for tenant authorization feature

use cucumber::{given, then, when};

use alarm_relay::authorization::{AuthorizationOutcome, Authorizer, TenantAuthorizer};
use alarm_relay::RelayError;

use crate::steps::relay_steps::test_config;
use crate::world::{AuthorizationReply, RelayWorld};

#[given(expr = "the authorization API answers {int} with {string}")]
async fn api_answers(world: &mut RelayWorld, status: u16, body: String) {
    *world.http.authorization.write().await = AuthorizationReply::Respond { status, body };
}

#[given("the authorization API grants the tenant")]
async fn api_grants(world: &mut RelayWorld) {
    *world.http.authorization.write().await = AuthorizationReply::default();
}

#[given("the authorization API is unreachable")]
async fn api_unreachable(world: &mut RelayWorld) {
    *world.http.authorization.write().await = AuthorizationReply::Unreachable;
}

#[when("the tenant is authorized")]
async fn authorize(world: &mut RelayWorld) {
    let config = test_config();
    let authorizer = TenantAuthorizer::new(&config.authorization, world.http.clone());
    world.authorization_result = Some(authorizer.authorize().await);
}

#[then("authorization is granted")]
fn granted(world: &mut RelayWorld) {
    let result = world.authorization_result.as_ref().expect("no result");
    assert_eq!(result.as_ref().unwrap(), &AuthorizationOutcome::Granted);
}

#[then("authorization is denied")]
fn denied(world: &mut RelayWorld) {
    let result = world.authorization_result.as_ref().expect("no result");
    assert!(matches!(
        result.as_ref().unwrap(),
        AuthorizationOutcome::Denied(_)
    ));
}

#[then("authorization fails with a transport error")]
fn transport_error(world: &mut RelayWorld) {
    let result = world.authorization_result.as_ref().expect("no result");
    assert!(matches!(result, Err(RelayError::Http(_))));
}

#[then(expr = "the authorization request carries header {string} = {string}")]
async fn request_header(world: &mut RelayWorld, name: String, value: String) {
    let requests = world.http.authorization_requests().await;
    let request = requests.last().expect("no authorization request");
    assert!(
        request.params.contains(&(name.clone(), value.clone())),
        "header {name}={value} missing from {:?}",
        request.params
    );
}

#[then(expr = "the authorization probe has {string} = {string}")]
async fn probe_field(world: &mut RelayWorld, field: String, value: String) {
    let requests = world.http.authorization_requests().await;
    let request = requests.last().expect("no authorization request");
    let json = request.json.as_ref().expect("probe has no JSON body");
    let actual = match &json[&field] {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    assert_eq!(actual, value);
}
