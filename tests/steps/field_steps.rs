//! Behavioural steps for annotated field assignment.
#![expect(clippy::expect_used, reason = "simplify test failure output")]

use chronyconf::chrony::{ChronyConf, NAMESPACE};
use cucumber::{World, given, then, when};
use lineconf::fields::{FieldError, get_field, set_field};
use lineconf::value::FieldValue;

#[derive(Debug, Default, World)]
pub struct FieldWorld {
    record: Option<ChronyConf>,
    result: Option<Result<(), FieldError>>,
}

impl FieldWorld {
    fn assign(&mut self, key: &str, value: FieldValue) {
        let record = self.record.as_mut().expect("record set by a given step");
        self.result = Some(set_field(record, NAMESPACE, key, value));
    }
}

#[given("an empty chrony record")]
fn empty_record(world: &mut FieldWorld) {
    world.record = Some(ChronyConf::default());
}

#[when(regex = r#"^"([^"]+)" is assigned the text "(.*)"$"#)]
fn assigned_text(world: &mut FieldWorld, key: String, value: String) {
    world.assign(&key, FieldValue::Text(value));
}

#[when(regex = r#"^"([^"]+)" is assigned the number (\d+)$"#)]
fn assigned_number(world: &mut FieldWorld, key: String, value: u64) {
    world.assign(&key, FieldValue::Unsigned(value));
}

#[then("the assignment succeeds")]
fn assignment_succeeds(world: &mut FieldWorld) {
    match world.result.take() {
        Some(Ok(())) => {}
        other => panic!("expected success, got {other:?}"),
    }
}

#[then("the assignment fails because the field is not found")]
fn fails_not_found(world: &mut FieldWorld) {
    match world.result.take() {
        Some(Err(FieldError::NotFound { .. })) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[then("the assignment fails because of a type mismatch")]
fn fails_type_mismatch(world: &mut FieldWorld) {
    match world.result.take() {
        Some(Err(FieldError::TypeMismatch { .. })) => {}
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[then("the record is unchanged")]
fn record_unchanged(world: &mut FieldWorld) {
    assert_eq!(world.record.as_ref(), Some(&ChronyConf::default()));
}

#[then(regex = r#"^field "([^"]+)" reads "(.+)"$"#)]
fn field_reads(world: &mut FieldWorld, key: String, expected: String) {
    let record = world.record.as_ref().expect("record set by a given step");
    let value = get_field(record, NAMESPACE, &key).expect("field is bound");
    assert_eq!(value.map(|v| v.to_string()), Some(expected));
}
