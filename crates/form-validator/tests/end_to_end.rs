// crates/form-validator/tests/end_to_end.rs
// ============================================================================
// Test Module: Contact Form End To End
// Coverage: DSL-authored tree over enum identifiers with bound components.
// ============================================================================
//! ## Overview
//! A contact form requiring an email plus either phone number.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::fmt;
use std::rc::Rc;

use form_logic::parse_tree;
use form_validator::FieldCell;
use form_validator::FieldValue;
use form_validator::PredicateRule;
use form_validator::ValidationEvent;
use form_validator::ValidationResult;
use form_validator::ValidationSpec;
use form_validator::Validator;
use support::TestResult;
use support::ensure;

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Contact form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    /// Email address.
    Email,
    /// Primary phone.
    Phone,
    /// Alternate phone.
    AltPhone,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::AltPhone => "alt_phone",
        })
    }
}

/// Maps DSL names to fields.
fn field_named(name: &str) -> Option<Field> {
    [Field::Email, Field::Phone, Field::AltPhone].into_iter().find(|field| field.to_string() == name)
}

/// Accepts strings containing an `@`.
fn is_email(value: &FieldValue) -> bool {
    value.as_str().is_some_and(|text| text.contains('@'))
}

/// Accepts strings of at least seven digits.
fn is_phone(value: &FieldValue) -> bool {
    value.as_str().is_some_and(|text| {
        text.len() >= 7 && text.chars().all(|character| character.is_ascii_digit())
    })
}

/// Bound components of the contact form.
struct ContactForm {
    /// Validator under test.
    validator: Validator<Field>,
    /// Email component.
    email: Rc<FieldCell>,
    /// Primary phone component.
    phone: Rc<FieldCell>,
    /// Alternate phone component.
    alt_phone: Rc<FieldCell>,
}

/// Builds the contact form with `email && (phone || alt_phone)`.
fn contact_form() -> TestResult<ContactForm> {
    let mut validator = Validator::new();
    validator.add_validation(ValidationSpec::new(Field::Email, PredicateRule::new(is_email)))?;
    for field in [Field::Phone, Field::AltPhone] {
        validator.add_validation(
            ValidationSpec::new(field, PredicateRule::new(is_phone))
                .validate_on(ValidationEvent::END_EDITING),
        )?;
    }
    let tree = parse_tree("email && (phone || alt_phone)", &field_named)?;
    validator.set_tree(Some(tree))?;
    validator.check_tree()?;

    let email = Rc::new(FieldCell::new(""));
    let phone = Rc::new(FieldCell::new(""));
    let alt_phone = Rc::new(FieldCell::new(""));
    validator.set_component(&Field::Email, &email)?;
    validator.set_component(&Field::Phone, &phone)?;
    validator.set_component(&Field::AltPhone, &alt_phone)?;
    Ok(ContactForm {
        validator,
        email,
        phone,
        alt_phone,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Tests one valid phone satisfies the OR while the other stays untouched.
#[test]
fn email_and_either_phone_is_valid() -> TestResult {
    let mut form = contact_form()?;
    form.email.set_value("ada@example.com");
    form.alt_phone.set_value("5551234");

    ensure(form.validator.validate() == ValidationResult::VALID, "form valid")?;
    ensure(
        form.validator.result_of(&Field::Phone) == Some(ValidationResult::UNVALIDATED),
        "untouched phone stays unvalidated",
    )?;
    Ok(())
}

/// Tests an invalid alternate phone fails the form despite the OR.
#[test]
fn invalid_alternate_phone_fails_the_form() -> TestResult {
    let mut form = contact_form()?;
    form.email.set_value("ada@example.com");
    form.phone.set_value("5551234");
    form.alt_phone.set_value("call me");

    ensure(form.validator.validate() == ValidationResult::INVALID, "invalid absorbs")?;
    Ok(())
}

/// Tests an invalid alternate phone fails the form while the phone is untouched.
#[test]
fn invalid_alternate_phone_with_untouched_phone_fails() -> TestResult {
    let mut form = contact_form()?;
    form.email.set_value("ada@example.com");
    form.alt_phone.set_value("call me");

    ensure(form.validator.validate() == ValidationResult::INVALID, "invalid absorbs")?;
    ensure(
        form.validator.result_of(&Field::Phone) == Some(ValidationResult::UNVALIDATED),
        "phone unvalidated",
    )?;
    ensure(
        form.validator.result_of(&Field::AltPhone) == Some(ValidationResult::INVALID),
        "alternate phone invalid",
    )?;
    Ok(())
}

/// Tests the form stays invalid until an email is entered.
#[test]
fn missing_email_fails_the_form() -> TestResult {
    let mut form = contact_form()?;
    form.phone.set_value("5551234");
    ensure(form.validator.validate() == ValidationResult::INVALID, "email required")?;

    form.email.set_value("ada@example.com");
    form.validator.validate_unit(&Field::Email)?;
    ensure(form.validator.form_result() == ValidationResult::VALID, "re-folded to valid")?;
    Ok(())
}
