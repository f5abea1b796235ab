//! Contact form validation and submission.
//!
//! ## Field rules
//!
//! Values are trimmed, then checked in order; the first failing rule wins:
//!
//! 1. required and empty → [`Invalid::Required`]
//! 2. field `email`, non-empty, not `local@domain.tld` → [`Invalid::Email`]
//! 3. field `phone`, non-empty, not `+`? followed by 8 or more of
//!    digits, spaces, `-`, `(`, `)` → [`Invalid::Phone`]
//!
//! A field is validated on blur, and again on every input while it is
//! showing an error, so the message disappears as soon as it is fixed.
//!
//! ## Submission
//!
//! ```text
//!            submit (all required valid)
//!   Idle ─────────────────────────────────▶ Submitting
//!    ▲                                        │     │
//!    │ banner timeout          delivered Ok   │     │  delivery Err
//!    │                                        ▼     ▼
//!    └──────────────────────────── Succeeded     Failed
//! ```
//!
//! Delivery goes through a [`Transport`]. The stock [`SimulatedTransport`]
//! reports success after a fixed delay; a host with a real endpoint returns
//! [`Delivery::Pending`] and dispatches the outcome later.

use super::hooks::ERROR;
use super::timers::Timer;
use super::{Ctx, Node};
use crate::config::MessagesConfig;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{8,}$").expect("phone pattern"));

/// Why a field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
    Required,
    Email,
    Phone,
}

impl Invalid {
    pub fn message(self, messages: &MessagesConfig) -> &str {
        match self {
            Invalid::Required => &messages.required,
            Invalid::Email => &messages.invalid_email,
            Invalid::Phone => &messages.invalid_phone,
        }
    }
}

/// Apply the field rules to one value.
pub fn check(name: &str, value: &str, required: bool) -> Result<(), Invalid> {
    let value = value.trim();
    if value.is_empty() {
        return if required { Err(Invalid::Required) } else { Ok(()) };
    }
    match name {
        "email" if !EMAIL.is_match(value) => Err(Invalid::Email),
        "phone" if !PHONE.is_match(value) => Err(Invalid::Phone),
        _ => Ok(()),
    }
}

/// Format a Swiss number for display: `0041791234567` → `+41 79 123 45 67`.
///
/// Anything whose digits don't start with the `41` country code is returned
/// unchanged.
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.strip_prefix("00").unwrap_or(&digits);
    if !digits.starts_with("41") {
        return phone.to_string();
    }
    let part = |from: usize, to: usize| digits.get(from..to.min(digits.len())).unwrap_or("");
    let groups = [part(0, 2), part(2, 4), part(4, 7), part(7, 9), part(9, digits.len())];
    format!("+{}", groups.join(" ").trim_end())
}

/// Static description of one form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
        }
    }
}

#[derive(Debug, Clone)]
struct Field {
    spec: FieldSpec,
    value: String,
    error: Option<Invalid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Field values handed to the transport, in form order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub fields: Vec<(String, String)>,
}

impl Submission {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// How a transport will report its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Succeeds after this delay; the page schedules the completion itself.
    Simulated(Duration),
    /// The host dispatches `UiEvent::SubmissionFinished` when done.
    Pending,
}

pub trait Transport {
    fn send(&mut self, submission: &Submission) -> Delivery;
}

/// Pretends to deliver the message. Nothing leaves the page.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Transport for SimulatedTransport {
    fn send(&mut self, submission: &Submission) -> Delivery {
        tracing::info!(fields = submission.fields.len(), "simulating contact form delivery");
        Delivery::Simulated(self.delay)
    }
}

#[derive(Debug)]
pub struct ContactForm {
    fields: Vec<Field>,
    state: SubmissionState,
    submit_label: String,
    messages: MessagesConfig,
    banner: Duration,
    banner_generation: u64,
}

impl ContactForm {
    pub fn new(
        fields: Vec<FieldSpec>,
        submit_label: impl Into<String>,
        messages: MessagesConfig,
        banner: Duration,
    ) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|spec| Field {
                    spec,
                    value: String::new(),
                    error: None,
                })
                .collect(),
            state: SubmissionState::Idle,
            submit_label: submit_label.into(),
            messages,
            banner,
            banner_generation: 0,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    /// Current error on a field, if it is showing one.
    pub fn error(&self, name: &str) -> Option<Invalid> {
        self.field(name).and_then(|f| f.error)
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.spec.name == name)
    }

    pub fn on_blur(&mut self, name: &str, cx: &mut Ctx<'_>) {
        if let Some(i) = self.index(name) {
            self.validate_field(i, cx);
        }
    }

    pub fn on_input(&mut self, name: &str, value: &str, cx: &mut Ctx<'_>) {
        let Some(i) = self.index(name) else {
            return;
        };
        self.fields[i].value = value.to_string();
        if self.fields[i].error.is_some() {
            self.validate_field(i, cx);
        }
    }

    /// Re-run the rules for one field and update its error presentation.
    fn validate_field(&mut self, i: usize, cx: &mut Ctx<'_>) -> bool {
        let field = &mut self.fields[i];
        let result = check(&field.spec.name, &field.value, field.spec.required);
        let node = Node::Field(field.spec.name.clone());
        let error_node = Node::FieldError(field.spec.name.clone());
        match result {
            Ok(()) => {
                if field.error.take().is_some() {
                    cx.view.set_class(&node, ERROR, false);
                    cx.view.set_visible(&error_node, false);
                }
                true
            }
            Err(invalid) => {
                field.error = Some(invalid);
                cx.view.set_class(&node, ERROR, true);
                cx.view.set_text(&error_node, invalid.message(&self.messages));
                cx.view.set_visible(&error_node, true);
                false
            }
        }
    }

    /// Validate every required field. All of them are checked so each one
    /// shows its own message.
    pub fn validate(&mut self, cx: &mut Ctx<'_>) -> bool {
        let mut valid = true;
        for i in 0..self.fields.len() {
            if self.fields[i].spec.required && !self.validate_field(i, cx) {
                valid = false;
            }
        }
        valid
    }

    /// Start a submission. Returns false when blocked by validation or by a
    /// submission already in flight.
    pub fn submit(&mut self, transport: &mut dyn Transport, cx: &mut Ctx<'_>) -> bool {
        if self.state == SubmissionState::Submitting {
            return false;
        }
        if !self.validate(cx) {
            tracing::debug!("contact form blocked by validation");
            return false;
        }
        self.state = SubmissionState::Submitting;
        cx.view.set_property(&Node::SubmitButton, "disabled", "true");
        cx.view.set_text(&Node::SubmitButton, &self.messages.sending);

        let submission = Submission {
            fields: self
                .fields
                .iter()
                .map(|f| (f.spec.name.clone(), f.value.trim().to_string()))
                .collect(),
        };
        match transport.send(&submission) {
            Delivery::Simulated(delay) => {
                cx.timers.schedule(delay, Timer::DeliveryComplete);
            }
            Delivery::Pending => {}
        }
        true
    }

    /// Apply the delivery outcome. Ignored unless a submission is in flight.
    pub fn finish(&mut self, result: Result<(), String>, cx: &mut Ctx<'_>) {
        if self.state != SubmissionState::Submitting {
            tracing::warn!("delivery result arrived with no submission in flight");
            return;
        }
        cx.view.set_visible(&Node::SuccessBanner, false);
        cx.view.set_visible(&Node::FailureBanner, false);
        match result {
            Ok(()) => {
                self.state = SubmissionState::Succeeded;
                cx.view.set_text(&Node::SuccessBanner, &self.messages.success);
                cx.view.set_visible(&Node::SuccessBanner, true);
                self.reset(cx);
                tracing::info!("contact form delivered");
            }
            Err(reason) => {
                self.state = SubmissionState::Failed;
                cx.view.set_text(&Node::FailureBanner, &self.messages.failure);
                cx.view.set_visible(&Node::FailureBanner, true);
                tracing::warn!(%reason, "contact form delivery failed");
            }
        }
        cx.view.set_text(&Node::SubmitButton, &self.submit_label);
        cx.view.set_property(&Node::SubmitButton, "disabled", "");

        self.banner_generation += 1;
        cx.timers.schedule(
            self.banner,
            Timer::BannerDismiss {
                generation: self.banner_generation,
            },
        );
    }

    pub fn on_timer(&mut self, timer: &Timer, cx: &mut Ctx<'_>) {
        if let Timer::BannerDismiss { generation } = *timer {
            if generation != self.banner_generation {
                return;
            }
            cx.view.set_visible(&Node::SuccessBanner, false);
            cx.view.set_visible(&Node::FailureBanner, false);
            if self.state != SubmissionState::Submitting {
                self.state = SubmissionState::Idle;
            }
        }
    }

    fn reset(&mut self, cx: &mut Ctx<'_>) {
        for field in &mut self.fields {
            field.value.clear();
            let node = Node::Field(field.spec.name.clone());
            cx.view.set_property(&node, "value", "");
            if field.error.take().is_some() {
                cx.view.set_class(&node, ERROR, false);
                cx.view
                    .set_visible(&Node::FieldError(field.spec.name.clone()), false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::view::page::UiEvent;

    fn field(name: &str) -> Node {
        Node::Field(name.to_string())
    }

    fn field_error(name: &str) -> Node {
        Node::FieldError(name.to_string())
    }

    // =========================================================================
    // Rules
    // =========================================================================

    #[test]
    fn email_rule() {
        assert_eq!(check("email", "not-an-email", true), Err(Invalid::Email));
        assert_eq!(check("email", "a@b.co", true), Ok(()));
        assert_eq!(check("email", "a b@c.de", true), Err(Invalid::Email));
        assert_eq!(check("email", "a@b", true), Err(Invalid::Email));
        assert_eq!(check("email", "  a@b.co  ", true), Ok(()));
    }

    #[test]
    fn phone_rule() {
        assert_eq!(check("phone", "123", false), Err(Invalid::Phone));
        assert_eq!(check("phone", "+41 79 123 45 67", false), Ok(()));
        assert_eq!(check("phone", "(044) 123-45", false), Ok(()));
        assert_eq!(check("phone", "++41791234567", false), Err(Invalid::Phone));
        assert_eq!(check("phone", "079 123 45 6x", false), Err(Invalid::Phone));
    }

    #[test]
    fn required_comes_first() {
        assert_eq!(check("email", "   ", true), Err(Invalid::Required));
        assert_eq!(check("name", "", true), Err(Invalid::Required));
    }

    #[test]
    fn optional_empty_passes() {
        assert_eq!(check("phone", "", false), Ok(()));
        assert_eq!(check("email", "", false), Ok(()));
    }

    #[test]
    fn other_fields_only_need_content() {
        assert_eq!(check("message", "x", true), Ok(()));
    }

    #[test]
    fn messages_come_from_config() {
        let messages = MessagesConfig::default();
        assert_eq!(Invalid::Required.message(&messages), "Dieses Feld ist erforderlich.");
        assert!(Invalid::Email.message(&messages).contains("E-Mail"));
        assert!(Invalid::Phone.message(&messages).contains("Telefonnummer"));
    }

    #[test]
    fn swiss_numbers_are_grouped() {
        assert_eq!(format_phone_number("+41791234567"), "+41 79 123 45 67");
        assert_eq!(format_phone_number("0041 79 123 45 67"), "+41 79 123 45 67");
        assert_eq!(format_phone_number("4179"), "+41 79");
    }

    #[test]
    fn foreign_numbers_are_unchanged() {
        assert_eq!(format_phone_number("+49 30 1234567"), "+49 30 1234567");
        assert_eq!(format_phone_number("079 123 45 67"), "079 123 45 67");
    }

    // =========================================================================
    // Field presentation
    // =========================================================================

    #[test]
    fn blur_shows_error_and_input_clears_it() {
        let mut page = contact_page();
        page.dispatch(input("email", "not-an-email"));
        // no error until the field is left
        assert!(!page.view().has_class(&field("email"), ERROR));

        page.dispatch(blur("email"));
        assert!(page.view().has_class(&field("email"), ERROR));
        assert_eq!(
            page.view().text(&field_error("email")),
            Some("Bitte geben Sie eine gültige E-Mail-Adresse ein.")
        );

        page.dispatch(input("email", "a@b.co"));
        assert!(!page.view().has_class(&field("email"), ERROR));
        assert!(!page.view().is_visible(&field_error("email")));
        assert_eq!(page.form().unwrap().error("email"), None);
    }

    #[test]
    fn input_while_erroring_switches_message() {
        let mut page = contact_page();
        page.dispatch(blur("email"));
        assert_eq!(page.form().unwrap().error("email"), Some(Invalid::Required));
        page.dispatch(input("email", "x"));
        assert_eq!(page.form().unwrap().error("email"), Some(Invalid::Email));
    }

    #[test]
    fn errors_do_not_leak_between_fields() {
        let mut page = contact_page();
        page.dispatch(input("phone", "123"));
        page.dispatch(blur("phone"));
        page.dispatch(blur("name"));
        let form = page.form().unwrap();
        assert_eq!(form.error("phone"), Some(Invalid::Phone));
        assert_eq!(form.error("name"), Some(Invalid::Required));
        assert_eq!(form.error("email"), None);
    }

    #[test]
    fn unknown_field_is_ignored() {
        let mut page = contact_page();
        page.view_mut().clear_ops();
        page.dispatch(blur("fax"));
        page.dispatch(input("fax", "1"));
        assert!(page.view().ops().is_empty());
    }

    // =========================================================================
    // Submission
    // =========================================================================

    #[test]
    fn invalid_form_is_blocked() {
        let mut page = contact_page();
        page.dispatch(input("name", "Anna"));
        page.dispatch(UiEvent::Submit);
        let form = page.form().unwrap();
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.error("email"), Some(Invalid::Required));
        assert_eq!(form.error("message"), Some(Invalid::Required));
        assert!(page.timers_idle());
    }

    #[test]
    fn optional_invalid_field_does_not_block_submit() {
        let mut page = contact_page();
        fill_valid(&mut page);
        page.dispatch(input("phone", "12"));
        page.dispatch(UiEvent::Submit);
        assert_eq!(page.form().unwrap().state(), SubmissionState::Submitting);
    }

    #[test]
    fn successful_submission_lifecycle() {
        let mut page = contact_page();
        fill_valid(&mut page);
        page.dispatch(UiEvent::Submit);

        assert_eq!(page.form().unwrap().state(), SubmissionState::Submitting);
        assert_eq!(page.view().prop(&Node::SubmitButton, "disabled"), Some("true"));
        assert_eq!(page.view().text(&Node::SubmitButton), Some("Wird gesendet..."));

        page.advance(ms(1999));
        assert_eq!(page.form().unwrap().state(), SubmissionState::Submitting);

        page.advance(ms(1));
        let form = page.form().unwrap();
        assert_eq!(form.state(), SubmissionState::Succeeded);
        assert_eq!(form.value("name"), Some(""));
        assert_eq!(form.value("email"), Some(""));
        assert_eq!(page.view().prop(&field("message"), "value"), Some(""));
        assert!(page.view().is_visible(&Node::SuccessBanner));
        assert_eq!(page.view().prop(&Node::SubmitButton, "disabled"), Some(""));
        assert_eq!(page.view().text(&Node::SubmitButton), Some("Nachricht senden"));

        page.advance(ms(5000));
        assert!(!page.view().is_visible(&Node::SuccessBanner));
        assert_eq!(page.form().unwrap().state(), SubmissionState::Idle);
    }

    #[test]
    fn double_submit_is_ignored_while_in_flight() {
        let mut page = contact_page();
        fill_valid(&mut page);
        page.dispatch(UiEvent::Submit);
        page.dispatch(UiEvent::Submit);
        page.advance(ms(2000));
        // one delivery timer, one banner timer
        assert_eq!(page.form().unwrap().state(), SubmissionState::Succeeded);
        assert_eq!(page.pending_timers(), 1);
    }

    struct HostTransport {
        sent: Vec<Submission>,
    }

    impl Transport for HostTransport {
        fn send(&mut self, submission: &Submission) -> Delivery {
            self.sent.push(submission.clone());
            Delivery::Pending
        }
    }

    #[test]
    fn failed_delivery_keeps_values() {
        let mut h = Harness::default();
        let mut form = ContactForm::new(
            vec![FieldSpec::new("email", true)],
            "Senden",
            MessagesConfig::default(),
            ms(5000),
        );
        let mut transport = HostTransport { sent: vec![] };
        form.on_input("email", " a@b.co ", &mut h.cx());
        assert!(form.submit(&mut transport, &mut h.cx()));
        assert_eq!(transport.sent[0].get("email"), Some("a@b.co"));
        assert!(h.timers.is_empty());

        form.finish(Err("503".to_string()), &mut h.cx());
        assert_eq!(form.state(), SubmissionState::Failed);
        assert_eq!(form.value("email"), Some(" a@b.co "));
        assert!(h.view.is_visible(&Node::FailureBanner));
        assert_eq!(h.view.text(&Node::SubmitButton), Some("Senden"));

        let timer = h.timers.pop_due(ms(5000)).unwrap();
        form.on_timer(&timer, &mut h.cx());
        assert_eq!(form.state(), SubmissionState::Idle);
        assert!(!h.view.is_visible(&Node::FailureBanner));
    }

    #[test]
    fn result_without_submission_is_ignored() {
        let mut h = Harness::default();
        let mut form = ContactForm::new(vec![], "Senden", MessagesConfig::default(), ms(5000));
        form.finish(Ok(()), &mut h.cx());
        assert_eq!(form.state(), SubmissionState::Idle);
        assert!(h.view.ops().is_empty());
    }

    #[test]
    fn resubmitting_keeps_newest_banner() {
        let mut page = contact_page();
        fill_valid(&mut page);
        page.dispatch(UiEvent::Submit);
        page.advance(ms(2000)); // banner 1 until t=7000
        fill_valid(&mut page);
        page.advance(ms(4000)); // t=6000
        page.dispatch(UiEvent::Submit);
        page.advance(ms(2000)); // t=8000, banner 2 until t=13000
        assert!(page.view().is_visible(&Node::SuccessBanner));
        page.advance(ms(4000));
        assert!(page.view().is_visible(&Node::SuccessBanner));
        page.advance(ms(1000));
        assert!(!page.view().is_visible(&Node::SuccessBanner));
    }
}
