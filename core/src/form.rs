//! Per-form submission state machine.
//!
//! # Design
//! A form is `Idle`, `Loading`, `Success` or `Error`, and every change goes
//! through [`Form::dispatch`]. A submission hands out a [`SubmitTicket`]; the
//! outcome is applied only if it carries the ticket of the submission still in
//! flight and the form is still mounted. That keeps a late answer from a
//! superseded or torn-down form from touching state.

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything a form shows.
#[derive(Debug, Clone, PartialEq)]
pub struct FormViewState<T> {
    pub status: FormStatus,
    pub result: Option<T>,
    pub error_message: Option<String>,
    /// Inline message next to the input; never a top-level error.
    pub field_error: Option<String>,
}

impl<T> Default for FormViewState<T> {
    fn default() -> Self {
        Self {
            status: FormStatus::Idle,
            result: None,
            error_message: None,
            field_error: None,
        }
    }
}

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

#[derive(Debug)]
pub enum FormEvent<T> {
    /// Validated input is about to be sent.
    Submit,
    /// Input failed client-side validation.
    InvalidInput(String),
    /// A local failure shown as a top-level error without any request. A
    /// result already on screen stays.
    Fail(String),
    /// The operation for `ticket` finished.
    Resolve {
        ticket: SubmitTicket,
        outcome: Result<T, ApiError>,
    },
    /// Back to a blank idle form.
    Reset,
    /// The form is gone; later events are dropped.
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Submitted(SubmitTicket),
    Applied,
    /// A request is in flight; the submit control is disabled.
    Busy,
    /// Stale ticket or unmounted form.
    Ignored,
}

#[derive(Debug)]
pub struct Form<T> {
    state: FormViewState<T>,
    next_ticket: u64,
    in_flight: Option<SubmitTicket>,
    mounted: bool,
}

impl<T> Default for Form<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Form<T> {
    pub fn new() -> Self {
        Self {
            state: FormViewState::default(),
            next_ticket: 0,
            in_flight: None,
            mounted: true,
        }
    }

    pub fn state(&self) -> &FormViewState<T> {
        &self.state
    }

    pub fn status(&self) -> FormStatus {
        self.state.status
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn dispatch(&mut self, event: FormEvent<T>) -> Transition {
        if !self.mounted {
            return Transition::Ignored;
        }
        match event {
            FormEvent::Submit => {
                if self.in_flight.is_some() {
                    return Transition::Busy;
                }
                self.next_ticket += 1;
                let ticket = SubmitTicket(self.next_ticket);
                self.in_flight = Some(ticket);
                self.state = FormViewState {
                    status: FormStatus::Loading,
                    ..FormViewState::default()
                };
                Transition::Submitted(ticket)
            }
            FormEvent::InvalidInput(message) => {
                if self.in_flight.is_some() {
                    return Transition::Busy;
                }
                self.state.field_error = Some(message);
                Transition::Applied
            }
            FormEvent::Fail(message) => {
                if self.in_flight.is_some() {
                    return Transition::Busy;
                }
                self.state.status = FormStatus::Error;
                self.state.error_message = Some(message);
                self.state.field_error = None;
                Transition::Applied
            }
            FormEvent::Resolve { ticket, outcome } => {
                if self.in_flight != Some(ticket) {
                    return Transition::Ignored;
                }
                self.in_flight = None;
                self.state = match outcome {
                    Ok(result) => FormViewState {
                        status: FormStatus::Success,
                        result: Some(result),
                        ..FormViewState::default()
                    },
                    Err(err) => {
                        tracing::debug!(error = %err, "submission failed");
                        FormViewState {
                            status: FormStatus::Error,
                            error_message: Some(err.user_message().to_string()),
                            ..FormViewState::default()
                        }
                    }
                };
                Transition::Applied
            }
            FormEvent::Reset => {
                self.in_flight = None;
                self.state = FormViewState::default();
                Transition::Applied
            }
            FormEvent::Unmount => {
                self.in_flight = None;
                self.mounted = false;
                Transition::Applied
            }
        }
    }

    /// Submit and resolve with `operation` in one step.
    ///
    /// `operation` runs only if the submission was accepted, so it sees the
    /// cleared loading state.
    pub fn run<F>(&mut self, operation: F) -> Transition
    where
        F: FnOnce(&FormViewState<T>) -> Result<T, ApiError>,
    {
        let ticket = match self.dispatch(FormEvent::Submit) {
            Transition::Submitted(ticket) => ticket,
            other => return other,
        };
        let outcome = operation(&self.state);
        self.dispatch(FormEvent::Resolve { ticket, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NormalizedError, UNEXPECTED_ERROR_MESSAGE};

    fn typed(message: &str) -> ApiError {
        ApiError::Backend(NormalizedError {
            message: message.to_string(),
            error_code: "CONVERSION_ERROR".to_string(),
            correlation_id: "unknown".to_string(),
            status_code: 500,
            details: None,
        })
    }

    fn submitted(form: &mut Form<String>) -> SubmitTicket {
        match form.dispatch(FormEvent::Submit) {
            Transition::Submitted(ticket) => ticket,
            other => panic!("submit refused: {other:?}"),
        }
    }

    #[test]
    fn starts_idle_and_empty() {
        let form: Form<String> = Form::new();
        assert_eq!(form.state(), &FormViewState::default());
        assert!(form.is_mounted());
    }

    #[test]
    fn success_stores_result() {
        let mut form = Form::new();
        let ticket = submitted(&mut form);
        assert_eq!(form.status(), FormStatus::Loading);
        form.dispatch(FormEvent::Resolve {
            ticket,
            outcome: Ok("CC(C)CC".to_string()),
        });
        assert_eq!(form.status(), FormStatus::Success);
        assert_eq!(form.state().result.as_deref(), Some("CC(C)CC"));
        assert!(form.state().error_message.is_none());
    }

    #[test]
    fn typed_failure_keeps_backend_message() {
        let mut form: Form<String> = Form::new();
        form.run(|_| Err(typed("Conversion failed")));
        assert_eq!(form.status(), FormStatus::Error);
        assert_eq!(form.state().error_message.as_deref(), Some("Conversion failed"));
        assert!(form.state().result.is_none());
    }

    #[test]
    fn untyped_failure_uses_generic_message() {
        let mut form: Form<String> = Form::new();
        form.run(|_| Err(ApiError::Transport("dns lookup failed".to_string())));
        assert_eq!(form.state().error_message.as_deref(), Some(UNEXPECTED_ERROR_MESSAGE));
    }

    #[test]
    fn resubmission_clears_previous_result_before_resolving() {
        let mut form = Form::new();
        form.run(|_| Ok("first".to_string()));
        assert_eq!(form.state().result.as_deref(), Some("first"));

        form.run(|during| {
            assert_eq!(during.status, FormStatus::Loading);
            assert!(during.result.is_none());
            assert!(during.error_message.is_none());
            Err(typed("second failed"))
        });
        assert!(form.state().result.is_none());
        assert_eq!(form.state().error_message.as_deref(), Some("second failed"));
    }

    #[test]
    fn submit_while_loading_is_refused() {
        let mut form: Form<String> = Form::new();
        let _ticket = submitted(&mut form);
        assert_eq!(form.dispatch(FormEvent::Submit), Transition::Busy);
        assert_eq!(form.run(|_| Ok("never".to_string())), Transition::Busy);
    }

    #[test]
    fn invalid_input_leaves_status_alone() {
        let mut form: Form<String> = Form::new();
        form.dispatch(FormEvent::InvalidInput("Please enter a chemical name".to_string()));
        assert_eq!(form.status(), FormStatus::Idle);
        assert_eq!(form.state().field_error.as_deref(), Some("Please enter a chemical name"));
        assert!(form.state().error_message.is_none());

        form.run(|_| Ok("ok".to_string()));
        assert!(form.state().field_error.is_none());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut form = Form::new();
        let old = submitted(&mut form);
        form.dispatch(FormEvent::Reset);
        let current = submitted(&mut form);
        let applied = form.dispatch(FormEvent::Resolve {
            ticket: old,
            outcome: Ok("late".to_string()),
        });
        assert_eq!(applied, Transition::Ignored);
        assert_eq!(form.status(), FormStatus::Loading);

        form.dispatch(FormEvent::Resolve {
            ticket: current,
            outcome: Ok("current".to_string()),
        });
        assert_eq!(form.state().result.as_deref(), Some("current"));
    }

    #[test]
    fn outcome_after_unmount_does_not_mutate() {
        let mut form = Form::new();
        let ticket = submitted(&mut form);
        form.dispatch(FormEvent::Unmount);
        let applied = form.dispatch(FormEvent::Resolve {
            ticket,
            outcome: Ok("too late".to_string()),
        });
        assert_eq!(applied, Transition::Ignored);
        assert_eq!(form.status(), FormStatus::Loading);
        assert!(form.state().result.is_none());
    }

    #[test]
    fn fail_sets_error_and_keeps_result() {
        let mut form: Form<String> = Form::new();
        form.run(|_| Ok("old".to_string()));
        form.dispatch(FormEvent::Fail("File size must be less than 10MB".to_string()));
        assert_eq!(form.status(), FormStatus::Error);
        assert_eq!(form.state().error_message.as_deref(), Some("File size must be less than 10MB"));
        assert_eq!(form.state().result.as_deref(), Some("old"));

        // The next submission still starts from a blank state.
        form.run(|_| Err(ApiError::Transport("down".to_string())));
        assert!(form.state().result.is_none());
    }
}
