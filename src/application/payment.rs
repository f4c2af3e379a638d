use crate::domain::payment::{
    DEMO_OTP, PaymentContext, PaymentDetails, PaymentMethod, PaymentStep,
};
use crate::error::{PaymentError, PaymentResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Simulated delays for the deferred wizard transitions.
#[derive(Debug, Clone)]
pub struct PaymentTiming {
    /// Time spent in `processing` before reaching `success`.
    pub processing: Duration,
    /// Time `success` is displayed before the callback fires and the
    /// workflow resets.
    pub success: Duration,
}

impl Default for PaymentTiming {
    fn default() -> Self {
        Self {
            processing: Duration::from_secs(3),
            success: Duration::from_secs(2),
        }
    }
}

impl PaymentTiming {
    /// Zero delays, for scripted (non-interactive) runs.
    pub fn instant() -> Self {
        Self {
            processing: Duration::ZERO,
            success: Duration::ZERO,
        }
    }
}

struct WizardState {
    step: PaymentStep,
    method: Option<PaymentMethod>,
    details: PaymentDetails,
    progress: u8,
    /// Bumped on every reset. Deferred transitions capture the generation
    /// they were scheduled under and no-op when it no longer matches, so a
    /// closed dialog can never mutate state or fire the callback.
    generation: u64,
}

impl WizardState {
    fn reset(&mut self) {
        self.step = PaymentStep::Method;
        self.method = None;
        self.details = PaymentDetails::default();
        self.progress = 0;
        self.generation += 1;
    }
}

/// The five-step simulated payment wizard.
///
/// `method → details → otp → processing → success`, with user-initiated back
/// transitions from `details` and `otp`. On reaching `success` the completion
/// callback fires exactly once and the wizard resets to `method`. All state
/// is in-process only; nothing survives a restart.
pub struct PaymentWorkflow {
    context: PaymentContext,
    timing: PaymentTiming,
    on_success: Arc<dyn Fn() + Send + Sync>,
    state: Arc<Mutex<WizardState>>,
}

impl PaymentWorkflow {
    pub fn new(
        context: PaymentContext,
        timing: PaymentTiming,
        on_success: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            context,
            timing,
            on_success: Arc::new(on_success),
            state: Arc::new(Mutex::new(WizardState {
                step: PaymentStep::Method,
                method: None,
                details: PaymentDetails::default(),
                progress: 0,
                generation: 0,
            })),
        }
    }

    pub fn context(&self) -> &PaymentContext {
        &self.context
    }

    pub fn step(&self) -> PaymentStep {
        self.lock().step
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.lock().method
    }

    /// Progress percentage for display. Not used for control decisions.
    pub fn progress(&self) -> u8 {
        self.lock().progress
    }

    /// Selects the payment method and advances to `details`.
    pub fn select_method(&self, method: PaymentMethod) -> PaymentResult<()> {
        let mut state = self.lock();
        if state.step != PaymentStep::Method {
            return Err(PaymentError::OutOfStep(state.step));
        }
        state.method = Some(method);
        advance(&mut state, PaymentStep::Details);
        Ok(())
    }

    /// Validates and records payment details, advancing to `otp`.
    ///
    /// Only the fields relevant to the selected method are checked; card
    /// expiry is collected but never validated.
    pub fn enter_details(&self, details: PaymentDetails) -> PaymentResult<()> {
        let mut state = self.lock();
        if state.step != PaymentStep::Details {
            return Err(PaymentError::OutOfStep(state.step));
        }
        match state.method {
            Some(PaymentMethod::Card) => {
                if details.card_number.is_empty() {
                    return Err(PaymentError::MissingField("card number"));
                }
                if details.cvv.is_empty() {
                    return Err(PaymentError::MissingField("CVV"));
                }
                if details.holder_name.is_empty() {
                    return Err(PaymentError::MissingField("cardholder name"));
                }
            }
            Some(PaymentMethod::Upi) => {
                if details.upi_id.is_empty() {
                    return Err(PaymentError::MissingField("UPI ID"));
                }
            }
            // Unreachable through the public API: `details` is only entered
            // after a method is selected.
            None => return Err(PaymentError::OutOfStep(state.step)),
        }
        state.details = details;
        advance(&mut state, PaymentStep::Otp);
        Ok(())
    }

    /// Verifies the entered code against the fixed demo OTP.
    ///
    /// On a match the wizard moves to `processing` and schedules the
    /// deferred `processing → success` transition; on a mismatch it stays at
    /// `otp` and can be retried.
    pub fn submit_otp(&self, code: &str) -> PaymentResult<()> {
        let generation = {
            let mut state = self.lock();
            if state.step != PaymentStep::Otp {
                return Err(PaymentError::OutOfStep(state.step));
            }
            if code != DEMO_OTP {
                return Err(PaymentError::InvalidOtp);
            }
            advance(&mut state, PaymentStep::Processing);
            state.generation
        };

        let state = Arc::clone(&self.state);
        let on_success = Arc::clone(&self.on_success);
        let timing = self.timing.clone();
        let amount = self.context.amount;
        tokio::spawn(async move {
            tokio::time::sleep(timing.processing).await;
            {
                let mut state = state.lock().expect("wizard lock poisoned");
                if state.generation != generation {
                    return;
                }
                advance(&mut state, PaymentStep::Success);
            }

            tokio::time::sleep(timing.success).await;
            {
                let mut state = state.lock().expect("wizard lock poisoned");
                if state.generation != generation {
                    return;
                }
                state.reset();
            }
            info!(amount, "payment simulation completed");
            on_success();
        });
        Ok(())
    }

    /// User-initiated back: `details → method` or `otp → details`.
    pub fn back(&self) -> PaymentResult<()> {
        let mut state = self.lock();
        match state.step {
            PaymentStep::Details => advance(&mut state, PaymentStep::Method),
            PaymentStep::Otp => advance(&mut state, PaymentStep::Details),
            step => return Err(PaymentError::OutOfStep(step)),
        }
        Ok(())
    }

    /// Discards all wizard state immediately.
    ///
    /// Any pending deferred transition is suppressed; the completion
    /// callback will not fire after this returns.
    pub fn close(&self) {
        let mut state = self.lock();
        debug!(step = %state.step, "payment dialog closed");
        state.reset();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WizardState> {
        self.state.lock().expect("wizard lock poisoned")
    }
}

fn advance(state: &mut WizardState, step: PaymentStep) {
    state.step = step;
    state.progress = step.progress();
}
