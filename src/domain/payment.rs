use crate::domain::account::SessionUser;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed demo OTP accepted by the simulated payment flow.
pub const DEMO_OTP: &str = "123456";

/// Steps of the payment wizard, in order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStep {
    Method,
    Details,
    Otp,
    Processing,
    Success,
}

impl PaymentStep {
    /// Progress percentage shown for this step. Display only; never used
    /// for control decisions.
    pub fn progress(&self) -> u8 {
        match self {
            PaymentStep::Method => 25,
            PaymentStep::Details => 50,
            PaymentStep::Otp => 75,
            PaymentStep::Processing => 90,
            PaymentStep::Success => 100,
        }
    }
}

impl fmt::Display for PaymentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStep::Method => "method",
            PaymentStep::Details => "details",
            PaymentStep::Otp => "otp",
            PaymentStep::Processing => "processing",
            PaymentStep::Success => "success",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
}

/// Method-specific payment details.
///
/// Expiry fields are collected but not validated; only the fields relevant
/// to the selected method are ever checked.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub holder_name: String,
    pub upi_id: String,
}

/// Display context for one wizard run: what is being paid for and by whom.
#[derive(Debug, Clone)]
pub struct PaymentContext {
    /// Amount in minor units (paise).
    pub amount: u64,
    pub description: String,
    pub payer: Option<SessionUser>,
}

impl PaymentContext {
    pub fn new(amount: u64, description: impl Into<String>) -> Self {
        Self {
            amount,
            description: description.into(),
            payer: None,
        }
    }

    pub fn with_payer(mut self, payer: SessionUser) -> Self {
        self.payer = Some(payer);
        self
    }
}
