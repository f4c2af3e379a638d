use crate::domain::account::SessionUser;
use crate::domain::ports::{CheckoutGatewayBox, CheckoutOutcome, CheckoutRequest, PayerContact};
use crate::error::PaymentResult;
use tracing::info;

/// Forwards a real payment to a hosted checkout widget.
///
/// Builds the request (payer prefilled from the active session when one is
/// present) and relays the gateway's outcome. The widget itself lives behind
/// the `CheckoutGateway` port.
pub struct CheckoutFlow {
    gateway: CheckoutGatewayBox,
    currency: String,
    theme_color: Option<String>,
}

impl CheckoutFlow {
    pub fn new(gateway: CheckoutGatewayBox) -> Self {
        Self {
            gateway,
            currency: "INR".to_string(),
            theme_color: None,
        }
    }

    pub fn with_theme_color(mut self, color: impl Into<String>) -> Self {
        self.theme_color = Some(color.into());
        self
    }

    /// Opens the hosted checkout for `amount` minor units.
    pub async fn charge(
        &self,
        amount: u64,
        description: &str,
        payer: Option<&SessionUser>,
    ) -> PaymentResult<CheckoutOutcome> {
        let prefill = match payer {
            Some(user) => PayerContact {
                name: user.name.clone().unwrap_or_else(|| "Farmer".to_string()),
                email: Some(user.email.clone()),
                phone: user.phone.clone(),
            },
            None => PayerContact {
                name: "Farmer".to_string(),
                ..Default::default()
            },
        };

        let request = CheckoutRequest {
            amount,
            currency: self.currency.clone(),
            description: description.to_string(),
            prefill,
            theme_color: self.theme_color.clone(),
        };

        let outcome = self.gateway.open(request).await?;
        match &outcome {
            CheckoutOutcome::Completed { payment_id } => {
                info!(%payment_id, amount, "checkout completed");
            }
            CheckoutOutcome::Dismissed => {
                info!(amount, "checkout dismissed");
            }
        }
        Ok(outcome)
    }
}
