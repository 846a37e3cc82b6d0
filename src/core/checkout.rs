use crate::domain::model::{CheckoutOutcome, OrderLineItem, Service};
use crate::domain::ports::{MarketplaceApi, Prompter};
use crate::utils::error::{CheckoutStep, MarketError, Result};

pub const CODE_PROMPT: &str = "Enter confirmation code shown (mock):";

/// Quick-buy: order, payment, optional confirmation code, confirmation.
///
/// Each step runs only after the previous one succeeded. A failure stops the
/// chain where it happened; nothing already created on the server is undone.
pub struct CheckoutFlow<'a, A: MarketplaceApi + ?Sized, P: Prompter + ?Sized> {
    api: &'a A,
    prompter: &'a P,
    payment_method: String,
}

impl<'a, A: MarketplaceApi + ?Sized, P: Prompter + ?Sized> CheckoutFlow<'a, A, P> {
    pub fn new(api: &'a A, prompter: &'a P, payment_method: impl Into<String>) -> Self {
        Self {
            api,
            prompter,
            payment_method: payment_method.into(),
        }
    }

    pub async fn quick_buy(&self, service: &Service, qty: u32) -> Result<CheckoutOutcome> {
        if qty == 0 {
            return Err(MarketError::ValidationError {
                message: "quantity must be at least 1".to_string(),
            });
        }

        tracing::info!("🛒 Quick buy: {} x{} ({})", service.title, qty, service.price);

        let items = [OrderLineItem::for_service(service, qty)];
        let order = self
            .api
            .create_order(&items)
            .await
            .map_err(|e| MarketError::checkout(CheckoutStep::CreateOrder, e))?;

        let payment = self
            .api
            .initiate_payment(order.order_id, &self.payment_method)
            .await
            .map_err(|e| MarketError::checkout(CheckoutStep::InitiatePayment, e))?;

        let Some(issued_code) = payment.confirmation_code.clone() else {
            tracing::info!(
                "Payment {} has no confirmation code; completion happens at the gateway",
                payment.payment_id
            );
            return Ok(CheckoutOutcome::AwaitingGateway { order, payment });
        };

        let entered = self
            .prompter
            .prompt(CODE_PROMPT, Some(&issued_code))
            .map_err(|e| MarketError::checkout(CheckoutStep::EnterCode, e))?;

        let code = match entered {
            Some(code) if !code.is_empty() => code,
            _ => {
                tracing::info!("Confirmation skipped for payment {}", payment.payment_id);
                return Ok(CheckoutOutcome::Skipped { order, payment });
            }
        };

        let confirmation = self
            .api
            .confirm_payment(payment.payment_id, &code)
            .await
            .map_err(|e| MarketError::checkout(CheckoutStep::ConfirmPayment, e))?;

        Ok(CheckoutOutcome::Confirmed {
            order,
            confirmation,
        })
    }
}
