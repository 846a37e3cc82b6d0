use crate::app::views::{clamp, NO_SESSION};
use crate::core::view::View;
use crate::domain::model::{CheckoutOutcome, PaymentConfirmation, ReviewPage, Service};
use crate::domain::ports::MarketplaceApi;
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;

pub const SERVICES_FAILED: &str = "Failed to load services";
pub const PURCHASE_FAILED: &str = "Failed to purchase";
pub const FLOW_FINISHED: &str = "Payment flow finished (mock).";

pub struct ServicesView {
    pub description_width: usize,
}

#[async_trait]
impl View for ServicesView {
    type Data = Vec<Service>;

    fn name(&self) -> &str {
        "services"
    }

    fn loading_text(&self) -> String {
        "Loading services…".to_string()
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<Vec<Service>> {
        api.list_services().await
    }

    fn render(&self, services: &Vec<Service>) -> String {
        let mut lines = vec!["Services".to_string()];
        if services.is_empty() {
            lines.push("No services listed yet.".to_string());
        }
        for service in services {
            lines.push(String::new());
            lines.push(format!("[{}] {}", service.id, service.title));
            if !service.description.is_empty() {
                lines.push(format!("    {}", clamp(&service.description, self.description_width)));
            }
            lines.push(format!("    ${}", service.price));
        }
        lines.join("\n")
    }

    fn render_error(&self, _error: &MarketError) -> String {
        SERVICES_FAILED.to_string()
    }
}

/// Finds a listed service by id, for the quick-buy command.
pub async fn find_service(api: &dyn MarketplaceApi, service_id: i64) -> Result<Service> {
    api.list_services()
        .await?
        .into_iter()
        .find(|s| s.id == service_id)
        .ok_or_else(|| MarketError::NotFound {
            path: format!("service {}", service_id),
        })
}

pub fn render_checkout(result: &Result<CheckoutOutcome>) -> String {
    match result {
        Ok(CheckoutOutcome::Confirmed {
            order,
            confirmation,
        }) => {
            let mut text = format!(
                "Order #{} ({}) payment {}: {}",
                order.order_id, order.total, confirmation.payment_id, confirmation.status
            );
            if let Some(txn) = &confirmation.transaction_id {
                text.push_str(&format!(" [{}]", txn));
            }
            format!("{}\n{}", text, FLOW_FINISHED)
        }
        Ok(CheckoutOutcome::Skipped { order, payment }) => format!(
            "Order #{} ({}) payment {} left pending; finish with `confirm {} <code>`.\n{}",
            order.order_id, order.total, payment.payment_id, payment.payment_id, FLOW_FINISHED
        ),
        Ok(CheckoutOutcome::AwaitingGateway { order, payment }) => {
            let target = payment
                .redirect_url
                .as_deref()
                .or(payment.checkout_session_id.as_deref())
                .unwrap_or("the payment provider");
            format!(
                "Order #{} ({}) payment {} continues at {}",
                order.order_id, order.total, payment.payment_id, target
            )
        }
        Err(e) if e.is_auth_error() => format!("{}: {}", PURCHASE_FAILED, NO_SESSION),
        Err(e) => format!("{}: {}", PURCHASE_FAILED, e),
    }
}

/// Text for a stand-alone `confirm` of a pending payment.
pub fn render_confirmation(result: &Result<PaymentConfirmation>) -> String {
    match result {
        Ok(confirmation) => {
            let mut text = format!("Payment {}: {}", confirmation.payment_id, confirmation.status);
            if let Some(txn) = &confirmation.transaction_id {
                text.push_str(&format!(" [{}]", txn));
            }
            format!("{}\n{}", text, FLOW_FINISHED)
        }
        Err(e) if e.is_auth_error() => format!("{}: {}", PURCHASE_FAILED, NO_SESSION),
        Err(e) => format!("{}: {}", PURCHASE_FAILED, e),
    }
}

pub struct ReviewsView {
    pub service_id: i64,
    pub page: u32,
}

#[async_trait]
impl View for ReviewsView {
    type Data = ReviewPage;

    fn name(&self) -> &str {
        "reviews"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<ReviewPage> {
        api.service_reviews(self.service_id, self.page).await
    }

    fn render(&self, page: &ReviewPage) -> String {
        let mut lines = vec![format!(
            "Reviews for service {}: {:.2} avg over {} review(s)",
            self.service_id, page.avg_rating, page.total_reviews
        )];
        for review in &page.results {
            lines.push(format!(
                "{}{} {}",
                "★".repeat(review.rating.min(5) as usize),
                "☆".repeat(5 - review.rating.min(5) as usize),
                review.user.as_deref().unwrap_or("anonymous")
            ));
            if !review.comment.is_empty() {
                lines.push(format!("    {}", review.comment));
            }
        }
        if page.num_pages > 1 {
            lines.push(format!("page {}/{}", page.page, page.num_pages));
        }
        lines.join("\n")
    }

    fn render_error(&self, error: &MarketError) -> String {
        match error {
            MarketError::NotFound { .. } => format!("No reviews for service {}", self.service_id),
            _ => "Failed to load reviews".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checkout::CheckoutFlow;
    use crate::core::view::ViewEngine;
    use crate::testing::{sample_service, FakeApi, ScriptedPrompter, PAYMENT_ID};

    #[tokio::test]
    async fn test_services_render_cards() {
        let api = FakeApi::new();
        let view = ServicesView {
            description_width: 12,
        };

        let rendered = ViewEngine::new(&api).run(&view).await;

        assert!(rendered.is_ok());
        assert_eq!(
            rendered.text,
            "Services\n\n[1] Essay proofreading\n    Up to 2000…\n    $15.00"
        );
    }

    #[tokio::test]
    async fn test_services_error_text() {
        let api = FakeApi::new().failing("list_services");
        let view = ServicesView {
            description_width: 80,
        };

        let rendered = ViewEngine::new(&api).run(&view).await;
        assert_eq!(rendered.text, SERVICES_FAILED);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let api = FakeApi::new().with_services(vec![]);
        let view = ServicesView {
            description_width: 80,
        };
        let rendered = ViewEngine::new(&api).run(&view).await;
        assert_eq!(rendered.text, "Services\nNo services listed yet.");
    }

    #[tokio::test]
    async fn test_find_service_by_id() {
        let api = FakeApi::new();
        assert_eq!(find_service(&api, 1).await.unwrap(), sample_service());
        assert!(matches!(
            find_service(&api, 99).await,
            Err(MarketError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_render_checkout_messages() {
        let api = FakeApi::new().with_confirmation_code("CONF_1234");
        let prompter = ScriptedPrompter::accept_defaults();
        let result = CheckoutFlow::new(&api, &prompter, "mock")
            .quick_buy(&sample_service(), 2)
            .await;

        let text = render_checkout(&result);
        assert!(text.starts_with("Order #41 (30.00) payment"));
        assert!(text.contains("completed [TXN_mock]"));
        assert!(text.ends_with(FLOW_FINISHED));

        let api = FakeApi::new().failing("create_order");
        let result = CheckoutFlow::new(&api, &prompter, "mock")
            .quick_buy(&sample_service(), 1)
            .await;
        assert!(render_checkout(&result).starts_with(PURCHASE_FAILED));
    }

    #[tokio::test]
    async fn test_skipped_checkout_names_confirm_command() {
        let api = FakeApi::new().with_confirmation_code("CONF_1234");
        let prompter = ScriptedPrompter::new(vec![None]);
        let result = CheckoutFlow::new(&api, &prompter, "mock")
            .quick_buy(&sample_service(), 1)
            .await;

        let text = render_checkout(&result);
        assert!(text.contains(&format!("left pending; finish with `confirm {} <code>`", PAYMENT_ID)));
        assert!(text.ends_with(FLOW_FINISHED));
    }

    #[tokio::test]
    async fn test_render_confirmation() {
        let api = FakeApi::new().with_confirmation_code("CONF_1234");
        let result = api.confirm_payment(PAYMENT_ID, "CONF_1234").await;
        assert_eq!(
            render_confirmation(&result),
            format!("Payment {}: completed [TXN_mock]\n{}", PAYMENT_ID, FLOW_FINISHED)
        );

        let result = api.confirm_payment(PAYMENT_ID, "CONF_0000").await;
        assert_eq!(
            render_confirmation(&result),
            "Failed to purchase: API returned 400: Invalid confirmation code"
        );
    }

    #[tokio::test]
    async fn test_reviews_render_stars() {
        let api = FakeApi::new();
        let view = ReviewsView {
            service_id: 1,
            page: 1,
        };
        let rendered = ViewEngine::new(&api).run(&view).await;
        assert_eq!(
            rendered.text,
            "Reviews for service 1: 4.00 avg over 1 review(s)\n★★★★☆ bo\n    Quick and thorough"
        );
    }
}
