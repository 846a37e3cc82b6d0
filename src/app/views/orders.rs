use crate::app::views::{format_timestamp, NO_SESSION};
use crate::core::view::View;
use crate::domain::model::{OrderDetail, PaymentStatus};
use crate::domain::ports::MarketplaceApi;
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct OrderView {
    pub order_id: i64,
}

#[async_trait]
impl View for OrderView {
    type Data = OrderDetail;

    fn name(&self) -> &str {
        "order"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<OrderDetail> {
        api.order_detail(self.order_id).await
    }

    fn render(&self, order: &OrderDetail) -> String {
        let mut lines = vec![format!(
            "Order #{} [{}]",
            order.id,
            order.status.as_deref().unwrap_or("unknown")
        )];
        for item in &order.items {
            let line_total = item.price * Decimal::from(item.qty);
            lines.push(format!("  {} x{} @ ${} = ${}", item.title, item.qty, item.price, line_total));
        }
        lines.push(format!("Total: ${}", order.total));
        if order.created_at.is_some() {
            lines.push(format!("Placed: {}", format_timestamp(order.created_at.as_ref())));
        }
        lines.join("\n")
    }

    fn render_error(&self, error: &MarketError) -> String {
        match error {
            e if e.is_auth_error() => NO_SESSION.to_string(),
            MarketError::NotFound { .. } => format!("Order #{} not found", self.order_id),
            _ => "Failed to load order".to_string(),
        }
    }
}

pub struct PaymentStatusView {
    pub payment_id: Uuid,
}

#[async_trait]
impl View for PaymentStatusView {
    type Data = PaymentStatus;

    fn name(&self) -> &str {
        "payment"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<PaymentStatus> {
        api.payment_status(self.payment_id).await
    }

    fn render(&self, payment: &PaymentStatus) -> String {
        let mut text = format!("Payment {}: {}", payment.payment_id, payment.status);
        if let Some(amount) = payment.amount {
            text.push_str(&format!(
                "\nAmount: {} {}",
                amount,
                payment.currency.as_deref().unwrap_or("")
            ));
        }
        if let Some(gateway) = &payment.gateway {
            text.push_str(&format!("\nGateway: {}", gateway));
        }
        if payment.completed_at.is_some() {
            text.push_str(&format!(
                "\nCompleted: {}",
                format_timestamp(payment.completed_at.as_ref())
            ));
        }
        text
    }

    fn render_error(&self, error: &MarketError) -> String {
        match error {
            e if e.is_auth_error() => NO_SESSION.to_string(),
            MarketError::NotFound { .. } => "Payment not found".to_string(),
            _ => "Failed to load payment".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::ViewEngine;
    use crate::domain::model::OrderItem;
    use crate::testing::{FakeApi, PAYMENT_ID};

    #[test]
    fn test_order_lines_show_line_totals() {
        let order = OrderDetail {
            id: 5,
            status: Some("pending".to_string()),
            total: Decimal::new(3000, 2),
            items: vec![OrderItem {
                title: "Logo".to_string(),
                price: Decimal::new(1500, 2),
                qty: 2,
            }],
            created_at: None,
        };

        let text = OrderView { order_id: 5 }.render(&order);
        assert_eq!(
            text,
            "Order #5 [pending]\n  Logo x2 @ $15.00 = $30.00\nTotal: $30.00"
        );
    }

    #[tokio::test]
    async fn test_payment_status_view() {
        let api = FakeApi::new();
        let view = PaymentStatusView {
            payment_id: PAYMENT_ID,
        };
        let rendered = ViewEngine::new(&api).run(&view).await;
        assert_eq!(
            rendered.text,
            format!("Payment {}: pending\nAmount: 15.00 USD\nGateway: mock", PAYMENT_ID)
        );
    }

    #[tokio::test]
    async fn test_missing_order() {
        let api = FakeApi::new().failing_with("order_detail", || MarketError::NotFound {
            path: "orders/8/".to_string(),
        });
        let rendered = ViewEngine::new(&api).run(&OrderView { order_id: 8 }).await;
        assert_eq!(rendered.text, "Order #8 not found");
    }
}
