use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Sent by the API as a decimal string, e.g. `"12.50"`.
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub qty: u32,
}

impl OrderLineItem {
    pub fn for_service(service: &Service, qty: u32) -> Self {
        Self {
            title: service.title.clone(),
            price: service.price,
            qty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub total: Decimal,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "service_title")]
    pub title: String,
    #[serde(alias = "unit_price")]
    pub price: Decimal,
    #[serde(alias = "quantity")]
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(alias = "order_id")]
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "total_amount")]
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInitiation {
    pub payment_id: Uuid,
    #[serde(default)]
    pub confirmation_code: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub checkout_session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub payment_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub payment_id: Uuid,
    pub status: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// DRF page-number pagination envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: T,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePreview {
    pub content: String,
    pub sender: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub other_participant: Option<Participant>,
    #[serde(default)]
    pub last_message_preview: Option<MessagePreview>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: Uuid,
    pub sender: User,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationThread {
    pub conversation: Conversation,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: Uuid,
    #[serde(default)]
    pub notification_type: Option<String>,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCounts {
    pub unread_conversations: u64,
    pub unread_notifications: u64,
}

/// Aggregates come back as `null` when there is nothing to count.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Missing or null counters read as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub users_total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub services_total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub services_pending: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub services_approved: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub services_rejected: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub payments_total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub payments_completed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue_total: Decimal,
}

impl AdminSummary {
    /// Counters in display order, keyed by their wire names.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("users_total", self.users_total.to_string()),
            ("services_total", self.services_total.to_string()),
            ("services_pending", self.services_pending.to_string()),
            ("services_approved", self.services_approved.to_string()),
            ("services_rejected", self.services_rejected.to_string()),
            ("payments_total", self.payments_total.to_string()),
            ("payments_completed", self.payments_completed.to_string()),
            ("revenue_total", self.revenue_total.normalize().to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    /// Username of the reviewer.
    #[serde(default)]
    pub user: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub results: Vec<Review>,
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub num_pages: u32,
    #[serde(default)]
    pub has_next: bool,
}

/// Result of a finished quick-buy chain.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// The confirmation call went through.
    Confirmed {
        order: OrderReceipt,
        confirmation: PaymentConfirmation,
    },
    /// A confirmation code was offered but the buyer left the prompt empty.
    Skipped {
        order: OrderReceipt,
        payment: PaymentInitiation,
    },
    /// No code was issued; payment completes on the gateway side.
    AwaitingGateway {
        order: OrderReceipt,
        payment: PaymentInitiation,
    },
}

impl CheckoutOutcome {
    pub fn order(&self) -> &OrderReceipt {
        match self {
            CheckoutOutcome::Confirmed { order, .. }
            | CheckoutOutcome::Skipped { order, .. }
            | CheckoutOutcome::AwaitingGateway { order, .. } => order,
        }
    }
}
