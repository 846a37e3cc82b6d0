use crate::domain::model::{
    AdminSummary, Conversation, ConversationThread, Message, Notification, OrderDetail,
    OrderLineItem, OrderReceipt, Page, PaymentConfirmation, PaymentInitiation, PaymentStatus,
    ReviewPage, Service, UnreadCounts, User,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// The marketplace REST surface, one method per endpoint.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>>;
    async fn create_order(&self, items: &[OrderLineItem]) -> Result<OrderReceipt>;
    async fn order_detail(&self, order_id: i64) -> Result<OrderDetail>;
    async fn initiate_payment(&self, order_id: i64, payment_method: &str) -> Result<PaymentInitiation>;
    async fn confirm_payment(&self, payment_id: Uuid, confirmation_code: &str) -> Result<PaymentConfirmation>;
    async fn payment_status(&self, payment_id: Uuid) -> Result<PaymentStatus>;

    async fn list_conversations(&self, page: u32) -> Result<Page<Vec<Conversation>>>;
    async fn conversation_detail(&self, conversation_id: Uuid, page: u32) -> Result<Page<ConversationThread>>;
    async fn send_message(&self, conversation_id: Uuid, content: &str) -> Result<Message>;
    async fn list_notifications(&self, page: u32) -> Result<Page<Vec<Notification>>>;
    async fn mark_notification_read(&self, notification_id: Uuid) -> Result<()>;
    async fn unread_counts(&self) -> Result<UnreadCounts>;

    async fn service_reviews(&self, service_id: i64, page: u32) -> Result<ReviewPage>;
    async fn admin_summary(&self) -> Result<AdminSummary>;

    async fn login(&self, username: &str, password: &str) -> Result<User>;
    async fn logout(&self) -> Result<()>;
    async fn signup(&self, username: &str, password: &str, email: Option<&str>) -> Result<User>;
    async fn current_user(&self) -> Result<User>;
}

/// Asks the person at the keyboard for a value.
pub trait Prompter: Send + Sync {
    /// Returns `None` when the prompt was dismissed (EOF) and the entered
    /// text otherwise; an empty line yields `default` when one is given.
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<Option<String>>;

    /// Like [`Prompter::prompt`] but for values that should not be echoed
    /// into logs.
    fn prompt_secret(&self, message: &str) -> Result<Option<String>> {
        self.prompt(message, None)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn payment_method(&self) -> &str;
    fn default_quantity(&self) -> u32;
    fn description_width(&self) -> usize;
}
