//! In-memory stand-ins for the API and the terminal, shared by unit tests.

use crate::domain::model::{
    AdminSummary, Conversation, ConversationThread, Message, Notification, OrderDetail,
    OrderLineItem, OrderReceipt, Page, PaymentConfirmation, PaymentInitiation, PaymentStatus,
    Review, ReviewPage, Service, UnreadCounts, User,
};
use crate::domain::ports::{MarketplaceApi, Prompter};
use crate::utils::error::{MarketError, Result};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

pub const PAYMENT_ID: Uuid = Uuid::from_u128(0x6c2b6b8e_4f51_4c57_9d0f_0d3f7f1f2a10);
pub const CONVERSATION_ID: Uuid = Uuid::from_u128(0x0b8d6f7e_2b7a_4f5e_9b8e_3e2f1a4c5d6e);

pub fn sample_service() -> Service {
    Service {
        id: 1,
        title: "Essay proofreading".to_string(),
        description: "Up to 2000 words, 48h turnaround".to_string(),
        price: Decimal::new(1500, 2),
        category: Some(2),
    }
}

pub fn sample_user(username: &str) -> User {
    User {
        id: 1,
        username: username.to_string(),
        email: String::new(),
        profile: None,
    }
}

pub fn sample_conversation(title: &str, unread: u32) -> Conversation {
    Conversation {
        conversation_id: CONVERSATION_ID,
        title: title.to_string(),
        last_message_at: None,
        unread_count: unread,
        other_participant: None,
        last_message_preview: None,
    }
}

fn page_of<T>(results: T, count: u64) -> Page<T> {
    Page {
        count,
        next: None,
        previous: None,
        results,
    }
}

type ErrorFactory = fn() -> MarketError;

fn server_error() -> MarketError {
    MarketError::ApiError {
        status: 500,
        message: "boom".to_string(),
    }
}

/// Records every call and answers from canned data.
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    order_items: Mutex<Vec<OrderLineItem>>,
    failures: HashMap<&'static str, ErrorFactory>,
    confirmation_code: Option<String>,
    services: Vec<Service>,
    conversations: Vec<Conversation>,
    summary: AdminSummary,
    user: Mutex<Option<User>>,
    password: String,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            order_items: Mutex::new(Vec::new()),
            failures: HashMap::new(),
            confirmation_code: None,
            services: vec![sample_service()],
            conversations: Vec::new(),
            summary: AdminSummary::default(),
            user: Mutex::new(None),
            password: "hunter22".to_string(),
        }
    }

    pub fn with_confirmation_code(mut self, code: &str) -> Self {
        self.confirmation_code = Some(code.to_string());
        self
    }

    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn with_conversations(mut self, conversations: Vec<Conversation>) -> Self {
        self.conversations = conversations;
        self
    }

    pub fn with_summary(mut self, summary: AdminSummary) -> Self {
        self.summary = summary;
        self
    }

    pub fn signed_in_as(self, username: &str) -> Self {
        *self.user.lock().unwrap() = Some(sample_user(username));
        self
    }

    pub fn failing(self, method: &'static str) -> Self {
        self.failing_with(method, server_error)
    }

    pub fn failing_with(mut self, method: &'static str, error: ErrorFactory) -> Self {
        self.failures.insert(method, error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_order_items(&self) -> Vec<OrderLineItem> {
        self.order_items.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, detail: Option<&str>) -> Result<()> {
        let entry = match detail {
            Some(d) => format!("{}:{}", method, d),
            None => method.to_string(),
        };
        self.calls.lock().unwrap().push(entry);
        match self.failures.get(method) {
            Some(make_error) => Err(make_error()),
            None => Ok(()),
        }
    }

    fn require_user(&self) -> Result<User> {
        self.user
            .lock()
            .unwrap()
            .clone()
            .ok_or(MarketError::Unauthorized)
    }
}

#[async_trait::async_trait]
impl MarketplaceApi for FakeApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        self.record("list_services", None)?;
        Ok(self.services.clone())
    }

    async fn create_order(&self, items: &[OrderLineItem]) -> Result<OrderReceipt> {
        self.record("create_order", None)?;
        *self.order_items.lock().unwrap() = items.to_vec();
        let total = items
            .iter()
            .map(|i| i.price * Decimal::from(i.qty))
            .sum();
        Ok(OrderReceipt {
            order_id: 41,
            total,
            status: Some("pending".to_string()),
        })
    }

    async fn order_detail(&self, order_id: i64) -> Result<OrderDetail> {
        self.record("order_detail", None)?;
        Ok(OrderDetail {
            id: order_id,
            status: Some("paid".to_string()),
            total: Decimal::new(3000, 2),
            items: Vec::new(),
            created_at: None,
        })
    }

    async fn initiate_payment(&self, order_id: i64, payment_method: &str) -> Result<PaymentInitiation> {
        self.record("initiate_payment", Some(payment_method))?;
        Ok(PaymentInitiation {
            payment_id: PAYMENT_ID,
            confirmation_code: self.confirmation_code.clone(),
            amount: None,
            currency: Some("USD".to_string()),
            status: Some("pending".to_string()),
            gateway: Some(if self.confirmation_code.is_some() { "mock" } else { "stripe" }.to_string()),
            redirect_url: None,
            checkout_session_id: if self.confirmation_code.is_some() {
                None
            } else {
                Some(format!("cs_test_{}", order_id))
            },
        })
    }

    async fn confirm_payment(&self, payment_id: Uuid, confirmation_code: &str) -> Result<PaymentConfirmation> {
        self.record("confirm_payment", Some(confirmation_code))?;
        if self.confirmation_code.as_deref() != Some(confirmation_code) {
            return Err(MarketError::ApiError {
                status: 400,
                message: "Invalid confirmation code".to_string(),
            });
        }
        Ok(PaymentConfirmation {
            payment_id,
            status: "completed".to_string(),
            transaction_id: Some("TXN_mock".to_string()),
            completed_at: None,
        })
    }

    async fn payment_status(&self, payment_id: Uuid) -> Result<PaymentStatus> {
        self.record("payment_status", None)?;
        Ok(PaymentStatus {
            payment_id,
            status: "pending".to_string(),
            amount: Some(Decimal::new(1500, 2)),
            currency: Some("USD".to_string()),
            gateway: Some("mock".to_string()),
            payment_method: Some("mock".to_string()),
            completed_at: None,
        })
    }

    async fn list_conversations(&self, _page: u32) -> Result<Page<Vec<Conversation>>> {
        self.record("list_conversations", None)?;
        self.require_user()?;
        Ok(page_of(self.conversations.clone(), self.conversations.len() as u64))
    }

    async fn conversation_detail(&self, conversation_id: Uuid, _page: u32) -> Result<Page<ConversationThread>> {
        self.record("conversation_detail", None)?;
        let user = self.require_user()?;
        let mut conversation = sample_conversation("Logo design", 0);
        conversation.conversation_id = conversation_id;
        let message = Message {
            message_id: Uuid::from_u128(7),
            sender: user,
            message_type: Some("text".to_string()),
            content: "Is Friday ok?".to_string(),
            is_read: true,
            created_at: None,
        };
        Ok(page_of(
            ConversationThread {
                conversation,
                messages: vec![message],
            },
            1,
        ))
    }

    async fn send_message(&self, _conversation_id: Uuid, content: &str) -> Result<Message> {
        self.record("send_message", Some(content))?;
        let user = self.require_user()?;
        Ok(Message {
            message_id: Uuid::from_u128(8),
            sender: user,
            message_type: Some("text".to_string()),
            content: content.to_string(),
            is_read: false,
            created_at: None,
        })
    }

    async fn list_notifications(&self, _page: u32) -> Result<Page<Vec<Notification>>> {
        self.record("list_notifications", None)?;
        self.require_user()?;
        let notification = Notification {
            notification_id: Uuid::from_u128(9),
            notification_type: Some("message".to_string()),
            title: "New Message".to_string(),
            message: "bo sent you a message".to_string(),
            is_read: false,
            created_at: None,
        };
        Ok(page_of(vec![notification], 1))
    }

    async fn mark_notification_read(&self, _notification_id: Uuid) -> Result<()> {
        self.record("mark_notification_read", None)?;
        self.require_user().map(|_| ())
    }

    async fn unread_counts(&self) -> Result<UnreadCounts> {
        self.record("unread_counts", None)?;
        self.require_user()?;
        Ok(UnreadCounts {
            unread_conversations: 2,
            unread_notifications: 5,
        })
    }

    async fn service_reviews(&self, _service_id: i64, page: u32) -> Result<ReviewPage> {
        self.record("service_reviews", None)?;
        Ok(ReviewPage {
            results: vec![Review {
                id: 1,
                user: Some("bo".to_string()),
                rating: 4,
                comment: "Quick and thorough".to_string(),
                created_at: None,
            }],
            avg_rating: 4.0,
            total_reviews: 1,
            page,
            num_pages: 1,
            has_next: false,
        })
    }

    async fn admin_summary(&self) -> Result<AdminSummary> {
        self.record("admin_summary", None)?;
        Ok(self.summary.clone())
    }

    async fn login(&self, username: &str, password: &str) -> Result<User> {
        self.record("login", Some(username))?;
        if password != self.password {
            return Err(MarketError::ApiError {
                status: 400,
                message: "Invalid credentials".to_string(),
            });
        }
        let user = sample_user(username);
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout", None)?;
        *self.user.lock().unwrap() = None;
        Ok(())
    }

    async fn signup(&self, username: &str, _password: &str, email: Option<&str>) -> Result<User> {
        self.record("signup", Some(username))?;
        let mut user = sample_user(username);
        user.email = email.unwrap_or_default().to_string();
        Ok(user)
    }

    async fn current_user(&self) -> Result<User> {
        self.record("current_user", None)?;
        self.require_user()
    }
}

/// Answers prompts from a queue and remembers what was asked.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Option<String>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt is answered with an empty line, i.e. its default.
    pub fn accept_defaults() -> Self {
        Self::new(Vec::new())
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Some(a.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(message.to_string());
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Some(String::new()));
        Ok(match answer {
            Some(text) if text.is_empty() => Some(default.unwrap_or_default().to_string()),
            other => other,
        })
    }
}
