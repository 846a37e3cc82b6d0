use crate::domain::model::{
    AdminSummary, Conversation, ConversationThread, Message, Notification, OrderDetail,
    OrderLineItem, OrderReceipt, Page, PaymentConfirmation, PaymentInitiation, PaymentStatus,
    ReviewPage, Service, UnreadCounts, User,
};
use crate::domain::ports::{ConfigProvider, MarketplaceApi};
use crate::utils::error::{MarketError, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Django's CSRF cookie and the header it expects it echoed in.
const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// reqwest-backed client for the marketplace API.
///
/// The cookie jar keeps the session cookie handed out by `accounts/login/`
/// for every later request made through the same instance. Unsafe requests
/// also carry the CSRF token from that jar.
#[derive(Debug, Clone)]
pub struct HttpMarketplaceApi {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
}

#[derive(Deserialize)]
struct ServiceList {
    #[serde(default)]
    services: Vec<Service>,
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    items: &'a [OrderLineItem],
}

#[derive(Serialize)]
struct InitiatePaymentRequest<'a> {
    order_id: i64,
    payment_method: &'a str,
}

#[derive(Serialize)]
struct ConfirmPaymentRequest<'a> {
    payment_id: Uuid,
    confirmation_code: &'a str,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    content: &'a str,
    message_type: &'a str,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl HttpMarketplaceApi {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.base_url())?;
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .user_agent(config.user_agent())
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url,
            cookies,
        })
    }

    /// The `csrftoken` cookie the server set for this base URL, if any.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        header
            .to_str()
            .ok()?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);
        let unsafe_method = method != Method::GET && method != Method::HEAD;
        let request = self.client.request(method, url);
        Ok(match self.csrf_token() {
            Some(token) if unsafe_method => request.header(CSRF_HEADER, token),
            _ => request,
        })
    }

    /// Sends the request and checks the status, returning the raw body.
    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("{} -> {}", path, status);

        if !status.is_success() {
            let err = MarketError::from_status(status.as_u16(), path, &body);
            tracing::warn!("{} failed: {}", path, err);
            return Err(err);
        }
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<T> {
        let body = self.execute(path, request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path)?;
        self.fetch(path, request).await
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, page: u32) -> Result<T> {
        let request = self.request(Method::GET, path)?.query(&[("page", page)]);
        self.fetch(path, request).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.request(Method::POST, path)?.json(body);
        self.fetch(path, request).await
    }

    /// POST whose response body is not needed.
    async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(path, request).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn list_services(&self) -> Result<Vec<Service>> {
        let list: ServiceList = self.get("services/list/").await?;
        tracing::info!("Fetched {} services", list.services.len());
        Ok(list.services)
    }

    async fn create_order(&self, items: &[OrderLineItem]) -> Result<OrderReceipt> {
        let receipt: OrderReceipt = self
            .post("orders/create/", &CreateOrderRequest { items })
            .await?;
        tracing::info!("Created order {} (total {})", receipt.order_id, receipt.total);
        Ok(receipt)
    }

    async fn order_detail(&self, order_id: i64) -> Result<OrderDetail> {
        self.get(&format!("orders/{}/", order_id)).await
    }

    async fn initiate_payment(&self, order_id: i64, payment_method: &str) -> Result<PaymentInitiation> {
        let payment: PaymentInitiation = self
            .post(
                "payments/initiate/",
                &InitiatePaymentRequest {
                    order_id,
                    payment_method,
                },
            )
            .await?;
        tracing::info!(
            "Initiated payment {} for order {} via {}",
            payment.payment_id,
            order_id,
            payment.gateway.as_deref().unwrap_or(payment_method)
        );
        Ok(payment)
    }

    async fn confirm_payment(&self, payment_id: Uuid, confirmation_code: &str) -> Result<PaymentConfirmation> {
        let confirmation: PaymentConfirmation = self
            .post(
                "payments/confirm/",
                &ConfirmPaymentRequest {
                    payment_id,
                    confirmation_code,
                },
            )
            .await?;
        tracing::info!("Payment {} is {}", payment_id, confirmation.status);
        Ok(confirmation)
    }

    async fn payment_status(&self, payment_id: Uuid) -> Result<PaymentStatus> {
        self.get(&format!("payments/{}/status/", payment_id)).await
    }

    async fn list_conversations(&self, page: u32) -> Result<Page<Vec<Conversation>>> {
        self.get_page("messaging/conversations/", page).await
    }

    async fn conversation_detail(&self, conversation_id: Uuid, page: u32) -> Result<Page<ConversationThread>> {
        self.get_page(&format!("messaging/conversations/{}/", conversation_id), page)
            .await
    }

    async fn send_message(&self, conversation_id: Uuid, content: &str) -> Result<Message> {
        self.post(
            &format!("messaging/conversations/{}/send/", conversation_id),
            &SendMessageRequest {
                content,
                message_type: "text",
            },
        )
        .await
    }

    async fn list_notifications(&self, page: u32) -> Result<Page<Vec<Notification>>> {
        self.get_page("messaging/notifications/", page).await
    }

    async fn mark_notification_read(&self, notification_id: Uuid) -> Result<()> {
        self.post_empty(
            &format!("messaging/notifications/{}/read/", notification_id),
            &serde_json::json!({}),
        )
        .await
    }

    async fn unread_counts(&self) -> Result<UnreadCounts> {
        self.get("messaging/unread-counts/").await
    }

    async fn service_reviews(&self, service_id: i64, page: u32) -> Result<ReviewPage> {
        self.get_page(&format!("reviews/service/{}/", service_id), page)
            .await
    }

    async fn admin_summary(&self) -> Result<AdminSummary> {
        self.get("services/admin/summary/").await
    }

    async fn login(&self, username: &str, password: &str) -> Result<User> {
        let user: User = self
            .post("accounts/login/", &Credentials { username, password })
            .await?;
        tracing::info!("Signed in as {}", user.username);
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        self.post_empty("accounts/logout/", &serde_json::json!({}))
            .await
    }

    async fn signup(&self, username: &str, password: &str, email: Option<&str>) -> Result<User> {
        self.post(
            "accounts/signup/",
            &SignupRequest {
                username,
                password,
                email,
            },
        )
        .await
    }

    async fn current_user(&self) -> Result<User> {
        self.get("accounts/me/").await
    }
}
