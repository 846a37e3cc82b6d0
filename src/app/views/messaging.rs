use crate::app::views::{clamp, format_timestamp, NO_SESSION};
use crate::core::view::View;
use crate::domain::model::{Conversation, ConversationThread, Notification, Page, UnreadCounts};
use crate::domain::ports::MarketplaceApi;
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use uuid::Uuid;

pub const LOGIN_TO_VIEW: &str = "Please login to view your conversations.";
pub const SELECT_CONVERSATION: &str = "Select a conversation";

fn conversation_line(conversation: &Conversation) -> String {
    let title = if conversation.title.is_empty() {
        "Untitled"
    } else {
        conversation.title.as_str()
    };
    let mut line = title.to_string();
    if conversation.unread_count > 0 {
        line.push_str(&format!(" ({})", conversation.unread_count));
    }
    line
}

pub struct ConversationsView {
    pub page: u32,
}

#[async_trait]
impl View for ConversationsView {
    type Data = Page<Vec<Conversation>>;

    fn name(&self) -> &str {
        "conversations"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<Page<Vec<Conversation>>> {
        api.list_conversations(self.page).await
    }

    fn render(&self, page: &Page<Vec<Conversation>>) -> String {
        let mut lines = vec!["Conversations".to_string()];
        for conversation in &page.results {
            lines.push(format!("- {}", conversation_line(conversation)));
            lines.push(format!(
                "  {}",
                format_timestamp(conversation.last_message_at.as_ref())
            ));
            lines.push(format!("  id: {}", conversation.conversation_id));
        }
        if page.has_next() {
            lines.push(format!("more: --page {}", self.page + 1));
        }
        lines.push(String::new());
        lines.push(SELECT_CONVERSATION.to_string());
        lines.join("\n")
    }

    // Without data there is nothing to select, whatever the cause.
    fn render_error(&self, _error: &MarketError) -> String {
        LOGIN_TO_VIEW.to_string()
    }
}

pub struct ThreadView {
    pub conversation_id: Uuid,
    pub page: u32,
}

#[async_trait]
impl View for ThreadView {
    type Data = Page<ConversationThread>;

    fn name(&self) -> &str {
        "conversation"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<Page<ConversationThread>> {
        api.conversation_detail(self.conversation_id, self.page).await
    }

    fn render(&self, page: &Page<ConversationThread>) -> String {
        let thread = &page.results;
        let mut lines = vec![conversation_line(&thread.conversation)];
        if let Some(other) = &thread.conversation.other_participant {
            lines.push(format!("with {}", other.username));
        }
        lines.push(String::new());
        if thread.messages.is_empty() {
            lines.push("No messages yet.".to_string());
        }
        for message in &thread.messages {
            lines.push(format!(
                "[{}] {}: {}",
                format_timestamp(message.created_at.as_ref()),
                message.sender.username,
                message.content
            ));
        }
        lines.join("\n")
    }

    fn render_error(&self, error: &MarketError) -> String {
        match error {
            e if e.is_auth_error() => LOGIN_TO_VIEW.to_string(),
            MarketError::NotFound { .. } => "Conversation not found".to_string(),
            _ => "Failed to load conversation".to_string(),
        }
    }
}

/// Posts a message and describes the result.
pub async fn send_message(api: &dyn MarketplaceApi, conversation_id: Uuid, text: &str) -> Result<String> {
    let content = text.trim();
    if content.is_empty() {
        return Err(MarketError::ValidationError {
            message: "Message content cannot be empty".to_string(),
        });
    }
    let message = api.send_message(conversation_id, content).await?;
    Ok(format!("Sent: {}", clamp(&message.content, 60)))
}

pub struct NotificationsView {
    pub page: u32,
}

#[async_trait]
impl View for NotificationsView {
    type Data = Page<Vec<Notification>>;

    fn name(&self) -> &str {
        "notifications"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<Page<Vec<Notification>>> {
        api.list_notifications(self.page).await
    }

    fn render(&self, page: &Page<Vec<Notification>>) -> String {
        if page.results.is_empty() {
            return "No notifications".to_string();
        }
        page.results
            .iter()
            .map(|n| {
                let marker = if n.is_read { " " } else { "*" };
                format!("{} {}: {} ({})", marker, n.title, n.message, n.notification_id)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_error(&self, error: &MarketError) -> String {
        if error.is_auth_error() {
            NO_SESSION.to_string()
        } else {
            "Failed to load notifications".to_string()
        }
    }
}

pub struct UnreadView;

#[async_trait]
impl View for UnreadView {
    type Data = UnreadCounts;

    fn name(&self) -> &str {
        "unread"
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<UnreadCounts> {
        api.unread_counts().await
    }

    fn render(&self, counts: &UnreadCounts) -> String {
        format!(
            "Unread conversations: {}\nUnread notifications: {}",
            counts.unread_conversations, counts.unread_notifications
        )
    }

    fn render_error(&self, error: &MarketError) -> String {
        if error.is_auth_error() {
            NO_SESSION.to_string()
        } else {
            "Failed to load unread counts".to_string()
        }
    }
}
