use crate::app::views::admin::AdminView;
use crate::app::views::messaging::{
    send_message, ConversationsView, NotificationsView, ThreadView, UnreadView,
};
use crate::app::views::orders::{OrderView, PaymentStatusView};
use crate::app::views::services::{
    find_service, render_checkout, render_confirmation, ReviewsView, ServicesView,
};
use crate::app::views::{HOME, NO_SESSION};
use crate::config::cli::Command;
use crate::config::TomlConfig;
use crate::core::checkout::CheckoutFlow;
use crate::core::session::{login_notice, signup_notice, Session};
use crate::core::view::{Rendered, ViewEngine};
use crate::domain::ports::{ConfigProvider, MarketplaceApi, Prompter};
use crate::utils::error::{MarketError, Result};
use clap::Parser;
use std::io::{self, Write};

/// A line typed at the `market>` prompt.
#[derive(Debug, Parser)]
#[command(name = "market", no_binary_name = true, disable_version_flag = true)]
struct ShellInput {
    #[command(subcommand)]
    command: Command,
}

/// Owns the client and the displayed session; runs one command at a time.
pub struct App {
    api: Box<dyn MarketplaceApi>,
    prompter: Box<dyn Prompter>,
    config: TomlConfig,
    session: Session,
}

fn into_rendered<T>(
    result: Result<T>,
    text: impl FnOnce(&T) -> String,
    failed: impl FnOnce(&MarketError) -> String,
) -> Rendered {
    match result {
        Ok(value) => Rendered::ok(text(&value)),
        Err(e) => Rendered::failed(failed(&e), e),
    }
}

impl App {
    pub fn new(
        api: Box<dyn MarketplaceApi>,
        prompter: Box<dyn Prompter>,
        config: TomlConfig,
    ) -> Self {
        Self {
            api,
            prompter,
            config,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Picks up an existing server session, if any.
    pub async fn start(&mut self) {
        if let Some(user) = self.session.refresh(self.api.as_ref()).await {
            tracing::info!("Resuming session for {}", user.username);
        }
    }

    /// Signs in before a one-shot command runs (`--user`).
    pub async fn sign_in_as(&mut self, username: &str) -> Rendered {
        let result = self
            .session
            .login_interactive(self.api.as_ref(), self.prompter.as_ref(), Some(username))
            .await;
        let text = login_notice(&result);
        match result {
            Ok(_) => Rendered::ok(text),
            Err(e) => Rendered::failed(text, e),
        }
    }

    pub async fn execute(&mut self, command: Command) -> Rendered {
        let api = self.api.as_ref();
        let engine = ViewEngine::new(api);

        match command {
            Command::Services => {
                engine
                    .run(&ServicesView {
                        description_width: self.config.description_width(),
                    })
                    .await
            }
            Command::Buy { service_id, qty } => {
                let qty = qty.unwrap_or_else(|| self.config.default_quantity());
                let result = match find_service(api, service_id).await {
                    Ok(service) => {
                        CheckoutFlow::new(api, self.prompter.as_ref(), self.config.payment_method())
                            .quick_buy(&service, qty)
                            .await
                    }
                    Err(e) => Err(e),
                };
                let text = render_checkout(&result);
                match result {
                    Ok(_) => Rendered::ok(text),
                    Err(e) => Rendered::failed(text, e),
                }
            }
            Command::Confirm { payment_id, code } => {
                let result = api.confirm_payment(payment_id, &code).await;
                let text = render_confirmation(&result);
                match result {
                    Ok(_) => Rendered::ok(text),
                    Err(e) => Rendered::failed(text, e),
                }
            }
            Command::Conversations { page } => engine.run(&ConversationsView { page }).await,
            Command::Conversation {
                conversation_id,
                page,
            } => {
                engine
                    .run(&ThreadView {
                        conversation_id,
                        page,
                    })
                    .await
            }
            Command::Send {
                conversation_id,
                text,
            } => into_rendered(
                send_message(api, conversation_id, &text.join(" ")).await,
                |sent| sent.clone(),
                |e| {
                    if e.is_auth_error() {
                        NO_SESSION.to_string()
                    } else {
                        format!("Failed to send message: {}", e)
                    }
                },
            ),
            Command::Notifications { page } => engine.run(&NotificationsView { page }).await,
            Command::Read { notification_id } => into_rendered(
                api.mark_notification_read(notification_id).await,
                |_| "Notification marked as read".to_string(),
                |e| format!("Failed to mark notification: {}", e),
            ),
            Command::Unread => engine.run(&UnreadView).await,
            Command::Admin => engine.run(&AdminView).await,
            Command::Order { order_id } => engine.run(&OrderView { order_id }).await,
            Command::Payment { payment_id } => engine.run(&PaymentStatusView { payment_id }).await,
            Command::Reviews { service_id, page } => {
                engine.run(&ReviewsView { service_id, page }).await
            }
            Command::Login => {
                let result = self
                    .session
                    .login_interactive(api, self.prompter.as_ref(), None)
                    .await;
                let text = login_notice(&result);
                match result {
                    Ok(_) => Rendered::ok(text),
                    Err(e) => Rendered::failed(text, e),
                }
            }
            Command::Logout => {
                into_rendered(self.session.logout(api).await, |_| "Signed out".to_string(), |_| {
                    "Signed out locally; the server did not confirm".to_string()
                })
            }
            Command::Signup => {
                let result = self.session.signup_interactive(api, self.prompter.as_ref()).await;
                let text = signup_notice(&result);
                match result {
                    Ok(_) => Rendered::ok(text),
                    Err(e) => Rendered::failed(text, e),
                }
            }
            Command::Whoami => match self.session.refresh(api).await {
                Some(user) => Rendered::ok(format!("{} <{}>", user.username, user.email)),
                None => Rendered::ok("Not signed in".to_string()),
            },
            Command::Shell => Rendered::ok("Already in the shell".to_string()),
        }
    }

    /// Runs commands line by line until `exit` or end of input.
    pub async fn run_shell<I, W>(&mut self, lines: I, out: &mut W) -> Result<()>
    where
        I: IntoIterator<Item = String>,
        W: Write,
    {
        writeln!(out, "{}", self.session.banner())?;
        writeln!(out, "{}", HOME)?;
        writeln!(out, "Type `help` for commands, `exit` to leave.")?;

        for line in lines {
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.first() {
                None => continue,
                Some(&"exit") | Some(&"quit") => break,
                Some(_) => {}
            }

            let command = match ShellInput::try_parse_from(words.iter().copied()) {
                Ok(input) => input.command,
                Err(e) => {
                    writeln!(out, "{}", e.to_string().trim_end())?;
                    continue;
                }
            };

            let was_signed_in = self.session.username().map(str::to_string);
            let rendered = self.execute(command).await;
            writeln!(out, "{}", rendered.text)?;
            if let Some(e) = &rendered.error {
                tracing::debug!("💡 {}", e.recovery_suggestion());
            }
            if self.session.username().map(str::to_string) != was_signed_in {
                writeln!(out, "{}", self.session.banner())?;
            }
        }
        Ok(())
    }
}

/// Lines typed at the `market>` prompt until end of input.
///
/// Each read takes the stdin lock only for that line, so prompts issued by a
/// command can read stdin too.
pub fn stdin_lines() -> impl Iterator<Item = String> {
    std::iter::from_fn(|| {
        print!("market> ");
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                tracing::warn!("Failed to read input: {}", e);
                None
            }
        }
    })
}
