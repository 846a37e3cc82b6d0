use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "market")]
#[command(about = "Terminal client for the student marketplace")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "market.toml")]
    pub config: String,

    /// Override api.base_url from the configuration file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Sign in as this user before running the command
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List services
    Services,
    /// Quick-buy a service by id
    Buy {
        service_id: i64,
        #[arg(long)]
        qty: Option<u32>,
    },
    /// Confirm a pending payment with its confirmation code
    Confirm { payment_id: Uuid, code: String },
    /// List your conversations
    Conversations {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one conversation with its messages
    Conversation {
        conversation_id: Uuid,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Send a message to a conversation
    Send {
        conversation_id: Uuid,
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// List notifications
    Notifications {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Mark a notification as read
    Read { notification_id: Uuid },
    /// Unread conversation and notification counts
    Unread,
    /// Admin summary dashboard (staff only)
    Admin,
    /// Show an order
    Order { order_id: i64 },
    /// Show a payment's status
    Payment { payment_id: Uuid },
    /// Reviews for a service
    Reviews {
        service_id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Sign in
    Login,
    /// Sign out
    Logout,
    /// Create an account
    Signup,
    /// Show who is signed in
    Whoami,
    /// Interactive session keeping one login across commands
    Shell,
}

impl CliConfig {
    /// Loads the configuration file (if any) and applies command-line
    /// overrides on top of it.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let config = TomlConfig::load_or_default(&self.config)?;
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_parse_buy_with_global_flags() {
        let cli = CliConfig::try_parse_from([
            "market",
            "buy",
            "7",
            "--qty",
            "2",
            "--base-url",
            "http://127.0.0.1:8000/api",
            "-u",
            "ada",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Buy {
                service_id: 7,
                qty: Some(2)
            })
        );
        assert_eq!(cli.user.as_deref(), Some("ada"));
        assert_eq!(cli.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_parse_send_requires_uuid() {
        assert!(CliConfig::try_parse_from(["market", "send", "not-a-uuid", "hi"]).is_err());

        let cli = CliConfig::try_parse_from([
            "market",
            "send",
            "4f0c1a52-0d0e-4c59-9a6b-6f1f4f5c2d11",
            "hello there",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Send { .. })));
    }

    #[test]
    fn test_parse_confirm() {
        let cli = CliConfig::try_parse_from([
            "market",
            "confirm",
            "6c2b6b8e-4f51-4c57-9d0f-0d3f7f1f2a10",
            "CONF_4821",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Confirm { payment_id, code }) => {
                assert_eq!(payment_id.to_string(), "6c2b6b8e-4f51-4c57-9d0f-0d3f7f1f2a10");
                assert_eq!(code, "CONF_4821");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(CliConfig::try_parse_from(["market", "confirm", "6c2b6b8e-4f51-4c57-9d0f-0d3f7f1f2a10"]).is_err());
    }

    #[test]
    fn test_resolve_applies_base_url_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://file.example/api/\"\n").unwrap();

        let path_str = path.to_str().unwrap();
        let cli = CliConfig::try_parse_from(["market", "services", "--config", path_str]).unwrap();
        assert_eq!(cli.resolve().unwrap().base_url(), "http://file.example/api/");

        let cli = CliConfig::try_parse_from([
            "market",
            "services",
            "--config",
            path_str,
            "--base-url",
            "http://flag.example/api",
        ])
        .unwrap();
        assert_eq!(cli.resolve().unwrap().base_url(), "http://flag.example/api/");
    }
}
