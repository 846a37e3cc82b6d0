use crate::domain::model::User;
use crate::domain::ports::{MarketplaceApi, Prompter};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation;

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_OK: &str = "Signup successful. Now login.";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const MIN_PASSWORD_LEN: usize = 6;

/// Who is signed in, as far as the client can tell.
///
/// The server owns the real session (a cookie in the HTTP client's jar);
/// this only mirrors it for display.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Asks the server who we are; any failure means signed out.
    pub async fn refresh(&mut self, api: &dyn MarketplaceApi) -> Option<&User> {
        self.user = match api.current_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("No active session: {}", e);
                None
            }
        };
        self.user.as_ref()
    }

    pub async fn login(&mut self, api: &dyn MarketplaceApi, username: &str, password: &str) -> Result<&User> {
        validation::validate_non_empty_string("username", username)?;
        api.login(username, password).await?;
        let user = api.current_user().await?;
        tracing::info!("Session established for {}", user.username);
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    /// Prompts for credentials, then signs in.
    pub async fn login_interactive<P: Prompter + ?Sized>(
        &mut self,
        api: &dyn MarketplaceApi,
        prompter: &P,
        username: Option<&str>,
    ) -> Result<&User> {
        let username = match username {
            Some(name) => name.to_string(),
            None => prompter.prompt("Username:", None)?.unwrap_or_default(),
        };
        let password = prompter.prompt_secret("Password:")?.unwrap_or_default();
        self.login(api, &username, &password).await
    }

    /// Clears the local user even when the server call fails.
    pub async fn logout(&mut self, api: &dyn MarketplaceApi) -> Result<()> {
        let result = api.logout().await;
        self.user = None;
        if let Err(e) = &result {
            tracing::warn!("Logout request failed: {}", e);
        }
        result
    }

    pub async fn signup(
        &self,
        api: &dyn MarketplaceApi,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<User> {
        validation::validate_non_empty_string("username", username)?;
        validation::validate_max_length("username", username, 75)?;
        validation::validate_min_length("password", password, MIN_PASSWORD_LEN)?;
        if let Some(email) = email {
            validation::validate_email("email", email)?;
        }
        api.signup(username, password, email).await
    }

    pub async fn signup_interactive<P: Prompter + ?Sized>(
        &self,
        api: &dyn MarketplaceApi,
        prompter: &P,
    ) -> Result<User> {
        let username = prompter.prompt("Choose username:", None)?.unwrap_or_default();
        let email = prompter
            .prompt("Email (optional):", None)?
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let password = prompter
            .prompt_secret("Choose password (min 6):")?
            .unwrap_or_default();
        self.signup(api, username.trim(), &password, email.as_deref())
            .await
    }

    /// Header line of the layout.
    pub fn banner(&self) -> String {
        match self.username() {
            Some(name) => format!("Student Marketplace | Services · Messaging · Admin | {} (logout)", name),
            None => "Student Marketplace | Services · Messaging · Admin | login · signup".to_string(),
        }
    }
}

/// Notice shown after a login attempt.
pub fn login_notice(result: &Result<&User>) -> String {
    match result {
        Ok(user) => format!("Signed in as {}", user.username),
        Err(MarketError::ValidationError { message }) => format!("{}: {}", LOGIN_FAILED, message),
        Err(_) => LOGIN_FAILED.to_string(),
    }
}

/// Notice shown after a signup attempt.
pub fn signup_notice(result: &Result<User>) -> String {
    match result {
        Ok(_) => SIGNUP_OK.to_string(),
        Err(MarketError::ValidationError { message }) => format!("{}: {}", SIGNUP_FAILED, message),
        Err(MarketError::ApiError { message, .. }) => format!("{}: {}", SIGNUP_FAILED, message),
        Err(_) => SIGNUP_FAILED.to_string(),
    }
}
