use crate::core::view::View;
use crate::domain::model::AdminSummary;
use crate::domain::ports::MarketplaceApi;
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;

pub const ADMINS_ONLY: &str = "Admins only. Please login with a staff user.";

/// `services_pending` -> `SERVICES PENDING`
pub fn summary_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

pub struct AdminView;

#[async_trait]
impl View for AdminView {
    type Data = AdminSummary;

    fn name(&self) -> &str {
        "admin"
    }

    fn loading_text(&self) -> String {
        "Loading summary…".to_string()
    }

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<AdminSummary> {
        api.admin_summary().await
    }

    fn render(&self, summary: &AdminSummary) -> String {
        let entries: Vec<(String, String)> = summary
            .entries()
            .into_iter()
            .map(|(key, value)| (summary_label(key), value))
            .collect();
        let width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        entries
            .iter()
            .map(|(label, value)| format!("{:<width$}  {}", label, value, width = width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_error(&self, _error: &MarketError) -> String {
        ADMINS_ONLY.to_string()
    }
}
