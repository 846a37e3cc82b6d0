use crate::domain::ports::MarketplaceApi;
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;

/// One screen of the client: fetch, then render the data or an error notice.
#[async_trait]
pub trait View: Send + Sync {
    type Data: Send;

    fn name(&self) -> &str;

    async fn load(&self, api: &dyn MarketplaceApi) -> Result<Self::Data>;

    fn render(&self, data: &Self::Data) -> String;

    fn render_error(&self, error: &MarketError) -> String;

    /// Shown while the request is in flight.
    fn loading_text(&self) -> String {
        "Loading…".to_string()
    }
}

/// What a view produced: the text to show and the failure behind it, if any.
#[derive(Debug)]
pub struct Rendered {
    pub text: String,
    pub error: Option<MarketError>,
}

impl Rendered {
    pub fn ok(text: String) -> Self {
        Self { text, error: None }
    }

    pub fn failed(text: String, error: MarketError) -> Self {
        Self {
            text,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct ViewEngine<'a> {
    api: &'a dyn MarketplaceApi,
}

impl<'a> ViewEngine<'a> {
    pub fn new(api: &'a dyn MarketplaceApi) -> Self {
        Self { api }
    }

    pub async fn run<V: View>(&self, view: &V) -> Rendered {
        tracing::debug!("{}: {}", view.name(), view.loading_text());

        match view.load(self.api).await {
            Ok(data) => {
                tracing::debug!("{}: loaded", view.name());
                Rendered::ok(view.render(&data))
            }
            Err(e) => {
                tracing::warn!(
                    "{} failed: {} (Category: {:?}, Severity: {:?})",
                    view.name(),
                    e,
                    e.category(),
                    e.severity()
                );
                Rendered::failed(view.render_error(&e), e)
            }
        }
    }
}
