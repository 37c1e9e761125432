mod http;
mod telegram;

use crate::error::SendError;
use async_trait::async_trait;

pub use http::ReqwestClient;
pub use telegram::{OutboundMessage, TelegramSender};

/// A single outgoing POST.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Status and raw body of a response. The body is not interpreted here.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// HTTP seam used by the Telegram sender. Proxy and timeout belong to the
/// client, headers and body to the request.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform one POST. Only transport failures are errors, any HTTP status
    /// comes back as a reply.
    async fn post(&self, request: HttpRequest) -> Result<HttpReply, SendError>;

    /// Get a human-readable name for this client
    fn name(&self) -> &str;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
