//! Application state.

use idealens_core::gemini::GeminiClient;
use std::sync::Arc;

/// State shared across handlers.
///
/// The client is read-only configuration; requests are independent and
/// need no locking.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GeminiClient>,
}

impl AppState {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}
