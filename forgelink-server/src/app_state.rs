use std::sync::Arc;

use crate::services::chat_service::ChatStore;

// Application state that will be shared across all routes
#[derive(Clone, Default)]
pub struct AppState {
    pub(crate) pool: Option<sqlx::PgPool>,
    pub(crate) chat: Option<Arc<dyn ChatStore>>,
}
