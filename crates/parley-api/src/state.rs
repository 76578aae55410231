//! Application state wiring all services together.
//!
//! Services are generic over `DocumentStore`; AppState pins them to the
//! SQLite implementation from parley-infra.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::chat::history::HistoryService;
use parley_core::chat::service::{ChatService, ChatSettings};
use parley_core::chat::sessions::SessionStore;
use parley_core::llm::box_provider::BoxLlmProvider;
use parley_infra::filesystem::ensure_data_dir;
use parley_infra::llm::create_provider;
use parley_infra::sqlite::document::SqliteDocumentStore;
use parley_infra::sqlite::pool::DatabasePool;
use parley_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteSessionStore = SessionStore<SqliteDocumentStore>;
pub type ConcreteChatService = ChatService<SqliteDocumentStore>;
pub type ConcreteHistoryService = HistoryService<SqliteDocumentStore>;

/// Shared application state for the REST API.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ConcreteSessionStore>,
    pub chat_service: Arc<ConcreteChatService>,
    pub history_service: Arc<ConcreteHistoryService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect to the database and build the configured LLM provider.
    pub async fn init(config: AppConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        ensure_data_dir(&data_dir).await?;

        let db_url = config.storage.database_url_or_default(&data_dir);
        let pool = DatabasePool::new(&db_url).await?;
        tracing::debug!(url = %db_url, "Database ready");

        let api_key = std::env::var(&config.llm.api_key_env).ok();
        let provider = create_provider(&config.llm, api_key.as_deref())?;

        Ok(Self::from_parts(SqliteDocumentStore::new(pool), provider, config))
    }

    /// Wire services from an already-built store and provider.
    pub fn from_parts(store: SqliteDocumentStore, provider: BoxLlmProvider, config: AppConfig) -> Self {
        let sessions = SessionStore::new(store.clone());

        let settings = ChatSettings {
            model: config.llm.model.clone(),
            system_prompt: config.llm.system_prompt.clone(),
            temperature: config.llm.temperature,
        };
        let chat_service = ChatService::new(sessions.clone(), provider, settings);

        Self {
            sessions: Arc::new(sessions),
            chat_service: Arc::new(chat_service),
            history_service: Arc::new(HistoryService::new(store)),
            config: Arc::new(config),
        }
    }
}
