//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the CLI commands.
//! Services are generic over repository traits, but AppState pins them to
//! the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use codechat_core::chat::service::ConversationService;
use codechat_infra::blob::filesystem::LocalBlobStore;
use codechat_infra::extract::plain::PlainTextExtractor;
use codechat_infra::sqlite::conversation::SqliteConversationRepository;
use codechat_infra::sqlite::pool::DatabasePool;
use codechat_types::config::AppConfig;

/// Concrete service type pinned to the SQLite repository.
pub type ConcreteConversationService = ConversationService<SqliteConversationRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<ConcreteConversationService>,
    pub blob_store: Arc<LocalBlobStore>,
    pub extractor: Arc<PlainTextExtractor>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: resolve the data directory, load
    /// config, connect to the database, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("codechat.db").display()
        );
        let db_pool = DatabasePool::connect(&db_url, &config.database).await?;

        let repo = SqliteConversationRepository::new(db_pool, config.title_policy);
        let conversation_service = ConversationService::new(repo);

        let blob_store = LocalBlobStore::new(data_dir.join("attachments"));

        Ok(Self {
            conversation_service: Arc::new(conversation_service),
            blob_store: Arc::new(blob_store),
            extractor: Arc::new(PlainTextExtractor::new()),
            config,
            data_dir,
        })
    }
}

/// Resolve the data directory: `CODECHAT_DATA_DIR` env var, falling back to
/// `~/.codechat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CODECHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".codechat")
}

/// Load `config.toml` from the data directory; a missing file yields the
/// default configuration.
async fn load_config(data_dir: &std::path::Path) -> anyhow::Result<AppConfig> {
    let path = data_dir.join("config.toml");
    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => {
            let config = toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}
