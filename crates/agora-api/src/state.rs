//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository traits, but AppState pins them to the
//! concrete SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agora_core::service::comment::CommentService;
use agora_core::service::vote::VoteService;
use agora_core::service::word::WordCloudService;
use agora_infra::config::{load_service_config, resolve_data_dir};
use agora_infra::sqlite::comment::SqliteCommentRepository;
use agora_infra::sqlite::pool::DatabasePool;
use agora_infra::sqlite::vote::SqliteVoteRepository;
use agora_infra::sqlite::word::SqliteWordRepository;
use agora_types::config::ServiceConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteVoteService = VoteService<SqliteVoteRepository>;
pub type ConcreteCommentService = CommentService<SqliteCommentRepository>;
pub type ConcreteWordCloudService = WordCloudService<SqliteWordRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub vote_service: Arc<ConcreteVoteService>,
    pub comment_service: Arc<ConcreteCommentService>,
    pub word_service: Arc<ConcreteWordCloudService>,
    pub config: ServiceConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_service_config(&data_dir).await;
        let op_timeout = Duration::from_millis(config.op_timeout_ms);

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("agora.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire each service to its SQLite repository
        let vote_service =
            VoteService::new(SqliteVoteRepository::new(db_pool.clone()), op_timeout);
        let comment_service =
            CommentService::new(SqliteCommentRepository::new(db_pool.clone()), op_timeout);
        let word_service =
            WordCloudService::new(SqliteWordRepository::new(db_pool.clone()), op_timeout);

        Ok(Self {
            vote_service: Arc::new(vote_service),
            comment_service: Arc::new(comment_service),
            word_service: Arc::new(word_service),
            config,
            data_dir,
        })
    }
}
