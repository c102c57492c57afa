//! Application state shared by all handlers.

use crate::auth::JwtService;
use gallery_core::Config;
use gallery_db::{CommentRepository, MediaItemRepository};
use gallery_processing::UploadValidator;
use gallery_storage::Storage;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub items: MediaItemRepository,
    pub comments: CommentRepository,
    pub storage: Arc<dyn Storage>,
    pub uploads: Arc<UploadValidator>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, storage: Arc<dyn Storage>) -> Self {
        let jwt = JwtService::new(config.jwt_secret(), config.jwt_issuer());
        let uploads = Arc::new(UploadValidator::from_config(&config));

        Self {
            items: MediaItemRepository::new(pool.clone()),
            comments: CommentRepository::new(pool.clone()),
            pool,
            storage,
            uploads,
            jwt,
            config,
        }
    }
}
