use std::sync::Arc;

use crate::{
    cart::{LocalCartStore, RemoteCartStore, SessionCartStore},
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    quote::{CommandAssembler, CommandPageRenderer, QuoteError, QuoteExporter},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub carts: SessionCartStore,
    pub exporter: QuoteExporter,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig, exporter: QuoteExporter) -> Self {
        let orm = orm_from_pool(pool.clone());
        let carts = SessionCartStore::new(
            LocalCartStore::new(config.guest_cart_ttl),
            RemoteCartStore::new(orm.clone()),
        );
        Self {
            pool,
            orm,
            config: Arc::new(config),
            carts,
            exporter,
        }
    }

    /// State wired to the external rendering programs named in `config`.
    pub fn with_command_renderers(pool: DbPool, config: AppConfig) -> Result<Self, QuoteError> {
        let renderer = CommandPageRenderer::new(&config.renderer_bin, &config.render_work_dir);
        let assembler = CommandAssembler::new(&config.assembler_bin, &config.render_work_dir);
        let exporter = QuoteExporter::new(
            config.quote.clone(),
            Arc::new(renderer),
            Arc::new(assembler),
        )?;
        Ok(Self::new(pool, config, exporter))
    }
}
