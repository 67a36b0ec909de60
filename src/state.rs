use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::i18n::Catalog;
use crate::upload::{FileSink, LocalDirectory};

/// Shared by every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub catalog: Arc<Catalog>,
    pub uploads: Arc<dyn FileSink>,
    /// Copy storage fault text into error envelopes
    pub expose_internal_errors: bool,
}

impl AppState {
    /// # Errors
    /// Fails if a bundled message catalog cannot be parsed.
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Result<Self, serde_json::Error> {
        let catalog = Catalog::bundled(
            &config.localization.default_locale,
            &config.localization.supported,
        )?;
        Ok(Self {
            db,
            catalog: Arc::new(catalog),
            uploads: Arc::new(LocalDirectory::new(&config.upload.directory)),
            expose_internal_errors: config.errors.expose_internal,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("default_locale", self.catalog.default_locale())
            .field("expose_internal_errors", &self.expose_internal_errors)
            .finish_non_exhaustive()
    }
}
