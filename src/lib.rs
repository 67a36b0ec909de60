//! # storecrate
//!
//! A CRUD REST API for a small e-commerce backend: categories, products,
//! customers, orders and order items, plus image upload.
//!
//! Every resource is served by the same generic handlers in [`routes`],
//! driven by the [`traits::Resource`] implementation on its sea-orm model.
//! Responses always use the [`envelope::Envelope`] shape, with messages
//! localized from the request's `Accept-Language` header.
//!
//! ```rust,ignore
//! let config = AppConfig::load()?;
//! let db = database::connect(&config.database).await?;
//! let state = AppState::from_config(db, &config)?;
//! let app = app::build_app(state, &config);
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod database;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod filter;
pub mod i18n;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod operations;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod traits;
pub mod upload;
pub mod validation;

pub use app::build_app;
pub use config::AppConfig;
pub use errors::ApiError;
pub use state::AppState;
pub use traits::{Repository, Resource};
