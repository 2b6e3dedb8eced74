pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scrape;
pub mod service;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::ProcessError;
pub use scrape::{PageFetcher, WebDriverFetcher};
pub use service::NotaService;
