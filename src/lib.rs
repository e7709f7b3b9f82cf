#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use catalog::{CatalogContext, ImageFile, PRODUCT_PAGE_LIMIT};
pub use client::{ApiClient, TOKEN_HEADER};
pub use config::ApiConfig;
pub use error::Error;
pub use session::{SessionController, SessionEvent, SessionState, SessionStatus};
pub use store::{MemoryTokenStore, TokenStore};
pub use types::{Category, CategoryId, Product, ProductId, User, UserId};
