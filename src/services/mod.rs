pub mod auth;
pub mod comment;
pub mod database;
pub mod gallery;
pub mod generation;
pub mod search;
pub mod storage;
pub mod styles;

// 重新导出常用类型
pub use auth::AuthService;
pub use comment::CommentService;
pub use gallery::GalleryService;
pub use generation::GenerationService;
pub use search::{MeilisearchClient, SearchService, SearchVariant};
pub use storage::StorageService;
