use async_trait::async_trait;

use crate::error::AppResult;

mod mapping;
pub mod order_repository;
pub mod reconcile;

pub use order_repository::OrderRepository;

/// Persistence port for an aggregate type.
#[async_trait]
pub trait Repository<T: Send + Sync + 'static>: Send + Sync {
    async fn create(&self, entity: &T) -> AppResult<()>;

    async fn update(&self, entity: &T) -> AppResult<()>;

    /// Fails with `AppError::NotFound` when no aggregate has this id.
    async fn find(&self, id: &str) -> AppResult<T>;

    async fn find_all(&self) -> AppResult<Vec<T>>;
}
