pub mod capabilities;
pub mod case_study;
pub mod category;
pub mod paginated;
pub mod post;
pub mod project;
pub mod query;
pub mod retry;
pub mod skill;
pub mod store;
pub mod tag;
pub mod timeline;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;

use crate::database::paginated::PageResult;
use crate::database::query::{Filter, OrderBy, PageRequest, RowStore, ScanQuery};
use crate::errors::{post::PostError, project::ProjectError};

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Post(#[from] PostError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

#[async_trait]
pub trait ModelExt: Sized + Send + 'static {
    const TABLE: &'static str;

    /// Ordering applied to every list read of this table.
    const DEFAULT_ORDER: &'static [OrderBy];

    /// A scan over the whole table in its default order.
    fn scan() -> ScanQuery {
        ScanQuery::new(Self::TABLE).order(Self::DEFAULT_ORDER)
    }

    /// Fetches one page of records in the default order
    async fn fetch_all<S>(store: &S, request: PageRequest) -> PageResult<Self>
    where
        S: RowStore<Self>,
    {
        query::fetch_page(store, &Self::scan(), request).await
    }

    /// Fetches a record by its primary key
    async fn fetch_by_id<S>(store: &S, id: i32) -> Option<Self>
    where
        S: RowStore<Self>,
    {
        query::fetch_one(store, &Self::scan().filter(Filter::eq("id", id))).await
    }
}
