use crate::database::ModelExt;
use crate::database::query::{Filter, OrderBy, RowStore, fetch_every, fetch_one};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

impl ModelExt for Model {
    const TABLE: &'static str = "categories";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::asc("name")];
}

impl Model {
    /// Every category, alphabetically
    pub async fn all<S>(store: &S) -> Vec<Model>
    where
        S: RowStore<Model>,
    {
        fetch_every(store, &Self::scan()).await
    }

    pub async fn fetch_by_slug<S>(store: &S, slug: &str) -> Option<Model>
    where
        S: RowStore<Model>,
    {
        fetch_one(store, &Self::scan().filter(Filter::eq("slug", slug))).await
    }
}
