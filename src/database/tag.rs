use crate::database::ModelExt;
use crate::database::query::{Filter, OrderBy, RowStore, fetch_every};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub slug: String,
    pub name: String,
}

impl ModelExt for Model {
    const TABLE: &'static str = "tags";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::asc("name")];
}

impl Model {
    /// Every tag, alphabetically
    pub async fn all<S>(store: &S) -> Vec<Model>
    where
        S: RowStore<Model>,
    {
        fetch_every(store, &Self::scan()).await
    }

    /// Tags attached to a post
    pub async fn for_post<S>(store: &S, post_id: i32) -> Vec<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan().filter(Filter::related(
            "id",
            "post_tags",
            "tag_id",
            Filter::eq("post_id", post_id),
        ));

        fetch_every(store, &scan).await
    }
}
