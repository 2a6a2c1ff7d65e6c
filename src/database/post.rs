use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::paginated::PageResult;
use crate::database::query::{
    Filter, OrderBy, PageRequest, RowStore, fetch_one, fetch_page, write_or_raise,
};
use crate::database::store::PgStore;
use crate::database::{DatabaseError, ModelExt, Result};
use crate::errors::post::PostError;
use crate::utils::patch::{self, is_set, new_value};
use crate::utils::validation;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<i32>,
    pub published: bool,
    pub featured: bool,
    pub reading_time: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCreateData {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    pub reading_time: Option<i32>,
}

/// Fields left as `None` keep their current value. Nullable columns take
/// `Some(None)` (a JSON `null`) to be cleared.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostUpdateData {
    pub slug: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<Option<String>>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<i32>>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<Option<i32>>,
}

impl ModelExt for Model {
    const TABLE: &'static str = "posts";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::desc("created_at"), OrderBy::desc("id")];
}

impl Model {
    fn published_filter() -> Filter {
        Filter::eq("published", true)
    }

    /// Published posts, newest first
    #[tracing::instrument(skip(store))]
    pub async fn published<S>(store: &S, request: PageRequest) -> PageResult<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan().filter(Self::published_filter());

        fetch_page(store, &scan, request).await
    }

    /// Published posts that are marked as featured
    #[tracing::instrument(skip(store))]
    pub async fn featured<S>(store: &S, request: PageRequest) -> PageResult<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan()
            .filter(Self::published_filter())
            .filter(Filter::eq("featured", true));

        fetch_page(store, &scan, request).await
    }

    /// Published posts in the category with the given slug
    #[tracing::instrument(skip(store))]
    pub async fn by_category<S>(store: &S, slug: &str, request: PageRequest) -> PageResult<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan()
            .filter(Self::published_filter())
            .filter(Filter::related(
                "category_id",
                "categories",
                "id",
                Filter::eq("slug", slug),
            ));

        fetch_page(store, &scan, request).await
    }

    /// Published posts carrying the tag with the given slug
    #[tracing::instrument(skip(store))]
    pub async fn by_tag<S>(store: &S, slug: &str, request: PageRequest) -> PageResult<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan()
            .filter(Self::published_filter())
            .filter(Filter::related(
                "id",
                "post_tags",
                "post_id",
                Filter::related("tag_id", "tags", "id", Filter::eq("slug", slug)),
            ));

        fetch_page(store, &scan, request).await
    }

    /// A published post by its slug
    #[tracing::instrument(skip(store))]
    pub async fn fetch_by_slug<S>(store: &S, slug: &str) -> Option<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan()
            .filter(Self::published_filter())
            .filter(Filter::eq("slug", slug));

        fetch_one(store, &scan).await
    }

    #[tracing::instrument(skip(store, data), fields(slug = %data.slug))]
    pub async fn create(store: &PgStore, data: &PostCreateData) -> Result<Model> {
        validate(Some(&data.slug), Some(&data.title))?;

        let pool = store.pool();
        let q = "INSERT INTO posts(slug, title, excerpt, content, cover_image, category_id, published, featured, reading_time, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW()) RETURNING *";

        let post: Model = write_or_raise("post.create", store.retry(), move || async move {
            sqlx::query_as::<_, Model>(q)
                .bind(&data.slug)
                .bind(&data.title)
                .bind(&data.excerpt)
                .bind(&data.content)
                .bind(&data.cover_image)
                .bind(data.category_id)
                .bind(data.published)
                .bind(data.featured)
                .bind(data.reading_time)
                .fetch_one(pool)
                .await
                .map_err(DatabaseError::Sqlx)
        })
        .await?;

        tracing::info!("Created post {} with ID {}", post.slug, post.id);
        Ok(post)
    }

    #[tracing::instrument(skip(store, data))]
    pub async fn update(store: &PgStore, id: i32, data: &PostUpdateData) -> Result<Model> {
        validate(data.slug.as_deref(), data.title.as_deref())?;

        let pool = store.pool();
        let q = "UPDATE posts SET slug = COALESCE($2, slug), title = COALESCE($3, title), excerpt = CASE WHEN $4 THEN $5 ELSE excerpt END, content = COALESCE($6, content), cover_image = CASE WHEN $7 THEN $8 ELSE cover_image END, category_id = CASE WHEN $9 THEN $10 ELSE category_id END, published = COALESCE($11, published), featured = COALESCE($12, featured), reading_time = CASE WHEN $13 THEN $14 ELSE reading_time END, updated_at = NOW() WHERE id = $1 RETURNING *";

        let post: Option<Model> = write_or_raise("post.update", store.retry(), move || async move {
            sqlx::query_as::<_, Model>(q)
                .bind(id)
                .bind(&data.slug)
                .bind(&data.title)
                .bind(is_set(&data.excerpt))
                .bind(new_value(&data.excerpt))
                .bind(&data.content)
                .bind(is_set(&data.cover_image))
                .bind(new_value(&data.cover_image))
                .bind(is_set(&data.category_id))
                .bind(new_value(&data.category_id))
                .bind(data.published)
                .bind(data.featured)
                .bind(is_set(&data.reading_time))
                .bind(new_value(&data.reading_time))
                .fetch_optional(pool)
                .await
                .map_err(DatabaseError::Sqlx)
        })
        .await?;

        post.ok_or_else(|| not_found(id))
    }

    #[tracing::instrument(skip(store))]
    pub async fn delete(store: &PgStore, id: i32) -> Result<()> {
        let pool = store.pool();
        let q = "DELETE FROM posts WHERE id = $1";

        let result = write_or_raise("post.delete", store.retry(), move || async move {
            sqlx::query(q)
                .bind(id)
                .execute(pool)
                .await
                .map_err(DatabaseError::Sqlx)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tracing::info!("Deleted post with ID {id}");
        Ok(())
    }
}

fn not_found(id: i32) -> DatabaseError {
    let error = DatabaseError::Post(PostError::NotFound(id.to_string()));
    tracing::error!(%error, "Database write failed");
    error
}

fn validate(slug: Option<&str>, title: Option<&str>) -> Result<()> {
    if let Some(slug) = slug {
        if !validation::is_valid_slug(slug) {
            return Err(PostError::InvalidSlug(slug.to_owned()).into());
        }
    }

    if title.is_some_and(validation::is_blank) {
        return Err(PostError::EmptyTitle.into());
    }

    Ok(())
}
