use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::paginated::PageResult;
use crate::database::query::{
    Filter, OrderBy, PageRequest, RowStore, fetch_one, fetch_page, write_or_raise,
};
use crate::database::store::PgStore;
use crate::database::{DatabaseError, ModelExt, Result};
use crate::errors::project::ProjectError;
use crate::utils::patch::{self, is_set, new_value};
use crate::utils::validation;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCreateData {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Fields left as `None` keep their current value. Nullable columns take
/// `Some(None)` (a JSON `null`) to be cleared.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdateData {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub technologies: Option<Vec<String>>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub live_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch::nullable", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    pub featured: Option<bool>,
}

impl ModelExt for Model {
    const TABLE: &'static str = "projects";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::desc("created_at"), OrderBy::desc("id")];
}

impl Model {
    /// Projects marked as featured, newest first
    #[tracing::instrument(skip(store))]
    pub async fn featured<S>(store: &S, request: PageRequest) -> PageResult<Model>
    where
        S: RowStore<Model>,
    {
        let scan = Self::scan().filter(Filter::eq("featured", true));

        fetch_page(store, &scan, request).await
    }

    #[tracing::instrument(skip(store))]
    pub async fn fetch_by_slug<S>(store: &S, slug: &str) -> Option<Model>
    where
        S: RowStore<Model>,
    {
        fetch_one(store, &Self::scan().filter(Filter::eq("slug", slug))).await
    }

    #[tracing::instrument(skip(store, data), fields(slug = %data.slug))]
    pub async fn create(store: &PgStore, data: &ProjectCreateData) -> Result<Model> {
        validate(
            Some(&data.slug),
            Some(&data.title),
            [
                data.repo_url.as_deref(),
                data.live_url.as_deref(),
                data.image_url.as_deref(),
            ],
        )?;

        let pool = store.pool();
        let q = "INSERT INTO projects(slug, title, summary, description, technologies, repo_url, live_url, image_url, featured, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW()) RETURNING *";

        let project = write_or_raise("project.create", store.retry(), move || async move {
            sqlx::query_as::<_, Model>(q)
                .bind(&data.slug)
                .bind(&data.title)
                .bind(&data.summary)
                .bind(&data.description)
                .bind(&data.technologies)
                .bind(&data.repo_url)
                .bind(&data.live_url)
                .bind(&data.image_url)
                .bind(data.featured)
                .fetch_one(pool)
                .await
                .map_err(DatabaseError::Sqlx)
        })
        .await?;

        tracing::info!("Created project {} with ID {}", project.slug, project.id);
        Ok(project)
    }

    #[tracing::instrument(skip(store, data))]
    pub async fn update(store: &PgStore, id: i32, data: &ProjectUpdateData) -> Result<Model> {
        validate(
            data.slug.as_deref(),
            data.title.as_deref(),
            [
                new_value(&data.repo_url).map(String::as_str),
                new_value(&data.live_url).map(String::as_str),
                new_value(&data.image_url).map(String::as_str),
            ],
        )?;

        let pool = store.pool();
        let q = "UPDATE projects SET slug = COALESCE($2, slug), title = COALESCE($3, title), summary = COALESCE($4, summary), description = CASE WHEN $5 THEN $6 ELSE description END, technologies = COALESCE($7, technologies), repo_url = CASE WHEN $8 THEN $9 ELSE repo_url END, live_url = CASE WHEN $10 THEN $11 ELSE live_url END, image_url = CASE WHEN $12 THEN $13 ELSE image_url END, featured = COALESCE($14, featured), updated_at = NOW() WHERE id = $1 RETURNING *";

        let project = write_or_raise("project.update", store.retry(), move || async move {
            sqlx::query_as::<_, Model>(q)
                .bind(id)
                .bind(&data.slug)
                .bind(&data.title)
                .bind(&data.summary)
                .bind(is_set(&data.description))
                .bind(new_value(&data.description))
                .bind(&data.technologies)
                .bind(is_set(&data.repo_url))
                .bind(new_value(&data.repo_url))
                .bind(is_set(&data.live_url))
                .bind(new_value(&data.live_url))
                .bind(is_set(&data.image_url))
                .bind(new_value(&data.image_url))
                .bind(data.featured)
                .fetch_optional(pool)
                .await
                .map_err(DatabaseError::Sqlx)
        })
        .await?;

        project.ok_or_else(|| not_found(id))
    }

    #[tracing::instrument(skip(store))]
    pub async fn delete(store: &PgStore, id: i32) -> Result<()> {
        let pool = store.pool();
        let q = "DELETE FROM projects WHERE id = $1";

        let result = write_or_raise("project.delete", store.retry(), move || async move {
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

        tracing::info!("Deleted project with ID {id}");
        Ok(())
    }
}

fn not_found(id: i32) -> DatabaseError {
    let error = DatabaseError::Project(ProjectError::NotFound(id.to_string()));
    tracing::error!(%error, "Database write failed");
    error
}

fn validate(
    slug: Option<&str>,
    title: Option<&str>,
    links: [Option<&str>; 3],
) -> Result<()> {
    if let Some(slug) = slug {
        if !validation::is_valid_slug(slug) {
            return Err(ProjectError::InvalidSlug(slug.to_owned()).into());
        }
    }

    if title.is_some_and(validation::is_blank) {
        return Err(ProjectError::EmptyTitle.into());
    }

    for link in links.into_iter().flatten() {
        if !validation::is_valid_url(link) {
            return Err(ProjectError::InvalidUrl(link.to_owned()).into());
        }
    }

    Ok(())
}
