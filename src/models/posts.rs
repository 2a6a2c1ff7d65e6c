use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::post;
use crate::models::portfolio::{CategoryJson, TagJson};
use crate::models::responses::ListResponse;

/// A post as it appears in lists. The body is only sent with a single post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostJson {
    pub id: i32,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i32>,
    pub published: bool,
    pub featured: bool,
    /// Estimated reading time in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetailJson {
    #[serde(flatten)]
    pub post: PostJson,
    pub content: String,
    pub tags: Vec<TagJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostResponse {
    pub ok: bool,
    pub post: PostDetailJson,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPostsResponse {
    #[serde(flatten)]
    pub list: ListResponse<PostJson>,
    pub category: Option<CategoryJson>,
}

impl From<post::Model> for PostJson {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            cover_image: post.cover_image,
            category_id: post.category_id,
            published: post.published,
            featured: post.featured,
            reading_time: post.reading_time,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl PostDetailJson {
    pub fn new(mut post: post::Model, tags: Vec<TagJson>) -> Self {
        let content = std::mem::take(&mut post.content);

        Self {
            post: post.into(),
            content,
            tags,
        }
    }
}
