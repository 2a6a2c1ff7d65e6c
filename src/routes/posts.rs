use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::AppState;
use crate::database::ModelExt;
use crate::database::category::Model as Category;
use crate::database::post::{Model as Post, PostCreateData, PostUpdateData};
use crate::database::query::PageRequest;
use crate::database::tag::Model as Tag;
use crate::errors::FolioError;
use crate::errors::post::PostError;
use crate::models::posts::{CategoryPostsResponse, PostDetailJson, PostJson, PostResponse};
use crate::models::responses::{DeletedResponse, ListResponse};

#[get("")]
async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let request = query.into_inner();

    let posts = Post::published(&state.store, request).await;
    let response: ListResponse<PostJson> = ListResponse::new(posts, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/featured")]
async fn post_featured(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let request = query.into_inner();

    let posts = Post::featured(&state.store, request).await;
    let response: ListResponse<PostJson> = ListResponse::new(posts, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/category/{slug}")]
async fn post_by_category(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let slug = slug.into_inner();
    let request = query.into_inner();

    let category = Category::fetch_by_slug(&state.store, &slug).await;
    let posts = Post::by_category(&state.store, &slug, request).await;

    let response = CategoryPostsResponse {
        list: ListResponse::new(posts, &request),
        category: category.map(Into::into),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[get("/tag/{slug}")]
async fn post_by_tag(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let slug = slug.into_inner();
    let request = query.into_inner();

    let posts = Post::by_tag(&state.store, &slug, request).await;
    let response: ListResponse<PostJson> = ListResponse::new(posts, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/{slug}")]
async fn post_get(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, FolioError> {
    let slug = slug.into_inner();

    let post = Post::fetch_by_slug(&state.store, &slug)
        .await
        .ok_or(PostError::NotFound(slug))?;
    let tags = Tag::for_post(&state.store, post.id)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    let response = PostResponse {
        ok: true,
        post: PostDetailJson::new(post, tags),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[post("/posts")]
async fn post_create(
    state: web::Data<AppState>,
    body: web::Json<PostCreateData>,
) -> Result<HttpResponse, FolioError> {
    let post = Post::create(&state.store, &body).await?;

    let response = PostResponse {
        ok: true,
        post: PostDetailJson::new(post, Vec::new()),
    };

    Ok(HttpResponse::Created().json(response))
}

#[put("/posts/{id}")]
async fn post_update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<PostUpdateData>,
) -> Result<HttpResponse, FolioError> {
    let post = Post::update(&state.store, id.into_inner(), &body).await?;
    let tags = Tag::for_post(&state.store, post.id)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    let response = PostResponse {
        ok: true,
        post: PostDetailJson::new(post, tags),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[delete("/posts/{id}")]
async fn post_delete(
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, FolioError> {
    let id = id.into_inner();

    Post::delete(&state.store, id).await?;

    Ok(HttpResponse::Ok().json(DeletedResponse { ok: true, id }))
}

/// Admin-only lookup by ID, including unpublished drafts.
#[get("/posts/{id}")]
async fn post_get_by_id(
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, FolioError> {
    let id = id.into_inner();

    let post = Post::fetch_by_id(&state.store, id)
        .await
        .ok_or_else(|| PostError::NotFound(id.to_string()))?;

    let response = PostResponse {
        ok: true,
        post: PostDetailJson::new(post, Vec::new()),
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .service(post_list)
            .service(post_featured)
            .service(post_by_category)
            .service(post_by_tag)
            .service(post_get),
    );
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(post_get_by_id)
        .service(post_create)
        .service(post_update)
        .service(post_delete);
}
