use actix_web::{HttpResponse, get, web};

use crate::AppState;
use crate::database::ModelExt;
use crate::database::category::Model as Category;
use crate::database::query::PageRequest;
use crate::database::skill::Model as Skill;
use crate::database::tag::Model as Tag;
use crate::database::timeline::Model as TimelineEntry;
use crate::errors::FolioError;
use crate::models::portfolio::{
    CategoryListResponse, SkillJson, TagListResponse, TimelineEntryJson,
};
use crate::models::responses::ListResponse;

#[get("/skills")]
async fn skill_list(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let request = query.into_inner();

    let skills = Skill::fetch_all(&state.store, request).await;
    let response: ListResponse<SkillJson> = ListResponse::new(skills, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/timeline")]
async fn timeline_list(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let request = query.into_inner();

    let entries = TimelineEntry::fetch_all(&state.store, request).await;
    let response: ListResponse<TimelineEntryJson> = ListResponse::new(entries, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/categories")]
async fn category_list(state: web::Data<AppState>) -> Result<HttpResponse, FolioError> {
    let categories = Category::all(&state.store)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(CategoryListResponse {
        ok: true,
        categories,
    }))
}

#[get("/tags")]
async fn tag_list(state: web::Data<AppState>) -> Result<HttpResponse, FolioError> {
    let tags = Tag::all(&state.store)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(TagListResponse { ok: true, tags }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(skill_list)
        .service(timeline_list)
        .service(category_list)
        .service(tag_list);
}
