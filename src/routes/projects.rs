use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::AppState;
use crate::database::ModelExt;
use crate::database::case_study::Model as CaseStudy;
use crate::database::project::{Model as Project, ProjectCreateData, ProjectUpdateData};
use crate::database::query::PageRequest;
use crate::errors::FolioError;
use crate::errors::project::ProjectError;
use crate::models::projects::{ProjectJson, ProjectResponse};
use crate::models::responses::{DeletedResponse, ListResponse};

#[get("")]
async fn project_list(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let request = query.into_inner();

    let projects = Project::fetch_all(&state.store, request).await;
    let response: ListResponse<ProjectJson> = ListResponse::new(projects, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/featured")]
async fn project_featured(
    state: web::Data<AppState>,
    query: web::Query<PageRequest>,
) -> Result<HttpResponse, FolioError> {
    let request = query.into_inner();

    let projects = Project::featured(&state.store, request).await;
    let response: ListResponse<ProjectJson> = ListResponse::new(projects, &request);

    Ok(HttpResponse::Ok().json(response))
}

#[get("/{slug}")]
async fn project_get(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, FolioError> {
    let slug = slug.into_inner();

    let project = Project::fetch_by_slug(&state.store, &slug)
        .await
        .ok_or(ProjectError::NotFound(slug))?;
    let case_study = CaseStudy::fetch_for_project(&state.store, project.id).await;

    let response = ProjectResponse {
        ok: true,
        project: project.into(),
        case_study: case_study.map(Into::into),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[post("/projects")]
async fn project_create(
    state: web::Data<AppState>,
    body: web::Json<ProjectCreateData>,
) -> Result<HttpResponse, FolioError> {
    let project = Project::create(&state.store, &body).await?;

    let response = ProjectResponse {
        ok: true,
        project: project.into(),
        case_study: None,
    };

    Ok(HttpResponse::Created().json(response))
}

#[put("/projects/{id}")]
async fn project_update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<ProjectUpdateData>,
) -> Result<HttpResponse, FolioError> {
    let project = Project::update(&state.store, id.into_inner(), &body).await?;
    let case_study = CaseStudy::fetch_for_project(&state.store, project.id).await;

    let response = ProjectResponse {
        ok: true,
        project: project.into(),
        case_study: case_study.map(Into::into),
    };

    Ok(HttpResponse::Ok().json(response))
}

#[delete("/projects/{id}")]
async fn project_delete(
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> Result<HttpResponse, FolioError> {
    let id = id.into_inner();

    Project::delete(&state.store, id).await?;

    Ok(HttpResponse::Ok().json(DeletedResponse { ok: true, id }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(project_list)
            .service(project_featured)
            .service(project_get),
    );
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(project_create)
        .service(project_update)
        .service(project_delete);
}
