use crate::database::ModelExt;
use crate::database::capabilities::Capability;
use crate::database::query::{Filter, OrderBy, ScanQuery, fetch_one};
use crate::database::store::PgStore;

/// Long-form write-up attached to a project. Lives in an optional table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub project_id: i32,
    pub challenge: String,
    pub solution: String,
    pub outcome: Option<String>,
}

impl ModelExt for Model {
    const TABLE: &'static str = "case_studies";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::asc("id")];
}

impl Model {
    fn for_project(project_id: i32) -> ScanQuery {
        Self::scan().filter(Filter::eq("project_id", project_id))
    }

    /// The case study of a project, if this deployment has case studies at all.
    #[tracing::instrument(skip(store))]
    pub async fn fetch_for_project(store: &PgStore, project_id: i32) -> Option<Model> {
        if !store.supports(Capability::CaseStudies).await {
            return None;
        }

        fetch_one(store, &Self::for_project(project_id)).await
    }
}
