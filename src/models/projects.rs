use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::{case_study, project};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectJson {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseStudyJson {
    pub challenge: String,
    pub solution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectResponse {
    pub ok: bool,
    pub project: ProjectJson,
    /// Absent when the project has no case study or the deployment has no
    /// case studies table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_study: Option<CaseStudyJson>,
}

impl From<project::Model> for ProjectJson {
    fn from(project: project::Model) -> Self {
        Self {
            id: project.id,
            slug: project.slug,
            title: project.title,
            summary: project.summary,
            description: project.description,
            technologies: project.technologies,
            repo_url: project.repo_url,
            live_url: project.live_url,
            image_url: project.image_url,
            featured: project.featured,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl From<case_study::Model> for CaseStudyJson {
    fn from(case_study: case_study::Model) -> Self {
        Self {
            challenge: case_study.challenge,
            solution: case_study.solution,
            outcome: case_study.outcome,
        }
    }
}
