use chrono::NaiveDate;
use serde::Serialize;

use crate::database::{category, skill, tag, timeline};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillJson {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub proficiency: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntryJson {
    pub id: i32,
    pub title: String,
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryJson {
    pub id: i32,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagJson {
    pub id: i32,
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListResponse {
    pub ok: bool,
    pub categories: Vec<CategoryJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagListResponse {
    pub ok: bool,
    pub tags: Vec<TagJson>,
}

impl From<skill::Model> for SkillJson {
    fn from(skill: skill::Model) -> Self {
        Self {
            id: skill.id,
            name: skill.name,
            category: skill.category,
            proficiency: skill.proficiency,
            icon: skill.icon,
        }
    }
}

impl From<timeline::Model> for TimelineEntryJson {
    fn from(entry: timeline::Model) -> Self {
        Self {
            current: entry.is_current(),
            id: entry.id,
            title: entry.title,
            organization: entry.organization,
            description: entry.description,
            kind: entry.kind,
            start_date: entry.start_date,
            end_date: entry.end_date,
        }
    }
}

impl From<category::Model> for CategoryJson {
    fn from(category: category::Model) -> Self {
        Self {
            id: category.id,
            slug: category.slug,
            name: category.name,
            description: category.description,
        }
    }
}

impl From<tag::Model> for TagJson {
    fn from(tag: tag::Model) -> Self {
        Self {
            id: tag.id,
            slug: tag.slug,
            name: tag.name,
        }
    }
}
