use chrono::NaiveDate;

use crate::database::ModelExt;
use crate::database::query::OrderBy;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub title: String,
    pub organization: String,
    pub description: Option<String>,
    /// `work`, `education` or anything else worth a line on the timeline
    pub kind: String,
    pub start_date: NaiveDate,
    /// `None` while ongoing
    pub end_date: Option<NaiveDate>,
}

impl ModelExt for Model {
    const TABLE: &'static str = "timeline_entries";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::desc("start_date"), OrderBy::desc("id")];
}

impl Model {
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}
