use crate::database::ModelExt;
use crate::database::query::OrderBy;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Model {
    pub id: i32,
    pub name: String,
    pub category: String,
    /// 0 to 100
    pub proficiency: i32,
    pub icon: Option<String>,
}

impl ModelExt for Model {
    const TABLE: &'static str = "skills";
    const DEFAULT_ORDER: &'static [OrderBy] = &[OrderBy::desc("proficiency"), OrderBy::asc("name")];
}
