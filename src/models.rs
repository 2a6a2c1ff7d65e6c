pub mod portfolio;
pub mod posts;
pub mod projects;
pub mod responses;
