pub mod auth;
pub mod categories;
pub mod content;
pub mod error;
pub mod pagination;
pub mod posts;
pub mod render;
pub mod repos;
pub mod uploads;
