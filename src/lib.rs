pub mod app;
pub mod catalog;
pub mod description;
pub mod detail_format;
pub mod grid;
pub mod models;
pub mod posters;
pub mod ranking;
pub mod sections;
pub mod text;
