pub mod ai;
pub mod models;
pub mod settings;
