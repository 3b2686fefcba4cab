pub mod context;
pub mod developers;
pub mod projects;
