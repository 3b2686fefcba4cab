pub mod developers;
pub mod projects;
pub mod system;
