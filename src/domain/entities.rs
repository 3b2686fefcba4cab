pub mod developer;
pub mod developer_info;
pub mod project;
pub mod technology;
