pub mod config;
pub mod layout;
pub mod page;
pub mod render;
