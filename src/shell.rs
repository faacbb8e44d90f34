pub mod app;
pub mod page;
pub mod route;
