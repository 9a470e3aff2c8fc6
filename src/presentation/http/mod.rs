pub mod dto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use errors::AppError;
pub use server::{Handlers, HttpServer};
