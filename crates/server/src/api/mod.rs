pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod workflows;

pub use routes::create_router;
