//! HTTP/JSON 接口

mod dto;
mod error;
mod handlers;
mod middleware;
mod routes;
mod schema;
mod state;

pub use dto::{MessageResponse, OrderResponse, ProductResponse, UserResponse};
pub use error::ApiError;
pub use routes::router;
pub use schema::{FieldReader, LoadSchema, load};
pub use state::{AppState, ReadinessProbe};
