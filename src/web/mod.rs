//! HTTP API
//!
//! JSON endpoints for answers, raw provider search, the loaded document
//! and the answer flags.

mod handlers;
mod routes;
mod state;

pub use handlers::{AnswerRequest, DocumentInfo, Flags, SearchResponse};
pub use routes::create_router;
pub use state::{AppState, Session};
