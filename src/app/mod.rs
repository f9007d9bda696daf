// HTTP boundary: router, handlers, and the JSON/status mapping.

pub mod handlers;
pub mod response;
pub mod router;

pub use router::{build_router, AppState};
