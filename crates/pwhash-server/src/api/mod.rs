//! HTTP API.
//!
//! | method | path                 | manager call  |
//! |--------|----------------------|---------------|
//! | POST   | `/api/v1/hash`       | `submit`      |
//! | GET    | `/api/v1/hash/{id}`  | `status`      |
//! | GET    | `/api/v1/stats`      | `stats`       |
//! | POST   | `/api/v1/shutdown`   | `shutdown`, then `await_idle` in the background |

mod error;
mod handlers;
mod request_id;
mod routes;

pub use error::{ApiError, ServerError};
pub use request_id::REQUEST_ID_HEADER;
pub use routes::{API_PREFIX, AppState, Server, router};
