mod error;
mod handler;
mod router;

pub use error::{ApiError, catch_errors, recover_error};
pub use handler::{ApiResponse, ProductData};
pub use router::routes;
