//! Catch-all for paths no route is bound to.

use crate::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound
}
