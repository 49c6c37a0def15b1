use axum::Json;

use crate::error::MessageResponse;

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse::new("OK"))
}
