//! SWIFT code handlers.
//!
//! GET    /v1/swift-codes/:swift_code            detail (headquarters include branches)
//! GET    /v1/swift-codes/country/:country_iso2  all codes for a country
//! POST   /v1/swift-codes                        create
//! DELETE /v1/swift-codes/:swift_code            delete

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    Extension, Json,
};
use swift_core::{CountrySwiftCodes, NewSwiftCode, SwiftCodeDetail, SwiftCodeService, SwiftError};

use crate::error::{AppError, MessageResponse};

pub async fn get_swift_code(
    Extension(service): Extension<Arc<dyn SwiftCodeService>>,
    Path(swift_code): Path<String>,
) -> Result<Json<SwiftCodeDetail>, AppError> {
    let detail = service.get_swift_code(&swift_code).await?;
    Ok(Json(detail))
}

pub async fn get_country(
    Extension(service): Extension<Arc<dyn SwiftCodeService>>,
    Path(country_iso2): Path<String>,
) -> Result<Json<CountrySwiftCodes>, AppError> {
    let resp = service.get_country(&country_iso2).await?;
    Ok(Json(resp))
}

pub async fn add_swift_code(
    Extension(service): Extension<Arc<dyn SwiftCodeService>>,
    body: Result<Json<NewSwiftCode>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(request) = body.map_err(|e| SwiftError::Validation(e.body_text()))?;
    service.add_swift_code(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("SWIFT code added successfully")),
    ))
}

pub async fn delete_swift_code(
    Extension(service): Extension<Arc<dyn SwiftCodeService>>,
    Path(swift_code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_swift_code(&swift_code).await?;
    Ok(Json(MessageResponse::new("SWIFT code deleted successfully")))
}
