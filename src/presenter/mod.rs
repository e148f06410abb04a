pub mod csv;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::AppError;
use self::csv::{to_csv, CsvLayout};

/// Desired response representation. Clients name it in the `Content-Type`
/// request header; a missing header means JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Csv,
}

impl ResponseFormat {
    pub fn from_content_type(value: Option<&str>) -> Result<Self, AppError> {
        let Some(value) = value else {
            return Ok(ResponseFormat::Json);
        };
        // Media type parameters such as charset do not matter here.
        let media_type = value.split(';').next().unwrap_or_default().trim();
        if media_type.eq_ignore_ascii_case("application/json") {
            Ok(ResponseFormat::Json)
        } else if media_type.eq_ignore_ascii_case("text/csv") {
            Ok(ResponseFormat::Csv)
        } else {
            Err(AppError::unprocessable("Invalid type"))
        }
    }

    /// JSON renders `body`; CSV renders only the flat `records`.
    pub fn render<B, R>(self, body: &B, records: &[R], layout: &CsvLayout) -> Result<Response, AppError>
    where
        B: Serialize,
        R: Serialize,
    {
        match self {
            ResponseFormat::Json => Ok(Json(body).into_response()),
            ResponseFormat::Csv => {
                let document = to_csv(records, layout)
                    .map_err(|e| AppError::internal(format!("CSV rendering failed: {e}")))?;
                Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], document).into_response())
            }
        }
    }
}

impl<S> FromRequestParts<S> for ResponseFormat
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = match parts.headers.get(header::CONTENT_TYPE) {
            Some(v) => Some(v.to_str().map_err(|_| AppError::unprocessable("Invalid type"))?),
            None => None,
        };
        ResponseFormat::from_content_type(value)
    }
}
