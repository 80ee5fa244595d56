//! Tenant configuration endpoint. The calling UI does not know its
//! jurisdiction; we resolve it from the host the page was served from.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, HeaderMap};
use axum::Json;

use civix_core::error::CivicError;
use civix_core::service::CivicService;

use crate::dto::JurisdictionDto;
use crate::error::AppError;

pub async fn jurisdiction_config(
    Extension(service): Extension<Arc<dyn CivicService>>,
    headers: HeaderMap,
) -> Result<Json<JurisdictionDto>, AppError> {
    let host = caller_host(&headers).ok_or_else(|| {
        CivicError::BadRequest("unable to determine caller host from referer".into())
    })?;
    let jurisdiction = service.resolve_jurisdiction_by_host(&host).await?;
    Ok(Json(jurisdiction.into()))
}

/// Host the UI was served from: the referer's host, falling back to the
/// request's own Host header.
fn caller_host(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(header::REFERER)
        .or_else(|| headers.get(header::HOST))?
        .to_str()
        .ok()?;
    Some(host_of(raw))
}

fn host_of(raw: &str) -> String {
    let no_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let no_path = no_scheme.split(['/', '?']).next().unwrap_or(no_scheme);
    no_path.split(':').next().unwrap_or(no_path).to_string()
}
