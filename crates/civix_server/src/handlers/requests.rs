//! Service request endpoints: submission (form-encoded, per the GeoReport
//! convention) and retrieval, in JSON and XML.
//!
//! Attribute values arrive as `attribute[KEY]=value` form entries; a key
//! may repeat for multi-select lists. Everything here is parsing — the
//! rules live in `civix_core`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Form, Path, Query};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use civix_core::error::CivicError;
use civix_core::ports::{RequestFilters, DEFAULT_PAGE_SIZE};
use civix_core::service::{CivicService, CreateServiceRequestInput};
use civix_core::types::RequestStatus;
use civix_core::validation::RawAttributes;

use crate::dto::ServiceRequestDto;
use crate::error::AppError;
use crate::xml;

// ── Submission ────────────────────────────────────────────────

pub async fn create_json(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Query(params): Query<HashMap<String, String>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Json<Vec<ServiceRequestDto>>, AppError> {
    let input = build_create_input(&params, pairs)?;
    let created = service.create_service_request(input).await?;
    Ok(Json(vec![created.into()]))
}

pub async fn create_xml(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Query(params): Query<HashMap<String, String>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let input = build_create_input(&params, pairs)?;
    let created = service.create_service_request(input).await?;
    let dtos = vec![ServiceRequestDto::from(created)];
    Ok(xml::response(xml::render_requests(&dtos)?))
}

fn build_create_input(
    params: &HashMap<String, String>,
    pairs: Vec<(String, String)>,
) -> Result<CreateServiceRequestInput, CivicError> {
    let mut input = CreateServiceRequestInput::default();
    let mut attributes = RawAttributes::new();

    for (key, value) in pairs {
        if let Some(code) = key
            .strip_prefix("attribute[")
            .and_then(|k| k.strip_suffix(']'))
        {
            attributes.push(code, value);
            continue;
        }
        match key.as_str() {
            "jurisdiction_id" => input.jurisdiction_id = value,
            "service_code" => input.service_code = value,
            "address_string" => input.address = Some(value),
            "description" => input.description = Some(value),
            "media" => input.media = Some(value),
            "lat" => input.latitude = Some(parse_coordinate(&value, "lat")?),
            "long" => input.longitude = Some(parse_coordinate(&value, "long")?),
            // Unknown form fields are ignored, matching attribute handling.
            _ => {}
        }
    }

    // A query-string jurisdiction wins over a form field.
    if let Some(id) = params.get("jurisdiction_id") {
        input.jurisdiction_id = id.clone();
    }
    if input.service_code.trim().is_empty() {
        return Err(CivicError::BadRequest("service_code is required".into()));
    }
    input.attributes = attributes;
    Ok(input)
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, CivicError> {
    raw.parse()
        .map_err(|_| CivicError::BadRequest(format!("invalid {field}: {raw}")))
}

// ── Retrieval ─────────────────────────────────────────────────

pub async fn list_json(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ServiceRequestDto>>, AppError> {
    Ok(Json(list(&*service, &params).await?))
}

pub async fn list_xml(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let dtos = list(&*service, &params).await?;
    Ok(xml::response(xml::render_requests(&dtos)?))
}

async fn list(
    service: &dyn CivicService,
    params: &HashMap<String, String>,
) -> Result<Vec<ServiceRequestDto>, AppError> {
    let filters = parse_filters(params)?;
    let requests = service
        .find_service_requests(params.get("jurisdiction_id").map(String::as_str), filters)
        .await?;
    Ok(requests.into_iter().map(ServiceRequestDto::from).collect())
}

/// One request by id. The path segment may carry a `.json` or `.xml`
/// format suffix; axum cannot match suffixes, so it is peeled off here.
pub async fn get_one(
    Extension(service): Extension<Arc<dyn CivicService>>,
    Path(raw_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let (id_part, want_xml) = match raw_id.strip_suffix(".xml") {
        Some(stripped) => (stripped, true),
        None => (raw_id.strip_suffix(".json").unwrap_or(&raw_id), false),
    };
    let id = Uuid::parse_str(id_part)
        .map_err(|_| CivicError::BadRequest(format!("invalid service request id: {id_part}")))?;

    let jurisdiction_id = params
        .get("jurisdiction_id")
        .map(String::as_str)
        .unwrap_or_default();
    let request = service.get_service_request(jurisdiction_id, id).await?;
    let dtos = vec![ServiceRequestDto::from(request)];
    if want_xml {
        Ok(xml::response(xml::render_requests(&dtos)?))
    } else {
        Ok(Json(dtos).into_response())
    }
}

fn parse_filters(params: &HashMap<String, String>) -> Result<RequestFilters, CivicError> {
    let mut filters = RequestFilters::default();
    if let Some(ids) = params.get("service_request_id") {
        for raw in ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = Uuid::parse_str(raw).map_err(|_| {
                CivicError::BadRequest(format!("invalid service request id: {raw}"))
            })?;
            filters.ids.push(id);
        }
    }
    filters.service_code = params.get("service_code").cloned();
    if let Some(raw) = params.get("status") {
        filters.status = Some(
            RequestStatus::from_str(raw)
                .ok_or_else(|| CivicError::BadRequest(format!("unknown status: {raw}")))?,
        );
    }
    if let Some(raw) = params.get("start_date") {
        filters.start_date = Some(parse_datetime(raw, "start_date")?);
    }
    if let Some(raw) = params.get("end_date") {
        filters.end_date = Some(parse_datetime(raw, "end_date")?);
    }
    // Pagination: `page` is zero-based and sized by `page_size`.
    if let Some(raw) = params.get("page_size") {
        filters.limit = Some(parse_page_number(raw, "page_size", 1)?);
    }
    if let Some(raw) = params.get("page") {
        let page = parse_page_number(raw, "page", 0)?;
        filters.offset = Some(page * filters.limit.unwrap_or(DEFAULT_PAGE_SIZE));
    }
    Ok(filters)
}

fn parse_page_number(raw: &str, field: &str, min: i64) -> Result<i64, CivicError> {
    raw.parse::<i64>()
        .ok()
        .filter(|n| *n >= min)
        .ok_or_else(|| CivicError::BadRequest(format!("invalid {field}: {raw}")))
}

fn parse_datetime(raw: &str, field: &str) -> Result<DateTime<Utc>, CivicError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CivicError::BadRequest(format!("invalid {field}: {raw}")))
}
