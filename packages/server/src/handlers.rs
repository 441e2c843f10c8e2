//! HTTP handler functions for the geoscope API.
//!
//! Every endpoint is POST-only with a JSON body carrying a GeoJSON
//! `Feature` or `FeatureCollection`. Validation failures answer with a
//! short plain-text line; engine errors map to their status codes in
//! [`engine_error_response`].

use std::time::{Duration, Instant};

use actix_web::{web, HttpResponse};
use geoscope_engine::{CancelToken, EngineError};
use geoscope_models::{CompetitorCountResponse, GeoRequest};

use crate::AppState;

/// Soft request deadline; past it the zone pass is cancelled.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `POST /competitor-search`
///
/// Businesses of the requested NAF code inside the query polygon.
pub async fn competitor_search(
    state: web::Data<AppState>,
    body: web::Json<GeoRequest>,
) -> HttpResponse {
    let started = Instant::now();

    let Some(naf_code) = required_naf_code(&body) else {
        return HttpResponse::BadRequest().body("NAF code is required");
    };
    let geometry = match validated_polygon(&body) {
        Ok(geometry) => geometry,
        Err(response) => return response,
    };

    let engine = state.engine.clone();
    let result = web::block(move || engine.search(&geometry, &naf_code, true)).await;

    let response = match flatten(result) {
        Ok(businesses) => HttpResponse::Ok().json(businesses),
        Err(err) => engine_error_response(&err),
    };
    log::info!("competitor-search processed in {:?}", started.elapsed());
    response
}

/// `POST /competitor-count`
///
/// Same matching as the search endpoint, returning only the count.
pub async fn competitor_count(
    state: web::Data<AppState>,
    body: web::Json<GeoRequest>,
) -> HttpResponse {
    let started = Instant::now();

    let Some(naf_code) = required_naf_code(&body) else {
        return HttpResponse::BadRequest().body("NAF code is required");
    };
    let geometry = match validated_polygon(&body) {
        Ok(geometry) => geometry,
        Err(response) => return response,
    };

    let engine = state.engine.clone();
    let result = web::block(move || engine.search(&geometry, &naf_code, false)).await;

    let response = match flatten(result) {
        Ok(businesses) => HttpResponse::Ok().json(CompetitorCountResponse {
            number_of_competitors: businesses.len(),
        }),
        Err(err) => engine_error_response(&err),
    };
    log::info!("competitor-count processed in {:?}", started.elapsed());
    response
}

/// `POST /competition-data`
///
/// Competitor financial statistics for the matched businesses, grouped by
/// NAF code.
pub async fn competition_data(
    state: web::Data<AppState>,
    body: web::Json<GeoRequest>,
) -> HttpResponse {
    let started = Instant::now();

    let Some(naf_code) = required_naf_code(&body) else {
        return HttpResponse::BadRequest().body("NAF code is required");
    };
    let geometry = match validated_polygon(&body) {
        Ok(geometry) => geometry,
        Err(response) => return response,
    };

    let engine = state.engine.clone();
    let result = web::block(move || {
        let businesses = engine.search(&geometry, &naf_code, false)?;
        engine.competition(&businesses)
    })
    .await;

    let response = match flatten(result) {
        Ok(competition) => HttpResponse::Ok().json(competition),
        Err(err) => engine_error_response(&err),
    };
    log::info!("competition-data processed in {:?}", started.elapsed());
    response
}

/// `POST /iris-data`
///
/// Weighted demographic aggregation over the zones the polygon touches.
pub async fn iris_data(state: web::Data<AppState>, body: web::Json<GeoRequest>) -> HttpResponse {
    let started = Instant::now();

    let geometry = match validated_polygon(&body) {
        Ok(geometry) => geometry,
        Err(response) => return response,
    };

    let cancel = CancelToken::new();
    let deadline = cancel.clone();
    actix_web::rt::spawn(async move {
        actix_web::rt::time::sleep(REQUEST_TIMEOUT).await;
        deadline.cancel();
    });

    let engine = state.engine.clone();
    let result = web::block(move || engine.aggregate(&geometry, &cancel)).await;

    let response = match flatten(result) {
        Ok(iris) => HttpResponse::Ok().json(iris),
        Err(err) => engine_error_response(&err),
    };
    log::info!("iris-data processed in {:?}", started.elapsed());
    response
}

/// The non-empty NAF code of the request, if any.
fn required_naf_code(request: &GeoRequest) -> Option<String> {
    request
        .naf_code
        .as_deref()
        .filter(|code| !code.is_empty())
        .map(ToOwned::to_owned)
}

/// Validates the request's GeoJSON envelope and extracts the polygon
/// geometry as a JSON string.
fn validated_polygon(request: &GeoRequest) -> Result<String, HttpResponse> {
    match request.kind.as_str() {
        "Feature" | "FeatureCollection" => {}
        _ => {
            return Err(HttpResponse::BadRequest()
                .body("Invalid GeoJSON type. Must be either 'Feature' or 'FeatureCollection'"));
        }
    }

    if request.kind == "FeatureCollection" && request.features.is_empty() {
        return Err(HttpResponse::BadRequest().body("GeoJSON feature is required"));
    }

    let Some(geometry) = request.geometry() else {
        return Err(HttpResponse::BadRequest().body("GeoJSON geometry is required"));
    };

    if geometry["type"] != "Polygon" {
        return Err(HttpResponse::BadRequest().body("Only Polygon geometry type is supported"));
    }

    Ok(geometry.to_string())
}

/// Collapses the `web::block` join error into the engine error space.
fn flatten<T>(
    result: Result<Result<T, EngineError>, actix_web::error::BlockingError>,
) -> Result<T, EngineError> {
    result.map_err(|err| EngineError::Internal(err.to_string()))?
}

/// Status mapping for engine failures: bad geometry is the client's fault,
/// everything else is a 500 with a short plain-text line.
fn engine_error_response(err: &EngineError) -> HttpResponse {
    match err {
        EngineError::BadInput(_) | EngineError::Unsupported(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
        EngineError::NoIntersection => HttpResponse::InternalServerError().body(err.to_string()),
        EngineError::Cancelled => {
            log::warn!("request cancelled by the soft timeout");
            HttpResponse::InternalServerError().body(err.to_string())
        }
        EngineError::Dataset(_) | EngineError::Internal(_) => {
            log::error!("request failed: {err}");
            HttpResponse::InternalServerError().body("Error processing request")
        }
    }
}
