//! HTTP route handlers.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, FareTable, Route};
use crate::fare::{FareQuote, FareRequest, quote_fare};
use crate::geocoding::{
    DEFAULT_MAX_DISTANCE_KM, DEFAULT_MAX_RESULTS, GeocodingError, Place, find_nearest_stops,
};
use crate::planner::{JourneyPlan, Planner};

use super::dto::*;
use super::state::AppState;

/// Most routes returned by a route search.
const MAX_ROUTE_RESULTS: usize = 10;

/// Most stops returned by a stop search.
const MAX_STOP_RESULTS: usize = 20;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/resources/routes", get(all_routes))
        .route("/resources/stops", get(all_stops))
        .route("/resources/fares", get(fare_structure))
        .route("/resources/system", get(system_info))
        .route("/tools/routes/search", get(search_routes))
        .route("/tools/routes/:number", get(route_details))
        .route("/tools/routes/:number/stops", get(route_stops))
        .route("/tools/stops/search", get(search_stops))
        .route("/tools/stops/nearest", get(nearest_stops))
        .route("/tools/stops/:name/routes", get(stop_routes))
        .route("/tools/connections", get(connections))
        .route("/tools/journey/plan", post(plan_journey))
        .route("/tools/fare", post(calculate_fare))
        .route("/tools/geocode", get(geocode))
        .route("/tools/geocode/reverse", get(reverse_geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every route, keyed by route number.
async fn all_routes(State(state): State<AppState>) -> Response {
    Json(KeyedTable::routes(state.dataset.routes())).into_response()
}

/// Every stop, keyed by stop id.
async fn all_stops(State(state): State<AppState>) -> Response {
    Json(KeyedTable::stops(state.dataset.stops())).into_response()
}

async fn fare_structure(State(state): State<AppState>) -> Json<FareTable> {
    Json(state.dataset.fares().clone())
}

/// The database's metadata block.
async fn system_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.dataset.metadata().clone())
}

/// Search routes by number or name.
async fn search_routes(
    State(state): State<AppState>,
    Query(req): Query<SearchQuery>,
) -> Json<RouteSearchResponse> {
    let matches = state.dataset.search_routes(&req.query);
    info!(query = %req.query, results = matches.len(), "Route search complete");

    Json(RouteSearchResponse {
        total_results: matches.len(),
        routes: matches
            .into_iter()
            .take(MAX_ROUTE_RESULTS)
            .map(RouteEntry::from)
            .collect(),
        query: req.query,
    })
}

/// Search stops by name or city.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<SearchQuery>,
) -> Json<StopSearchResponse> {
    let matches = state.dataset.search_stops(&req.query);
    info!(query = %req.query, results = matches.len(), "Stop search complete");

    Json(StopSearchResponse {
        total_results: matches.len(),
        stops: matches
            .into_iter()
            .take(MAX_STOP_RESULTS)
            .map(StopEntry::from)
            .collect(),
        query: req.query,
    })
}

fn find_route<'a>(state: &'a AppState, number: &str) -> Result<&'a Route, AppError> {
    state
        .dataset
        .get_route_info(number)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Route {number} not found"),
        })
}

/// Full record for one route.
async fn route_details(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<RouteEntry>, AppError> {
    let route = find_route(&state, &number)?;
    info!(route = %number, stops = route.stop_count(), "Route details retrieved");
    Ok(Json(RouteEntry::from(route)))
}

/// Ordered stops for one route.
async fn route_stops(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<RouteStopsResponse>, AppError> {
    let route = find_route(&state, &number)?;

    Ok(Json(RouteStopsResponse {
        route_name: route.name.clone(),
        total_stops: route.stop_count(),
        stops: route.stops.clone(),
        route_number: number,
    }))
}

/// Routes passing through a stop.
async fn stop_routes(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<StopRoutesResponse> {
    let routes = state.dataset.get_routes_for_stop(&name);
    info!(stop = %name, routes = routes.len(), "Routes for stop");

    Json(StopRoutesResponse {
        total_routes: routes.len(),
        routes,
        stop_name: name,
    })
}

/// Direct routes between two places.
async fn connections(
    State(state): State<AppState>,
    Query(req): Query<ConnectionsQuery>,
) -> Json<ConnectionsResponse> {
    let routes = Planner::new(&state.dataset, &state.config).find_routes(&req.from_stop, &req.to_stop);
    info!(
        from = %req.from_stop,
        to = %req.to_stop,
        routes = routes.len(),
        "Route matching complete"
    );

    Json(ConnectionsResponse {
        from: req.from_stop,
        to: req.to_stop,
        routes_found: routes.len(),
        routes,
    })
}

/// Parse a JSON body, logging it on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(body), "Rejected request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Plan a journey between two places.
async fn plan_journey(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JourneyPlan>, AppError> {
    let req: PlanJourneyRequest = parse_json(&body)?;
    info!(start = %req.start, end = %req.end, "Journey planning requested");

    let plan = Planner::new(&state.dataset, &state.config).plan_journey(
        &req.start,
        &req.end,
        &req.preferences,
    );
    info!(
        journey_type = plan.journey_type(),
        routes = plan.route_count(),
        minutes = ?plan.estimated_time_minutes(),
        "Journey planned"
    );

    Ok(Json(plan))
}

/// Quote a fare from a distance or two stop names.
async fn calculate_fare(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FareQuote>, AppError> {
    let req: FareRequest = parse_json(&body)?;
    let quote = quote_fare(
        state.dataset.fares(),
        &state.geocoder,
        req,
        &state.default_city,
    )
    .await;

    Ok(Json(quote))
}

fn checked_coordinates(lat: f64, lon: f64) -> Result<Coordinates, AppError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::BadRequest {
            message: format!("Invalid coordinates: {lat}, {lon}"),
        });
    }
    Ok(Coordinates::new(lat, lon))
}

/// Stops within walking distance of a point.
async fn nearest_stops(
    State(state): State<AppState>,
    Query(req): Query<NearestStopsQuery>,
) -> Result<Json<NearestStopsResponse>, AppError> {
    let location = checked_coordinates(req.lat, req.lon)?;
    let stops = find_nearest_stops(
        &state.dataset,
        location,
        req.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        req.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM),
    );
    info!(%location, found = stops.len(), "Nearest stops");

    Ok(Json(NearestStopsResponse {
        location,
        total_results: stops.len(),
        stops,
    }))
}

/// Resolve a place name to coordinates.
async fn geocode(
    State(state): State<AppState>,
    Query(req): Query<GeocodeQuery>,
) -> Result<Json<Place>, AppError> {
    let city = req
        .city
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(&*state.default_city);

    let place = state.geocoder.geocode(&req.name, city).await?;
    Ok(Json(place))
}

/// Address details for a point.
async fn reverse_geocode(
    State(state): State<AppState>,
    Query(req): Query<ReverseGeocodeQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let at = checked_coordinates(req.lat, req.lon)?;
    let address = state.geocoder.reverse_geocode(at).await?;
    Ok(Json(address))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Unavailable { message: String },
}

impl From<GeocodingError> for AppError {
    fn from(e: GeocodingError) -> Self {
        let message = e.to_string();
        match e {
            GeocodingError::NotFound(_) => AppError::NotFound { message },
            GeocodingError::NotConfigured(_) => AppError::Unavailable { message },
            GeocodingError::Http(_)
            | GeocodingError::Api { .. }
            | GeocodingError::Json(_)
            | GeocodingError::InvalidCoordinate(_) => AppError::BadGateway { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "Request failed");
        } else {
            debug!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::{CachedGeocoder, GeocodeCacheConfig};
    use crate::dataset::Dataset;
    use crate::domain::{FareSlab, Stop};
    use crate::geocoding::Geocoder;
    use crate::planner::PlannerConfig;

    fn route(number: &str, name: &str, stops: &[&str]) -> Route {
        Route::new(
            number,
            name,
            stops.iter().map(|s| (*s).to_string()).collect(),
            12.5,
            "",
        )
        .unwrap()
    }

    fn dataset() -> Dataset {
        let stops = vec![
            Stop::new("kiit_square", "KIIT Square", "Bhubaneswar")
                .with_coordinates(Coordinates::new(20.3538, 85.8189)),
            Stop::new("patia_square", "Patia Square", "Bhubaneswar")
                .with_coordinates(Coordinates::new(20.3490, 85.8200)),
            Stop::new("vani_vihar", "Vani Vihar", "Bhubaneswar"),
        ];
        let routes = vec![
            route(
                "10",
                "Master Canteen - Patia",
                &["Master Canteen", "AG Square", "KIIT Square", "Patia Square"],
            ),
            route("21", "Airport - Vani Vihar", &["Airport", "Rajmahal", "Vani Vihar"]),
            route(
                "22",
                "Vani Vihar - Nandankanan",
                &["Vani Vihar", "Jaydev Vihar", "Nandankanan"],
            ),
        ];
        let fares = FareTable::new(vec![
            FareSlab::new(0.0, 5.0, 10).unwrap(),
            FareSlab::new(5.0, 10.0, 15).unwrap(),
            FareSlab::new(10.0, 15.0, 20).unwrap(),
        ]);

        Dataset::new(stops, routes, fares)
            .with_metadata(serde_json::json!({"system": "Mo Bus", "total_routes": 3}))
    }

    fn app_with(dataset: Dataset) -> Router {
        // No providers: every lookup fails
        let geocoder = CachedGeocoder::new(Geocoder::new(Vec::new()), &GeocodeCacheConfig::default());
        create_router(AppState::new(
            dataset,
            geocoder,
            PlannerConfig::default(),
            "Bhubaneswar",
        ))
    }

    fn app() -> Router {
        app_with(dataset())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn health_check() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn resources() {
        let (status, routes) = get(app(), "/resources/routes").await;
        assert_eq!(status, StatusCode::OK);
        let keys: Vec<_> = routes.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["10", "21", "22"]);
        assert_eq!(routes["10"]["route_name"], "Master Canteen - Patia");

        let (_, stops) = get(app(), "/resources/stops").await;
        assert_eq!(stops["kiit_square"]["name"], "KIIT Square");

        let (_, fares) = get(app(), "/resources/fares").await;
        assert_eq!(fares["distance_slabs"].as_array().unwrap().len(), 3);

        let (_, system) = get(app(), "/resources/system").await;
        assert_eq!(system["system"], "Mo Bus");
    }

    #[tokio::test]
    async fn resources_echo_sparse_records() {
        let dataset = Dataset::from_json_str(
            r#"{
                "stops": {"depot_7": {"name": "Depot 7", "city": "Cuttack"}},
                "routes": {"5": {"stops": ["Depot 7", "Badambadi"]}}
            }"#,
        )
        .unwrap();
        let app = app_with(dataset);

        let (_, routes) = get(app.clone(), "/resources/routes").await;
        assert_eq!(
            routes,
            serde_json::json!({"5": {"stops": ["Depot 7", "Badambadi"]}})
        );

        let (_, stops) = get(app.clone(), "/resources/stops").await;
        assert_eq!(
            stops,
            serde_json::json!({"depot_7": {"name": "Depot 7", "city": "Cuttack"}})
        );

        let (_, found) = get(app, "/tools/stops/search?query=depot").await;
        assert_eq!(found["stops"][0]["id"], "depot_7");
    }

    #[tokio::test]
    async fn route_search_is_capped() {
        let routes = (1..=15)
            .map(|i| route(&i.to_string(), &format!("Line {i}"), &["A", "B"]))
            .collect();
        let app = app_with(Dataset::new(Vec::new(), routes, FareTable::default()));

        let (status, json) = get(app, "/tools/routes/search?query=line").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"], "line");
        assert_eq!(json["total_results"], 15);
        assert_eq!(json["routes"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn stop_search() {
        let (status, json) = get(app(), "/tools/stops/search?query=square").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_results"], 2);
        assert_eq!(json["stops"][0]["id"], "kiit_square");
    }

    #[tokio::test]
    async fn route_details_and_not_found() {
        let (status, json) = get(app(), "/tools/routes/10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["route_number"], "10");
        assert_eq!(json["stops"].as_array().unwrap().len(), 4);

        let (status, json) = get(app(), "/tools/routes/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, serde_json::json!({"error": "Route 99 not found"}));
    }

    #[tokio::test]
    async fn stops_for_route() {
        let (status, json) = get(app(), "/tools/routes/21/stops").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["route_number"], "21");
        assert_eq!(json["route_name"], "Airport - Vani Vihar");
        assert_eq!(json["total_stops"], 3);
        assert_eq!(json["stops"][2], "Vani Vihar");

        let (status, _) = get(app(), "/tools/routes/99/stops").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn routes_for_stop() {
        let (status, json) = get(app(), "/tools/stops/Vani%20Vihar/routes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stop_name"], "Vani Vihar");
        assert_eq!(json["total_routes"], 2);
        assert_eq!(json["routes"][0]["route_number"], "21");
    }

    #[tokio::test]
    async fn direct_connections() {
        let (status, json) = get(
            app(),
            "/tools/connections?from_stop=AG%20Square&to_stop=Patia%20Square",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["from"], "AG Square");
        assert_eq!(json["routes_found"], 1);
        assert_eq!(json["routes"][0]["stops_between"], 2);
        assert_eq!(
            json["routes"][0]["all_stops"],
            serde_json::json!(["AG Square", "KIIT Square", "Patia Square"])
        );
    }

    #[tokio::test]
    async fn plan_direct() {
        let (status, json) = post(
            app(),
            "/tools/journey/plan",
            serde_json::json!({"start": "AG Square", "end": "Patia Square"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["journey_type"], "direct");
        assert_eq!(json["estimated_time_minutes"], 6);
        assert_eq!(json["recommended_route"]["stops_count"], 3);
    }

    #[tokio::test]
    async fn plan_with_transfer() {
        let (_, json) = post(
            app(),
            "/tools/journey/plan",
            serde_json::json!({"start": "Airport", "end": "Nandankanan", "prefer_ac": true}),
        )
        .await;
        assert_eq!(json["journey_type"], "with_transfer");
        assert_eq!(json["total_transfers"], 1);
        assert_eq!(json["estimated_time_minutes"], 45);
        assert_eq!(json["transfer_options"][0]["transfer_point"], "vani vihar");
        assert_eq!(json["transfer_options"][0]["first_route"]["route_number"], "21");
        assert_eq!(json["transfer_options"][0]["second_route"]["route_number"], "22");
    }

    #[tokio::test]
    async fn plan_without_route() {
        let (status, json) = post(
            app(),
            "/tools/journey/plan",
            serde_json::json!({"start": "Nowhereville", "end": "Anotherplace"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["journey_type"], "no_route_found");
        assert!(!json["suggestion"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn plan_rejects_bad_body() {
        let (status, json) = post(app(), "/tools/journey/plan", serde_json::json!({"start": 1})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn fare_from_distance() {
        let (status, json) = post(app(), "/tools/fare", serde_json::json!({"distance_km": 3.5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fare_inr"], 10);
        assert_eq!(json["distance_km"], 3.5);
        assert_eq!(json["distance_source"], "given");
        assert_eq!(json["from"], Value::Null);
    }

    #[tokio::test]
    async fn fare_falls_back_when_geocoding_fails() {
        let (status, json) = post(
            app(),
            "/tools/fare",
            serde_json::json!({"from_stop": "KIIT Square", "to_stop": "Airport"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["distance_km"], 10.0);
        assert_eq!(json["distance_source"], "default");
        assert_eq!(json["fare_inr"], 20);
    }

    #[tokio::test]
    async fn nearest_stops_to_point() {
        let (status, json) = get(app(), "/tools/stops/nearest?lat=20.3530&lon=85.8190").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_results"], 2);
        assert_eq!(json["stops"][0]["stop_id"], "kiit_square");

        let (_, json) = get(
            app(),
            "/tools/stops/nearest?lat=20.3530&lon=85.8190&max_results=1",
        )
        .await;
        assert_eq!(json["stops"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn nearest_rejects_bad_latitude() {
        let (status, _) = get(app(), "/tools/stops/nearest?lat=120&lon=85.8").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reverse_geocode_rejects_bad_coordinates() {
        for uri in [
            "/tools/geocode/reverse?lat=120&lon=85.8",
            "/tools/geocode/reverse?lat=20.3&lon=-181",
        ] {
            let (status, json) = get(app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(json["error"].as_str().unwrap().starts_with("Invalid coordinates"));
        }
    }

    #[tokio::test]
    async fn geocoding_without_providers_is_unavailable() {
        let (status, json) = get(app(), "/tools/geocode?name=KIIT%20Square").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["error"].as_str().unwrap().contains("not configured"));

        let (status, _) = get(app(), "/tools/geocode/reverse?lat=20.35&lon=85.81").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn geocoding_errors_map_to_status() {
        let not_found: AppError = GeocodingError::NotFound("x".into()).into();
        assert!(matches!(not_found, AppError::NotFound { .. }));

        let upstream: AppError = GeocodingError::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert!(matches!(upstream, AppError::BadGateway { .. }));
    }
}
