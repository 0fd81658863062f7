//! # API REST
//!
//! REST API implementation for PPR.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for wire types and `ppr-core` for all data operations.

#![warn(rust_2018_idioms)]

use api_shared::messages;
use api_shared::{
    ClassificationDetailRes, HealthRes, HealthService, ListStationsRes, MessageRes, QuestionsRes,
    StationPatientsRes,
};
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use ppr_core::{
    ClassificationError, ClassificationResult, Clock, Database, QuestionnaireService,
    StationService, SubmissionService,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

type ApiError = (StatusCode, Json<MessageRes>);

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    questionnaire: QuestionnaireService,
    submissions: SubmissionService,
    stations: StationService,
}

impl AppState {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self {
            questionnaire: QuestionnaireService::new(db.clone(), clock.clone()),
            submissions: SubmissionService::new(db.clone(), clock.clone()),
            stations: StationService::new(db, clock),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_questions,
        submit_questions,
        list_stations,
        station_patients,
        classification_detail,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        QuestionsRes,
        api_shared::QuestionRes,
        api_shared::SubmitClassificationReq,
        api_shared::SelectedCareServiceReq,
        ListStationsRes,
        api_shared::StationRes,
        StationPatientsRes,
        api_shared::StationPatientRes,
        ClassificationDetailRes,
        api_shared::ClassificationResultRes,
        ppr_core::VisitType,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
///
/// Every route answers unsupported methods with `405 Method Not Allowed` and a `{message}`
/// body; `/questions/{patient_id}` only answers GET and POST.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route(
            "/questions/:patient_id",
            get(get_questions)
                .post(submit_questions)
                .fallback(method_not_allowed),
        )
        .route(
            "/stations",
            get(list_stations).fallback(method_not_allowed),
        )
        .route(
            "/stations/:station_id/patients",
            get(station_patients).fallback(method_not_allowed),
        )
        .route(
            "/stations/:station_id/patients/:patient_id/classifications/:date",
            get(classification_detail).fallback(method_not_allowed),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps core errors onto status codes and `{message}` bodies.
///
/// Client errors are returned as-is; anything else is logged and reported as `500`.
fn error_response(e: ClassificationError) -> ApiError {
    let (status, message) = match &e {
        ClassificationError::MissingInformation => {
            (StatusCode::BAD_REQUEST, messages::MISSING_INFORMATION.to_string())
        }
        ClassificationError::MalformedBody => {
            (StatusCode::BAD_REQUEST, messages::INVALID_JSON.to_string())
        }
        ClassificationError::InvalidValue { field, reason } => (
            StatusCode::BAD_REQUEST,
            format!("Invalid value for '{field}': {reason}."),
        ),
        ClassificationError::InvalidDate(_) => {
            (StatusCode::BAD_REQUEST, messages::INVALID_DATE.to_string())
        }
        ClassificationError::InvalidInput(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        ClassificationError::PatientNotFound(_) => {
            (StatusCode::NOT_FOUND, messages::PATIENT_NOT_FOUND.to_string())
        }
        ClassificationError::StationNotFound(_) => {
            (StatusCode::NOT_FOUND, messages::STATION_NOT_FOUND.to_string())
        }
        ClassificationError::CareServiceOptionNotFound(_) => (
            StatusCode::NOT_FOUND,
            messages::CARE_SERVICE_OPTION_NOT_FOUND.to_string(),
        ),
        ClassificationError::ClassificationNotFound { .. } => (
            StatusCode::NOT_FOUND,
            messages::CLASSIFICATION_NOT_FOUND.to_string(),
        ),
        ClassificationError::AlreadyClassified { .. } => {
            (StatusCode::CONFLICT, messages::ALREADY_CLASSIFIED.to_string())
        }
        _ => {
            tracing::error!("Request failed: {:?}", e);
            internal_error_message()
        }
    };
    (status, Json(MessageRes::new(message)))
}

fn internal_error_message() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        messages::INTERNAL_ERROR.to_string(),
    )
}

/// Non-integer ids in the URL.
fn path_rejection(rejection: PathRejection) -> ApiError {
    tracing::warn!("Rejected request path: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(MessageRes::new(messages::INVALID_IDENTIFIER)),
    )
}

async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(MessageRes::new(messages::METHOD_NOT_ALLOWED)),
    )
}

/// Runs a database-bound service call on the blocking pool.
async fn run_blocking<T, F>(func: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ClassificationResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(func).await {
        Ok(result) => result.map_err(error_response),
        Err(e) => {
            tracing::error!("Blocking task failed: {:?}", e);
            let (status, message) = internal_error_message();
            Err((status, Json(MessageRes::new(message))))
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/questions/{patient_id}",
    params(("patient_id" = i64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Questionnaire for the patient", body = QuestionsRes),
        (status = 400, description = "Non-integer patient id", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Questionnaire for a patient
///
/// Returns every care service option, with `selected` set for the options chosen in the
/// patient's classification yesterday, plus admission/discharge dates and today's visit type.
#[axum::debug_handler]
async fn get_questions(
    State(state): State<AppState>,
    patient_id: Result<AxumPath<i64>, PathRejection>,
) -> Result<Json<QuestionsRes>, ApiError> {
    let AxumPath(patient_id) = patient_id.map_err(path_rejection)?;
    let questionnaire = state.questionnaire;
    run_blocking(move || questionnaire.questions(patient_id))
        .await
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/questions/{patient_id}",
    params(("patient_id" = i64, Path, description = "Patient identifier")),
    request_body = api_shared::SubmitClassificationReq,
    responses(
        (status = 200, description = "Classification saved", body = MessageRes),
        (status = 400, description = "Missing or invalid information", body = MessageRes),
        (status = 404, description = "Unknown patient, station or care service option", body = MessageRes),
        (status = 409, description = "Patient already classified today", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Submit today's classification for a patient
///
/// The body is validated before anything is written. The classification and all of its
/// selected options are stored atomically.
#[axum::debug_handler]
async fn submit_questions(
    State(state): State<AppState>,
    patient_id: Result<AxumPath<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<MessageRes>, ApiError> {
    let AxumPath(patient_id) = patient_id.map_err(path_rejection)?;
    let body: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Unreadable submission for patient {}: {}", patient_id, e);
        error_response(ClassificationError::MalformedBody)
    })?;

    let submissions = state.submissions;
    run_blocking(move || submissions.submit_json(patient_id, &body)).await?;

    Ok(Json(MessageRes::new(messages::SUBMIT_SUCCESS)))
}

#[utoipa::path(
    get,
    path = "/stations",
    responses(
        (status = 200, description = "All stations", body = ListStationsRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
async fn list_stations(State(state): State<AppState>) -> Result<Json<ListStationsRes>, ApiError> {
    let stations = state.stations;
    run_blocking(move || stations.list_stations())
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/stations/{station_id}/patients",
    params(("station_id" = i64, Path, description = "Station identifier")),
    responses(
        (status = 200, description = "Patients on the station", body = StationPatientsRes),
        (status = 400, description = "Non-integer station id", body = MessageRes),
        (status = 404, description = "Unknown station", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
async fn station_patients(
    State(state): State<AppState>,
    station_id: Result<AxumPath<i64>, PathRejection>,
) -> Result<Json<StationPatientsRes>, ApiError> {
    let AxumPath(station_id) = station_id.map_err(path_rejection)?;
    let stations = state.stations;
    run_blocking(move || stations.station_patients(station_id))
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/stations/{station_id}/patients/{patient_id}/classifications/{date}",
    params(
        ("station_id" = i64, Path, description = "Station identifier"),
        ("patient_id" = i64, Path, description = "Patient identifier"),
        ("date" = String, Path, description = "Day of the classification, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Classification of that day", body = ClassificationDetailRes),
        (status = 400, description = "Invalid id or date", body = MessageRes),
        (status = 404, description = "No such station, patient or classification", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
async fn classification_detail(
    State(state): State<AppState>,
    path: Result<AxumPath<(i64, i64, String)>, PathRejection>,
) -> Result<Json<ClassificationDetailRes>, ApiError> {
    let AxumPath((station_id, patient_id, date)) = path.map_err(path_rejection)?;
    let stations = state.stations;
    run_blocking(move || stations.classification_detail(station_id, patient_id, &date))
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use chrono::NaiveDate;
    use http_body_util::BodyExt;
    use ppr_core::{FixedClock, ReferenceData};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const REFERENCE_YAML: &str = r#"
fields:
  - { id: 1, name: Körperpflege, short: KP, area: general }
  - { id: 2, name: Medikation, short: ME, area: special }
categories:
  - { id: 1, name: Grundleistung }
options:
  - { id: 1, field_id: 1, category_id: 1, name: Teilwäsche, severity: 2 }
  - { id: 2, field_id: 1, category_id: 1, name: Ganzkörperwäsche, severity: 3 }
  - { id: 3, field_id: 2, category_id: 1, name: Infusion, severity: 2 }
stations:
  - { id: 1, name: Station 1, patients_per_caregiver_ratio: 1.6 }
patients:
  - { id: 1, first_name: Alice, last_name: Smith, station_id: 1 }
transfers:
  - { id: 50, patient_id: 1, admission_date: 2026-10-15, discharge_date: 2026-10-25 }
"#;

    fn test_app() -> (Router, Database) {
        let db = Database::open_in_memory().expect("in-memory database");
        ReferenceData::from_yaml_str(REFERENCE_YAML)
            .unwrap()
            .import(&db)
            .unwrap();
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()));
        (router(AppState::new(db.clone(), clock)), db)
    }

    fn valid_body() -> Value {
        json!({
            "is_in_isolation": true,
            "data_accepted": true,
            "station": 1,
            "room_name": "2.14",
            "bed_number": 2,
            "barthel_index": 45,
            "expanded_barthel_index": 30,
            "mini_mental_status": 24,
            "selected_care_services": [{ "id": 1 }, { "id": 3, "name": "Infusion" }],
            "visit_type": "regular",
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn classification_count(db: &Database) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM daily_classifications", [], |row| {
                row.get(0)
            })?)
        })
        .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _db) = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn get_questions_returns_catalog_and_dates() {
        let (app, _db) = test_app();
        let (status, body) = send(&app, Method::GET, "/questions/1", None).await;

        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0]["field__short"], "KP");
        assert_eq!(questions[0]["category__name"], "Grundleistung");
        assert!(questions.iter().all(|q| q["selected"] == false));
        assert_eq!(body["admission_date"], "2026-10-15");
        assert_eq!(body["discharge_date"], "2026-10-25");
        assert!(body["visit_type"].is_null());
    }

    #[tokio::test]
    async fn get_questions_for_unknown_patient_has_null_dates() {
        let (app, _db) = test_app();
        let (status, body) = send(&app, Method::GET, "/questions/77", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["admission_date"].is_null());
        assert!(body["discharge_date"].is_null());
    }

    #[tokio::test]
    async fn submit_then_visit_type_is_reported() {
        let (app, db) = test_app();
        let (status, body) = send(&app, Method::POST, "/questions/1", Some(valid_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], messages::SUBMIT_SUCCESS);
        assert_eq!(classification_count(&db), 1);

        let (_, body) = send(&app, Method::GET, "/questions/1", None).await;
        assert_eq!(body["visit_type"], "regular");
    }

    #[tokio::test]
    async fn missing_key_is_bad_request() {
        let (app, db) = test_app();
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("visit_type");

        let (status, body) = send(&app, Method::POST, "/questions/1", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], messages::MISSING_INFORMATION);
        assert_eq!(classification_count(&db), 0);
    }

    #[tokio::test]
    async fn unparseable_body_is_bad_request() {
        let (app, _db) = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/questions/1")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn referential_errors_are_structured() {
        let (app, db) = test_app();

        let (status, body) = send(&app, Method::POST, "/questions/404", Some(valid_body())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], messages::PATIENT_NOT_FOUND);

        let mut with_unknown_option = valid_body();
        with_unknown_option["selected_care_services"] = json!([{ "id": 1 }, { "id": 99 }]);
        let (status, body) =
            send(&app, Method::POST, "/questions/1", Some(with_unknown_option)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], messages::CARE_SERVICE_OPTION_NOT_FOUND);
        assert_eq!(classification_count(&db), 0);
    }

    #[tokio::test]
    async fn duplicate_submission_conflicts() {
        let (app, db) = test_app();
        send(&app, Method::POST, "/questions/1", Some(valid_body())).await;
        let (status, body) = send(&app, Method::POST, "/questions/1", Some(valid_body())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], messages::ALREADY_CLASSIFIED);
        assert_eq!(classification_count(&db), 1);
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() {
        let (app, _db) = test_app();
        for method in [Method::DELETE, Method::PUT, Method::PATCH] {
            let (status, body) = send(&app, method, "/questions/1", None).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body["message"], messages::METHOD_NOT_ALLOWED);
        }

        let (status, body) = send(&app, Method::POST, "/stations", Some(json!({}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], messages::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn non_integer_ids_are_bad_request() {
        let (app, db) = test_app();

        let (status, body) = send(&app, Method::GET, "/questions/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], messages::INVALID_IDENTIFIER);

        let (status, body) = send(&app, Method::POST, "/questions/abc", Some(valid_body())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], messages::INVALID_IDENTIFIER);
        assert_eq!(classification_count(&db), 0);

        let (status, body) = send(&app, Method::GET, "/stations/first/patients", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], messages::INVALID_IDENTIFIER);

        let (status, body) = send(
            &app,
            Method::GET,
            "/stations/1/patients/x/classifications/2026-10-19",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], messages::INVALID_IDENTIFIER);
    }

    #[tokio::test]
    async fn repeated_option_in_body_is_accepted() {
        let (app, db) = test_app();
        let mut body = valid_body();
        body["selected_care_services"] = json!([{ "id": 1 }, { "id": 1 }]);

        let (status, body) = send(&app, Method::POST, "/questions/1", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], messages::SUBMIT_SUCCESS);
        assert_eq!(classification_count(&db), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_requests_are_served() {
        let (app, db) = test_app();

        let (submitted, questions, stations) = tokio::join!(
            send(&app, Method::POST, "/questions/1", Some(valid_body())),
            send(&app, Method::GET, "/questions/1", None),
            send(&app, Method::GET, "/stations", None),
        );

        assert_eq!(submitted.0, StatusCode::OK);
        assert_eq!(questions.0, StatusCode::OK);
        assert_eq!(questions.1["questions"].as_array().map(Vec::len), Some(3));
        assert_eq!(stations.0, StatusCode::OK);
        assert_eq!(classification_count(&db), 1);
    }

    #[tokio::test]
    async fn station_views_are_served() {
        let (app, _db) = test_app();
        send(&app, Method::POST, "/questions/1", Some(valid_body())).await;

        let (status, body) = send(&app, Method::GET, "/stations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stations"][0]["name"], "Station 1");

        let (status, body) = send(&app, Method::GET, "/stations/1/patients", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patients"][0]["daily_today"], true);

        let (status, body) = send(
            &app,
            Method::GET,
            "/stations/1/patients/1/classifications/2026-10-19",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["category1"], "A2");
        assert_eq!(body["result"]["category2"], "S2");
        assert_eq!(body["is_in_isolation"], true);
        assert_eq!(body["bed_number"], "2");

        let (status, body) = send(
            &app,
            Method::GET,
            "/stations/1/patients/1/classifications/yesterday",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], messages::INVALID_DATE);
    }
}
