use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{admin, catalog, diagnosis, records, system};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let static_dir = state.config.http.static_dir.clone();

    let router = Router::new()
        .route("/health", get(system::health))
        .route("/test-db", get(system::test_db))
        .route("/api/stats", get(system::stats))
        // Symptoms
        .route("/gejala", get(catalog::list_symptoms))
        .route(
            "/api/symptoms",
            get(catalog::list_symptoms).post(catalog::upsert_symptom),
        )
        .route(
            "/api/symptoms/:code",
            get(catalog::get_symptom).delete(catalog::delete_symptom),
        )
        // Recommendations
        .route(
            "/api/recommendations",
            get(catalog::list_recommendations).post(catalog::create_recommendation),
        )
        .route(
            "/api/recommendations/:id",
            delete(catalog::delete_recommendation),
        )
        // Users and stored diagnoses
        .route(
            "/api/users",
            get(records::list_users).post(records::create_user),
        )
        .route(
            "/api/users/:id",
            get(records::get_user).delete(records::delete_user),
        )
        .route("/api/diagnoses", get(records::list_diagnoses))
        .route(
            "/api/diagnoses/:id",
            get(records::get_diagnosis).delete(records::delete_diagnosis),
        )
        .route("/api/user-symptoms", get(records::list_user_symptoms))
        // Diagnosis flow
        .route("/api/diagnosis/process", post(diagnosis::process))
        .route("/diagnosis", post(diagnosis::process))
        .route("/diagnosa", post(diagnosis::process))
        .route("/admin/login", post(admin::login))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}
