use axum::{extract::FromRef, routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::health::health_check;
use super::profile::profile_routes;
use super::records::records_routes;
use super::roadmap::roadmap_routes;
use super::workout::workout_routes;
use crate::auth::AuthService;
use crate::services::{GenerationService, ProfileService, RoadmapService, TextModel};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthService,
    pub profiles: ProfileService,
    pub roadmaps: RoadmapService,
    pub generation: GenerationService,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

pub fn create_routes(db: PgPool, jwt_secret: &str, model: Arc<dyn TextModel>) -> Router {
    let state = AppState {
        auth: AuthService::new(db.clone(), jwt_secret),
        profiles: ProfileService::new(db.clone()),
        roadmaps: RoadmapService::new(db.clone()),
        generation: GenerationService::new(model),
        db,
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes())
        .nest("/api/profile", profile_routes())
        .nest("/api/roadmap", roadmap_routes())
        .nest("/api/workout", workout_routes())
        .nest("/api/records", records_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
