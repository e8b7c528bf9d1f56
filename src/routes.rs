use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, require_editor, resolve_locale};

/// The complete application router
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .route("/auth/login", post(public::auth::login))
        .merge(content_routes())
        // Protected
        .merge(admin_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn content_routes() -> Router {
    use public::{directory, products, service_centers, services};

    Router::new()
        .route("/api/products", get(products::list))
        .route("/api/products/:slug", get(products::show))
        .route("/api/services", get(services::list))
        .route("/api/services/:slug", get(services::show))
        .route("/api/service-centers", get(service_centers::list))
        .route("/api/service-centers/:slug", get(service_centers::show))
        .route("/api/departments", get(directory::list_departments))
        .route("/api/departments/:slug", get(directory::show_department))
        .route("/api/laboratories", get(directory::list_laboratories))
        .route("/api/laboratories/:slug", get(directory::show_laboratory))
        .route("/api/staff", get(directory::list_staff))
        .route_layer(middleware::from_fn(resolve_locale))
}

fn admin_routes() -> Router {
    use axum::routing::{delete, put};
    use protected::{products, service_centers, services, whoami};

    // Content changes need an editor role on top of a valid token
    let writes = Router::new()
        .route("/api/admin/products", post(products::create))
        .route("/api/admin/products/:id", put(products::update).delete(products::delete))
        .route("/api/admin/services", post(services::create))
        .route("/api/admin/services/:id", put(services::update).delete(services::delete))
        .route("/api/admin/service-centers", post(service_centers::create))
        .route(
            "/api/admin/service-centers/:id",
            put(service_centers::update).delete(service_centers::delete),
        )
        .route_layer(middleware::from_fn(require_editor));

    Router::new()
        .route("/api/admin/whoami", get(whoami::whoami))
        .route("/api/admin/products", get(products::list))
        .merge(writes)
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

/// CORS from config: the configured origin list, or any origin when the
/// list is empty. When disabled the layer allows no origin at all.
fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
}
