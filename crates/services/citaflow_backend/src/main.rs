// File: services/citaflow_backend/src/main.rs
use citaflow_booking::routes as booking_routes;
use citaflow_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

mod app_state;

#[tokio::main]
async fn main() {
    citaflow_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let services = app_state::build_services(&config)
        .await
        .expect("Failed to initialize external services");

    let api_router = booking_routes::routes(config.clone(), services)
        // The booking frontend may be served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    #[allow(unused_mut)]
    let mut app = api_router;

    // Conditionally expose the OpenAPI document if the feature is enabled
    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Citaflow API",
                version = "0.1.0",
                description = "Appointment booking service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            paths(
                citaflow_booking::handlers::check_availability_handler,
                citaflow_booking::handlers::create_reservation_handler,
                citaflow_booking::handlers::health_handler,
            ),
            tags((name = "Booking", description = "Availability and reservation endpoints")),
        )]
        struct ApiDoc;

        let openapi_doc = ApiDoc::openapi();
        info!("Exposing OpenAPI document at /docs/openapi.json");
        app = app.route(
            "/docs/openapi.json",
            axum::routing::get(move || {
                let doc = openapi_doc.clone();
                async move { axum::Json(doc) }
            }),
        );
    }

    // The booking page itself is served as static files
    app = app.fallback_service(ServeDir::new("public"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("Servidor corriendo en http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
