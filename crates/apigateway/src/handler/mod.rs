mod auth;
mod metrics;
mod payment;
mod reservation;
mod settlement;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get};
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{Modify, OpenApi, openapi::security::SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::auth::auth_routes;
pub use self::metrics::metrics_handler;
pub use self::payment::payment_routes;
pub use self::reservation::reservation_routes;
pub use self::settlement::settlement_routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::oauth2_success_handler,
        auth::refresh_token_handler,

        reservation::create_reservation,
        reservation::get_my_reservations,
        reservation::get_reservation,

        payment::approve_payment,
        payment::cancel_checkout,
        payment::fail_checkout,
        payment::refund_payment,

        settlement::get_sales,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Token issuance after external login"),
        (name = "Reservation", description = "Class reservations and checkout"),
        (name = "Payment", description = "Provider callbacks and refunds"),
        (name = "Settlement", description = "Monthly tutor sales"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub struct AppRouter;

impl AppRouter {
    pub fn build(app_state: AppState) -> axum::Router {
        let shared_state = Arc::new(app_state);

        let metrics_router = OpenApiRouter::new()
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone());

        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .merge(auth_routes(shared_state.clone()))
            .merge(reservation_routes(shared_state.clone()))
            .merge(payment_routes(shared_state.clone()))
            .merge(settlement_routes(shared_state.clone()))
            .merge(metrics_router);

        let router_with_layers = api_router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(1024 * 1024))
            .layer(TraceLayer::new_for_http());

        let (app_router, api) = router_with_layers.split_for_parts();

        app_router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(app_state);

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        Ok(())
    }
}
