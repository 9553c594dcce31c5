use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

/// Security scheme modifier to add authentication methods
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        // Admin JWT from POST /auth/login
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Admin token issued by /auth/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Overlord API",
        version = "1.0.0",
        description = "Collects client-side JavaScript errors posted by the ShadowWatcher script and exposes them to administrators.\n\n## Authentication\n\nReport ingestion is public. Report management requires an admin token. Use `Authorization: Bearer <token>`",
        license(name = "MIT")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Admin login and session management"),
        (name = "reports", description = "Error report ingestion and management"),
    ),
    paths(
        crate::routes::health::health,
        crate::routes::health::db_health,
        crate::routes::report::report_error,
        crate::routes::reports::list_reports,
        crate::routes::reports::get_report,
        crate::routes::reports::update_report,
        crate::routes::reports::delete_report,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::status,
    ),
    components(schemas(
        overlord_types::ErrorReport,
        overlord_types::StoredReport,
        crate::routes::MessageResponse,
        crate::routes::report::ReportAccepted,
        crate::routes::reports::ReportPage,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::LoginResponse,
        crate::routes::health::HealthResponse,
        crate::routes::health::DbHealthResponse,
    ))
)]
pub struct ApiDoc;
