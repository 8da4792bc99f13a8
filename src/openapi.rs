use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::weather::handlers::HealthResponse;
use crate::weather::models::WeatherResponse;

/// OpenAPI documentation for the Skydeck API
///
/// Schemas cover the proxy and error payloads; the dashboard payload is
/// described by its Rust types.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skydeck API",
        version = "1.0.0",
        description = "Weather dashboard backend using OpenWeatherMap. Serves the dashboard page, a current-weather proxy and aggregated forecast data.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "weather", description = "Current weather proxy")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            WeatherResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
