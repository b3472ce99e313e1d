//! OpenAPI documentation configuration.

use bookshelf_core::{Book, ErrorResponse, FieldError, HealthState, HealthStatus, NewBook};
use utoipa::OpenApi;

/// OpenAPI documentation for the Bookshelf API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "1.0.0",
        description = "Book records served through a cache-aside data-access layer",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::book_controller::get_books,
        crate::controllers::book_controller::create_book,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::liveness_check,
        crate::controllers::health_controller::readiness_check,
    ),
    components(
        schemas(
            Book,
            NewBook,
            ErrorResponse,
            FieldError,
            HealthState,
            HealthStatus,
        )
    ),
    tags(
        (name = "books", description = "Book records"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
