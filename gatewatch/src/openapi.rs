//! OpenAPI documentation, served as JSON at `/api-docs/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::api::{handlers, models::detection::DetectionResponse};

#[derive(OpenApi)]
#[openapi(
    info(title = "gatewatch", description = "Intruder detection over uploaded images"),
    paths(handlers::detect::detect_intruder, handlers::health::healthz),
    components(schemas(DetectionResponse)),
    tags(
        (name = "detection", description = "Image upload and intruder check"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
