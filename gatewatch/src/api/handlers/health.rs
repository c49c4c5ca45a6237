#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    summary = "Liveness probe",
    responses((status = 200, description = "Service is running", body = String))
)]
pub async fn healthz() -> &'static str {
    "OK"
}
