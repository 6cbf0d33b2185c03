//! Health handlers

/// GET /health - liveness probe
pub async fn health() -> &'static str {
    "OK"
}

/// GET /ready - readiness probe
pub async fn ready() -> &'static str {
    "READY"
}
