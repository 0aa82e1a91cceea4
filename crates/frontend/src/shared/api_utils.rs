//! API utilities for frontend-backend communication

/// Порт backend-сервера (axum)
pub const BACKEND_PORT: u16 = 3000;

/// Get the base URL for API requests
///
/// Built from the current window location, using the backend port.
/// Returns an empty string outside the browser (native tests).
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, BACKEND_PORT)
}

/// Build a full API URL from a path like "/store/store-overview"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
