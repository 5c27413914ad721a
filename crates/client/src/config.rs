//! API endpoint configuration.

/// Base-URL configuration for the REST API and the realtime socket.
///
/// Explicitly constructed and passed in; there is no global-only path to a
/// configured client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    realtime_path: String,
}

impl ApiConfig {
    /// Create a config from a host or full URL. A bare host gets `https://`
    /// unless it is a local/development address.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/');
        let base_url = if base.contains("://") {
            base.to_string()
        } else if is_local_address(base) {
            format!("http://{base}")
        } else {
            format!("https://{base}")
        };
        Self { base_url, realtime_path: "/ws".to_string() }
    }

    /// Override the realtime socket path (default `/ws`).
    pub fn with_realtime_path(mut self, path: impl Into<String>) -> Self {
        self.realtime_path = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// The realtime endpoint, with the HTTP scheme swapped for WS.
    pub fn ws_url(&self) -> String {
        let url = self.api_url(&self.realtime_path);
        if url.starts_with("https://") {
            url.replacen("https://", "wss://", 1)
        } else {
            url.replacen("http://", "ws://", 1)
        }
    }
}

/// Check if a host is a local/development address.
fn is_local_address(host: &str) -> bool {
    let host_part = host.split(':').next().unwrap_or(host);
    host_part == "localhost"
        || host_part == "127.0.0.1"
        || host_part == "0.0.0.0"
        || host_part.starts_with("192.168.")
        || host_part.starts_with("10.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_scheme() {
        assert_eq!(ApiConfig::new("api.example.com").base_url(), "https://api.example.com");
        assert_eq!(ApiConfig::new("localhost:8080").base_url(), "http://localhost:8080");
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let cfg = ApiConfig::new("https://api.example.com/");
        assert_eq!(cfg.api_url("/books"), "https://api.example.com/books");
        assert_eq!(cfg.api_url("books"), "https://api.example.com/books");
    }

    #[test]
    fn ws_url_swaps_scheme() {
        assert_eq!(ApiConfig::new("api.example.com").ws_url(), "wss://api.example.com/ws");
        assert_eq!(ApiConfig::new("localhost:8080").ws_url(), "ws://localhost:8080/ws");
    }
}
