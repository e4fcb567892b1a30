use std::time::Duration;

/// User-Agent sent with every Bot API request.
pub const USER_AGENT: &str = concat!("herald-rs/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the Bot API calls.
///
/// The per-call timeout is applied on each request rather than here, so a
/// live settings change can adjust it without rebuilding the client.
///
/// # Features
/// - **Connection pooling**: keeps a couple of idle connections to the Bot API
/// - **Connect timeout**: 10s, independent of the request timeout
/// - **HTTP/2**: negotiated via ALPN when the server supports it
/// - **Security**: Rustls for TLS (no OpenSSL dependency)
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(USER_AGENT)
        .build()
}
