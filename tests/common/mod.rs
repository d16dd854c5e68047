//! Common test utilities for E2E tests

use confidant::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "test.example.com".to_string(),
                protocol: "http".to_string(),
            },
            database: config::DatabaseConfig { path: db_path },
            auth: config::AuthConfig {
                session_max_age: 604800,
                google: config::OAuthProviderConfig {
                    client_id: "test-google-client-id".to_string(),
                    client_secret: "test-google-client-secret".to_string(),
                },
                facebook: config::OAuthProviderConfig {
                    client_id: "test-facebook-client-id".to_string(),
                    client_secret: "test-facebook-client-secret".to_string(),
                },
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router and spawn server in background
        let app = confidant::build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Build a full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }
}

/// Client that keeps cookies but does not follow redirects,
/// so Location headers can be asserted.
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build client")
}

/// Location header of a redirect response
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}
