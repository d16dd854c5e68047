//! E2E tests for registration, local login, and logout

mod common;

use common::{TestServer, location, session_client};

#[tokio::test]
async fn test_home_page_renders() {
    let server = TestServer::new().await;
    let client = session_client();

    let response = client
        .get(server.url("/"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("Confidant"));
}

#[tokio::test]
async fn test_login_page_offers_oauth_providers() {
    let server = TestServer::new().await;
    let client = session_client();

    let response = client
        .get(server.url("/login"))
        .send()
        .await
        .expect("request succeeds");

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("response body");
    assert!(body.contains("/auth/google"));
    assert!(body.contains("/auth/facebook"));
}

#[tokio::test]
async fn test_register_logs_in_and_redirects_to_secrets() {
    let server = TestServer::new().await;
    let client = session_client();

    let response = client
        .post(server.url("/register"))
        .form(&[("username", "alice@example.com"), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/secrets");

    // The session cookie set by registration grants access
    let response = client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_duplicate_registration_redirects_back() {
    let server = TestServer::new().await;

    let first = session_client();
    let response = first
        .post(server.url("/register"))
        .form(&[("username", "bob@example.com"), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(location(&response), "/secrets");

    let second = session_client();
    let response = second
        .post(server.url("/register"))
        .form(&[("username", "bob@example.com"), ("password", "other")])
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/register");

    // The first account still logs in with its original password
    let response = second
        .post(server.url("/login"))
        .form(&[("username", "bob@example.com"), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(location(&response), "/secrets");
}

#[tokio::test]
async fn test_login_with_wrong_password_redirects_back() {
    let server = TestServer::new().await;
    let client = session_client();

    client
        .post(server.url("/register"))
        .form(&[("username", "carol@example.com"), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");

    let fresh = session_client();
    let response = fresh
        .post(server.url("/login"))
        .form(&[("username", "carol@example.com"), ("password", "wrong")])
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    // No session was established
    let response = fresh
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_with_unknown_user_redirects_back() {
    let server = TestServer::new().await;
    let client = session_client();

    let response = client
        .post(server.url("/login"))
        .form(&[("username", "nobody@example.com"), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_ends_session() {
    let server = TestServer::new().await;
    let client = session_client();

    client
        .post(server.url("/register"))
        .form(&[("username", "dave@example.com"), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");

    let response = client
        .get(server.url("/logout"))
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    // Logged out: identical to a never-authenticated session
    let response = client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}
