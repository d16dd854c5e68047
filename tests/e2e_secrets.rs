//! E2E tests for the protected secrets pages

mod common;

use common::{TestServer, location, session_client};

async fn register(client: &reqwest::Client, server: &TestServer, username: &str) {
    let response = client
        .post(server.url("/register"))
        .form(&[("username", username), ("password", "hunter2")])
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(location(&response), "/secrets");
}

#[tokio::test]
async fn test_anonymous_secrets_always_redirects_to_login() {
    let server = TestServer::new().await;
    let client = session_client();

    let response = client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds");

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_anonymous_submit_redirects_to_login() {
    let server = TestServer::new().await;
    let client = session_client();

    let response = client
        .get(server.url("/submit"))
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let response = client
        .post(server.url("/submit"))
        .form(&[("secret", "sneaky")])
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_submitted_secret_appears_on_secrets_page() {
    let server = TestServer::new().await;
    let client = session_client();
    register(&client, &server, "alice@example.com").await;

    let response = client
        .post(server.url("/submit"))
        .form(&[("secret", "I like trains")])
        .send()
        .await
        .expect("request succeeds");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/secrets");

    let body = client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(body.contains("I like trains"));
}

#[tokio::test]
async fn test_resubmission_overwrites_previous_secret() {
    let server = TestServer::new().await;
    let client = session_client();
    register(&client, &server, "bob@example.com").await;

    client
        .post(server.url("/submit"))
        .form(&[("secret", "first secret")])
        .send()
        .await
        .expect("request succeeds");

    client
        .post(server.url("/submit"))
        .form(&[("secret", "second secret")])
        .send()
        .await
        .expect("request succeeds");

    let body = client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(body.contains("second secret"));
    assert!(!body.contains("first secret"));
}

#[tokio::test]
async fn test_any_authenticated_user_sees_all_secrets() {
    let server = TestServer::new().await;

    let alice = session_client();
    register(&alice, &server, "alice@example.com").await;
    alice
        .post(server.url("/submit"))
        .form(&[("secret", "alice's secret")])
        .send()
        .await
        .expect("request succeeds");

    let bob = session_client();
    register(&bob, &server, "bob@example.com").await;

    let body = bob
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(body.contains("alice's secret"));
}

#[tokio::test]
async fn test_users_without_secrets_are_not_listed() {
    let server = TestServer::new().await;
    let client = session_client();
    register(&client, &server, "quiet@example.com").await;

    let body = client
        .get(server.url("/secrets"))
        .send()
        .await
        .expect("request succeeds")
        .text()
        .await
        .expect("response body");
    assert!(!body.contains("quiet@example.com"));
    assert!(!body.contains("<li>"));
}
