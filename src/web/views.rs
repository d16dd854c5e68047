//! Server-rendered HTML views
//!
//! Plain functions building HTML strings. User-supplied text is
//! escaped before it reaches the page.

use html_escape::encode_text;

use crate::data::User;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title} - Confidant</title>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// GET /
pub fn home_page() -> String {
    layout(
        "Home",
        r#"    <h1>Confidant</h1>
    <p>Share a secret. Anonymously.</p>
    <p><a href="/register">Register</a> | <a href="/login">Login</a></p>"#,
    )
}

/// GET /login
pub fn login_page() -> String {
    layout(
        "Login",
        r#"    <h1>Login</h1>
    <form action="/login" method="post">
        <label for="username">Email</label>
        <input type="text" name="username" id="username">
        <label for="password">Password</label>
        <input type="password" name="password" id="password">
        <button type="submit">Login</button>
    </form>
    <p><a href="/auth/google">Sign in with Google</a></p>
    <p><a href="/auth/facebook">Sign in with Facebook</a></p>
    <p>Not a member? <a href="/register">Register</a></p>"#,
    )
}

/// GET /register
pub fn register_page() -> String {
    layout(
        "Register",
        r#"    <h1>Register</h1>
    <form action="/register" method="post">
        <label for="username">Email</label>
        <input type="text" name="username" id="username">
        <label for="password">Password</label>
        <input type="password" name="password" id="password">
        <button type="submit">Register</button>
    </form>
    <p><a href="/auth/google">Sign up with Google</a></p>
    <p><a href="/auth/facebook">Sign up with Facebook</a></p>
    <p>Already a member? <a href="/login">Login</a></p>"#,
    )
}

/// GET /secrets
///
/// Every authenticated user sees every submitted secret.
pub fn secrets_page(users_with_secrets: &[User]) -> String {
    let mut items = String::new();
    for user in users_with_secrets {
        if let Some(secret) = &user.secret {
            items.push_str(&format!(
                "        <li>{}</li>\n",
                encode_text(secret)
            ));
        }
    }

    let body = format!(
        r#"    <h1>You've Discovered My Secret!</h1>
    <ul>
{items}    </ul>
    <p><a href="/submit">Submit a secret</a> | <a href="/logout">Log out</a></p>"#
    );

    layout("Secrets", &body)
}

/// GET /submit
pub fn submit_page() -> String {
    layout(
        "Submit",
        r#"    <h1>Share a secret</h1>
    <p>Don't worry, it stays anonymous.</p>
    <form action="/submit" method="post">
        <label for="secret">Your secret</label>
        <input type="text" name="secret" id="secret">
        <button type="submit">Submit</button>
    </form>"#,
    )
}
