//! Server-rendered HTML pages.
//!
//! Markup is kept deliberately small: plain forms, no client scripting.
//! Every POST form embeds the anti-forgery token as a hidden field.

use crate::flow::models::FieldError;

/// Shown for both an unknown email and a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login attempt.";
/// Shown while an account is locked out, whatever the password was.
pub const LOCKED_OUT_MESSAGE: &str =
    "This account has been locked out, please try again later.";
/// Shown when a second factor code does not match.
pub const INVALID_CODE_MESSAGE: &str = "Invalid verification code.";

/// Login form state carried into a re-render.
#[derive(Debug, Default)]
pub struct LoginView {
    pub email: String,
    pub message: Option<String>,
    pub errors: Vec<FieldError>,
}

/// Registration form state carried into a re-render.
#[derive(Debug, Default)]
pub struct RegisterView {
    pub email: String,
    pub errors: Vec<FieldError>,
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn status_message(message: Option<&str>) -> String {
    match message {
        Some(message) => format!("<p class=\"message\">{}</p>\n", escape(message)),
        None => String::new(),
    }
}

fn validation_summary(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items: String = errors
        .iter()
        .map(|error| format!("    <li>{}</li>\n", escape(&error.message)))
        .collect();

    format!("<ul class=\"validation-summary\">\n{items}</ul>\n")
}

pub fn login_page(form_token: &str, view: &LoginView) -> String {
    let message = status_message(view.message.as_deref());
    let summary = validation_summary(&view.errors);
    let email = escape(&view.email);

    let body = format!(
        r#"<h1>Log in</h1>
{message}{summary}<form method="post" action="/login">
    <input type="hidden" name="csrf_token" value="{form_token}">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{email}">
    <label for="password">Password</label>
    <input type="password" id="password" name="password">
    <label><input type="checkbox" name="remember_me"> Remember me</label>
    <button type="submit">Log in</button>
</form>
<p><a href="/register">Register as a new user</a></p>"#
    );

    layout("Log in", &body)
}

pub fn register_page(form_token: &str, view: &RegisterView) -> String {
    let summary = validation_summary(&view.errors);
    let email = escape(&view.email);

    let body = format!(
        r#"<h1>Register</h1>
{summary}<form method="post" action="/register">
    <input type="hidden" name="csrf_token" value="{form_token}">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{email}">
    <label for="password">Password</label>
    <input type="password" id="password" name="password">
    <label for="confirm_password">Confirm password</label>
    <input type="password" id="confirm_password" name="confirm_password">
    <button type="submit">Register</button>
</form>
<p><a href="/login">Already have an account? Log in</a></p>"#
    );

    layout("Register", &body)
}

pub fn verify_page(form_token: &str, message: Option<&str>) -> String {
    let message = status_message(message);

    let body = format!(
        r#"<h1>Verify your identity</h1>
{message}<p>Enter your verification code to finish signing in.</p>
<form method="post" action="/login/verify">
    <input type="hidden" name="csrf_token" value="{form_token}">
    <label for="code">Verification code</label>
    <input type="text" id="code" name="code" autocomplete="one-time-code">
    <button type="submit">Verify</button>
</form>"#
    );

    layout("Verify your identity", &body)
}

pub fn home_page(email: &str, form_token: &str) -> String {
    let email = escape(email);

    let body = format!(
        r#"<h1>Welcome</h1>
<p>You are signed in as {email}.</p>
<form method="post" action="/logout">
    <input type="hidden" name="csrf_token" value="{form_token}">
    <button type="submit">Log out</button>
</form>"#
    );

    layout("Home", &body)
}

pub fn forbidden_page() -> String {
    layout(
        "Request blocked",
        "<h1>Request blocked</h1>\n<p>The request could not be verified. Go back, reload the page, and try again.</p>",
    )
}

pub fn error_page() -> String {
    layout(
        "Something went wrong",
        "<h1>Something went wrong</h1>\n<p>An unexpected error occurred. Please try again later.</p>",
    )
}
