use authkit::TokenError;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::flow::errors::FlowError;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::Visitor;
use crate::inbound::http::pages;
use crate::inbound::http::router::AppState;
use crate::session::errors::SessionError;

pub mod health;
pub mod home;
pub mod login;
pub mod logout;
pub mod register;
pub mod verify;

/// Error rendered to the visitor as an HTML page.
#[derive(Debug)]
pub enum PageError {
    /// The anti-forgery check failed.
    Forbidden,
    /// Something broke server side. The detail is logged, never shown.
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Forbidden => {
                (StatusCode::FORBIDDEN, Html(pages::forbidden_page())).into_response()
            }
            PageError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(pages::error_page()),
                )
                    .into_response()
            }
        }
    }
}

impl From<FlowError> for PageError {
    fn from(err: FlowError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<SessionError> for PageError {
    fn from(err: SessionError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<TokenError> for PageError {
    fn from(err: TokenError) -> Self {
        PageError::Internal(err.to_string())
    }
}

/// Append a Set-Cookie header without clobbering cookies already queued.
pub(crate) fn append_set_cookie(headers: &mut HeaderMap, cookie: String) -> Result<(), PageError> {
    let value =
        HeaderValue::from_str(&cookie).map_err(|e| PageError::Internal(e.to_string()))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}

/// Enforce the anti-forgery check for a POSTed form.
///
/// The token from the hidden form field must pair with the nonce cookie
/// and be bound to the current visitor.
pub(crate) fn require_antiforgery(
    state: &AppState,
    jar: &CookieJar,
    visitor: &Visitor,
    form_token: &str,
) -> Result<(), PageError> {
    let Some(cookie) = jar.get(cookies::XSRF_COOKIE) else {
        tracing::warn!("request forgery check failed: nonce cookie missing");
        return Err(PageError::Forbidden);
    };

    if !state
        .antiforgery
        .validate(form_token, cookie.value(), &visitor.subject())
    {
        tracing::warn!("request forgery check failed: token rejected");
        return Err(PageError::Forbidden);
    }

    Ok(())
}
