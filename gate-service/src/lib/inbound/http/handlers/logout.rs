use axum::extract::State;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum::Extension;
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::append_set_cookie;
use super::require_antiforgery;
use super::PageError;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::Visitor;
use crate::inbound::http::router::AppState;

#[derive(Debug, Deserialize)]
pub struct LogoutRequestBody {
    #[serde(default)]
    csrf_token: String,
}

/// Sign out by dropping the session cookie.
///
/// Sessions are stateless, so there is nothing server side to revoke.
/// Idempotent: signing out while anonymous just clears cookies again.
pub async fn submit_logout(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
    jar: CookieJar,
    Form(body): Form<LogoutRequestBody>,
) -> Result<Response, PageError> {
    require_antiforgery(&state, &jar, &visitor, &body.csrf_token)?;

    state.flow.log_out(visitor.session());

    let mut response = Redirect::to("/login").into_response();
    let headers = response.headers_mut();
    append_set_cookie(headers, cookies::clear_session_cookie())?;
    append_set_cookie(headers, cookies::clear_challenge_cookie())?;
    Ok(response)
}
