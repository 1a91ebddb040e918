use axum::extract::State;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum::Extension;

use super::append_set_cookie;
use super::PageError;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::Visitor;
use crate::inbound::http::pages;
use crate::inbound::http::router::AppState;

/// The gated page. Anonymous visitors are sent to the login form.
pub async fn show_home(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
) -> Result<Response, PageError> {
    let Some(session) = visitor.session() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let pair = state.antiforgery.issue(&visitor.subject())?;
    let html = pages::home_page(session.email.as_str(), &pair.form_token);

    let mut response = Html(html).into_response();
    append_set_cookie(
        response.headers_mut(),
        cookies::xsrf_cookie(&pair.cookie_value),
    )?;
    Ok(response)
}
