use axum::extract::State;
use axum::response::Html;
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
use crate::flow::models::VerificationForm;
use crate::flow::models::VerificationOutcome;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::Visitor;
use crate::inbound::http::pages;
use crate::inbound::http::router::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyRequestBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    csrf_token: String,
}

/// Second factor code form. Only reachable mid-login, while the
/// challenge cookie from the password step is still alive.
pub async fn show_verify(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    if visitor.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }
    if jar.get(cookies::CHALLENGE_COOKIE).is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    render_verify(&state, &visitor, None)
}

pub async fn submit_verify(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
    jar: CookieJar,
    Form(body): Form<VerifyRequestBody>,
) -> Result<Response, PageError> {
    require_antiforgery(&state, &jar, &visitor, &body.csrf_token)?;

    let Some(challenge) = jar.get(cookies::CHALLENGE_COOKIE) else {
        return Ok(Redirect::to("/login").into_response());
    };

    let form = VerificationForm {
        challenge: challenge.value().to_string(),
        code: body.code,
    };

    match state.flow.submit_verification(form).await? {
        VerificationOutcome::LoggedIn { token, persistent } => {
            let max_age = persistent.then_some(state.cookie_ttls.remembered_seconds);

            let mut response = Redirect::to("/").into_response();
            let headers = response.headers_mut();
            append_set_cookie(headers, cookies::session_cookie(&token, max_age))?;
            append_set_cookie(headers, cookies::clear_challenge_cookie())?;
            Ok(response)
        }
        VerificationOutcome::InvalidCode => {
            render_verify(&state, &visitor, Some(pages::INVALID_CODE_MESSAGE))
        }
        VerificationOutcome::ChallengeExpired => {
            // The login has to start over from the password step
            let mut response = Redirect::to("/login").into_response();
            append_set_cookie(response.headers_mut(), cookies::clear_challenge_cookie())?;
            Ok(response)
        }
    }
}

/// Render the code form with a fresh anti-forgery pair.
fn render_verify(
    state: &AppState,
    visitor: &Visitor,
    message: Option<&str>,
) -> Result<Response, PageError> {
    let pair = state.antiforgery.issue(&visitor.subject())?;
    let html = pages::verify_page(&pair.form_token, message);

    let mut response = Html(html).into_response();
    append_set_cookie(
        response.headers_mut(),
        cookies::xsrf_cookie(&pair.cookie_value),
    )?;
    Ok(response)
}
