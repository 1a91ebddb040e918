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
use crate::flow::models::LoginForm;
use crate::flow::models::LoginOutcome;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::Visitor;
use crate::inbound::http::pages;
use crate::inbound::http::pages::LoginView;
use crate::inbound::http::router::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    /// Checkbox: present when ticked, absent otherwise.
    remember_me: Option<String>,
    #[serde(default)]
    csrf_token: String,
}

pub async fn show_login(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
) -> Result<Response, PageError> {
    if visitor.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }

    render_login(&state, &visitor, LoginView::default())
}

pub async fn submit_login(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
    jar: CookieJar,
    Form(body): Form<LoginRequestBody>,
) -> Result<Response, PageError> {
    require_antiforgery(&state, &jar, &visitor, &body.csrf_token)?;

    let form = LoginForm {
        email: body.email.clone(),
        password: body.password,
        remember_me: body.remember_me.is_some(),
    };

    match state.flow.submit_login(form).await? {
        LoginOutcome::LoggedIn { token, persistent } => {
            let max_age = persistent.then_some(state.cookie_ttls.remembered_seconds);

            let mut response = Redirect::to("/").into_response();
            append_set_cookie(
                response.headers_mut(),
                cookies::session_cookie(&token, max_age),
            )?;
            Ok(response)
        }
        LoginOutcome::NeedsVerification { challenge, .. } => {
            let mut response = Redirect::to("/login/verify").into_response();
            append_set_cookie(
                response.headers_mut(),
                cookies::challenge_cookie(&challenge, state.cookie_ttls.challenge_seconds),
            )?;
            Ok(response)
        }
        LoginOutcome::LockedOut => render_login(
            &state,
            &visitor,
            LoginView {
                email: body.email,
                message: Some(pages::LOCKED_OUT_MESSAGE.to_string()),
                errors: Vec::new(),
            },
        ),
        LoginOutcome::InvalidCredentials => render_login(
            &state,
            &visitor,
            LoginView {
                email: body.email,
                message: Some(pages::INVALID_CREDENTIALS_MESSAGE.to_string()),
                errors: Vec::new(),
            },
        ),
        LoginOutcome::Invalid { errors } => render_login(
            &state,
            &visitor,
            LoginView {
                email: body.email,
                message: None,
                errors,
            },
        ),
    }
}

/// Render the login form with a fresh anti-forgery pair.
fn render_login(
    state: &AppState,
    visitor: &Visitor,
    view: LoginView,
) -> Result<Response, PageError> {
    let pair = state.antiforgery.issue(&visitor.subject())?;
    let html = pages::login_page(&pair.form_token, &view);

    let mut response = Html(html).into_response();
    append_set_cookie(
        response.headers_mut(),
        cookies::xsrf_cookie(&pair.cookie_value),
    )?;
    Ok(response)
}
