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
use crate::flow::models::RegistrationForm;
use crate::flow::models::RegistrationOutcome;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::Visitor;
use crate::inbound::http::pages;
use crate::inbound::http::pages::RegisterView;
use crate::inbound::http::router::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequestBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
    #[serde(default)]
    csrf_token: String,
}

pub async fn show_register(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
) -> Result<Response, PageError> {
    if visitor.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }

    render_register(&state, &visitor, RegisterView::default())
}

pub async fn submit_register(
    State(state): State<AppState>,
    Extension(visitor): Extension<Visitor>,
    jar: CookieJar,
    Form(body): Form<RegisterRequestBody>,
) -> Result<Response, PageError> {
    require_antiforgery(&state, &jar, &visitor, &body.csrf_token)?;

    let form = RegistrationForm {
        email: body.email.clone(),
        password: body.password,
        confirm_password: body.confirm_password,
    };

    match state.flow.submit_registration(form).await? {
        RegistrationOutcome::Registered { token } => {
            // A fresh registration signs in for this browser session only
            let mut response = Redirect::to("/").into_response();
            append_set_cookie(
                response.headers_mut(),
                cookies::session_cookie(&token, None),
            )?;
            Ok(response)
        }
        RegistrationOutcome::Rejected { errors }
        | RegistrationOutcome::Invalid { errors } => render_register(
            &state,
            &visitor,
            RegisterView {
                email: body.email,
                errors,
            },
        ),
    }
}

/// Render the registration form with a fresh anti-forgery pair.
fn render_register(
    state: &AppState,
    visitor: &Visitor,
    view: RegisterView,
) -> Result<Response, PageError> {
    let pair = state.antiforgery.issue(&visitor.subject())?;
    let html = pages::register_page(&pair.form_token, &view);

    let mut response = Html(html).into_response();
    append_set_cookie(
        response.headers_mut(),
        cookies::xsrf_cookie(&pair.cookie_value),
    )?;
    Ok(response)
}
