use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;
use crate::session::errors::SessionError;
use crate::session::models::Session;

/// Anti-forgery subject used for visitors without a session.
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

/// Extension type describing who is making the request.
///
/// Every request gets exactly one of these. A missing, expired, or
/// tampered session cookie makes the visitor anonymous; it never rejects
/// the request, since every page decides for itself what anonymous
/// visitors may see.
#[derive(Debug, Clone)]
pub enum Visitor {
    Anonymous,
    Authenticated(Session),
}

impl Visitor {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Visitor::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Visitor::Authenticated(session) => Some(session),
            Visitor::Anonymous => None,
        }
    }

    /// Subject string anti-forgery tokens are bound to.
    pub fn subject(&self) -> String {
        match self {
            Visitor::Authenticated(session) => session.account_id.to_string(),
            Visitor::Anonymous => ANONYMOUS_SUBJECT.to_string(),
        }
    }
}

/// Middleware that resolves the session cookie into a Visitor extension.
pub async fn identify(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let visitor = match jar.get(cookies::SESSION_COOKIE) {
        Some(cookie) => match state.sessions.verify_session(cookie.value()).await {
            Ok(session) => Visitor::Authenticated(session),
            Err(SessionError::Expired) => {
                tracing::debug!("session cookie expired");
                Visitor::Anonymous
            }
            Err(e) => {
                tracing::debug!(error = %e, "session cookie rejected");
                Visitor::Anonymous
            }
        },
        None => Visitor::Anonymous,
    };

    req.extensions_mut().insert(visitor);

    next.run(req).await
}
