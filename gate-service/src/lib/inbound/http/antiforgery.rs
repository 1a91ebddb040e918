use std::sync::Arc;

use authkit::TokenError;
use authkit::TokenSigner;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

const PURPOSE_XSRF: &str = "xsrf";
const TOKEN_TTL_HOURS: i64 = 2;

#[derive(Debug, Serialize, Deserialize)]
struct XsrfClaims {
    sub: String,
    nonce: String,
    purpose: String,
    exp: i64,
}

/// A matched pair of anti-forgery values for one rendered form.
///
/// The nonce travels in a cookie, the signed token in a hidden form
/// field. A forged cross-site POST can send neither a matching pair nor
/// a token signed by us.
#[derive(Debug, Clone)]
pub struct AntiForgeryPair {
    pub cookie_value: String,
    pub form_token: String,
}

/// Signed double-submit anti-forgery tokens.
///
/// Tokens are bound to the visitor they were issued for, so a token
/// minted on an anonymous page cannot authorize a POST for a signed-in
/// account.
pub struct AntiForgery {
    signer: Arc<TokenSigner>,
    ttl: Duration,
}

impl AntiForgery {
    pub fn new(signer: Arc<TokenSigner>) -> Self {
        Self {
            signer,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Mint a fresh pair for a form rendered to the given visitor.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token could not be signed
    pub fn issue(&self, subject: &str) -> Result<AntiForgeryPair, TokenError> {
        let nonce = Uuid::new_v4().to_string();

        let claims = XsrfClaims {
            sub: subject.to_string(),
            nonce: nonce.clone(),
            purpose: PURPOSE_XSRF.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        let form_token = self.signer.encode(&claims)?;

        Ok(AntiForgeryPair {
            cookie_value: nonce,
            form_token,
        })
    }

    /// Check a submitted form token against the cookie nonce and the
    /// current visitor. Any failure reads as a forgery.
    pub fn validate(&self, form_token: &str, cookie_nonce: &str, subject: &str) -> bool {
        match self.signer.decode::<XsrfClaims>(form_token) {
            Ok(claims) => {
                claims.purpose == PURPOSE_XSRF
                    && claims.nonce == cookie_nonce
                    && claims.sub == subject
            }
            Err(_) => false,
        }
    }
}
