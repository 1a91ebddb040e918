use std::sync::Arc;

use authkit::PasswordHasher;
use authkit::TokenSigner;
use chrono::Utc;
use gate_service::account::models::Account;
use gate_service::account::models::AccountId;
use gate_service::account::models::Email;
use gate_service::account::models::LockoutPolicy;
use gate_service::account::ports::CredentialStore;
use gate_service::account::service::IdentityService;
use gate_service::flow::service::AuthFlow;
use gate_service::inbound::http::antiforgery::AntiForgery;
use gate_service::inbound::http::cookies::CookieTtls;
use gate_service::inbound::http::router::create_router;
use gate_service::outbound::repositories::InMemoryCredentialStore;
use gate_service::outbound::second_factor::FixedCodeVerifier;
use gate_service::session::service::SignedSessionIssuer;

/// Code the fixture second factor verifier accepts.
pub const SECOND_FACTOR_CODE: &str = "424242";
/// Lockout threshold configured for the test server.
pub const LOCKOUT_MAX_FAILURES: u32 = 5;

/// Test application that spawns a real server
///
/// Runs against the in-memory credential store, with redirects left
/// unfollowed so every hop stays visible to assertions.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub store: Arc<InMemoryCredentialStore>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let signer = Arc::new(TokenSigner::new(
            b"test-secret-key-for-signing-at-least-32-bytes",
        ));
        let store = Arc::new(InMemoryCredentialStore::new());

        let identity = Arc::new(IdentityService::new(
            Arc::clone(&store),
            LockoutPolicy::new(LOCKOUT_MAX_FAILURES, 15),
        ));
        let sessions = Arc::new(SignedSessionIssuer::new(Arc::clone(&signer), 2, 336, 5));
        let second_factor = Arc::new(FixedCodeVerifier::new(SECOND_FACTOR_CODE.to_string()));
        let flow = Arc::new(AuthFlow::new(
            identity,
            Arc::clone(&sessions),
            second_factor,
        ));
        let antiforgery = Arc::new(AntiForgery::new(Arc::clone(&signer)));

        let router = create_router(flow, sessions, antiforgery, CookieTtls::new(336, 5));

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server stopped unexpectedly");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build http client");

        Self {
            address,
            client,
            store,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Fetch a form page and pull the embedded anti-forgery token out.
    pub async fn csrf_token_from(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "expected a form page at {}",
            path
        );
        let html = response.text().await.expect("Failed to read page body");
        extract_csrf_token(&html)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> reqwest::Response {
        let token = self.csrf_token_from("/register").await;
        self.post_form(
            "/register",
            &[
                ("email", email),
                ("password", password),
                ("confirm_password", confirm_password),
                ("csrf_token", &token),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        let token = self.csrf_token_from("/login").await;
        self.post_form(
            "/login",
            &[
                ("email", email),
                ("password", password),
                ("csrf_token", &token),
            ],
        )
        .await
    }

    pub async fn login_remembered(&self, email: &str, password: &str) -> reqwest::Response {
        let token = self.csrf_token_from("/login").await;
        self.post_form(
            "/login",
            &[
                ("email", email),
                ("password", password),
                ("remember_me", "on"),
                ("csrf_token", &token),
            ],
        )
        .await
    }

    /// Sign out via the logout form on the gated page.
    pub async fn logout(&self) -> reqwest::Response {
        let token = self.csrf_token_from("/").await;
        self.post_form("/logout", &[("csrf_token", &token)]).await
    }

    /// Seed an account directly into the store, bypassing the form flow.
    pub async fn seed_account(&self, email: &str, password: &str, second_factor_enabled: bool) {
        let account = Account {
            id: AccountId::new(),
            email: Email::new(email.to_string()).expect("invalid test email"),
            password_hash: PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash test password"),
            failed_logins: 0,
            locked_until: None,
            second_factor_enabled,
            created_at: Utc::now(),
        };
        self.store
            .create(account)
            .await
            .expect("Failed to seed account");
    }

    pub async fn account_exists(&self, email: &str) -> bool {
        let email = Email::new(email.to_string()).expect("invalid test email");
        self.store
            .find_by_email(&email)
            .await
            .expect("store lookup failed")
            .is_some()
    }
}

/// Pull the hidden csrf_token field out of a rendered form.
pub fn extract_csrf_token(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html
        .find(marker)
        .expect("page carries no csrf_token field")
        + marker.len();
    let end = html[start..]
        .find('"')
        .expect("csrf_token field is unterminated");
    html[start..start + end].to_string()
}

/// The Set-Cookie values a response carries, as plain strings.
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}
