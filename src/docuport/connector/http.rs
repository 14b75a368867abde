//! Production connector over a blocking HTTP client.
//!
//! Owns the authenticated session cookie jar and the raw request execution.
//! One trait call, one round trip; remote rejections are mapped onto the
//! crate error taxonomy by HTTP status, transport failures surface unchanged
//! as `Transport`.

use super::{
    BatchUpdateRequest, CookiePersistence, MergeRequest, NoCookiePersistence, QueryRequest,
    RepositoryConnector, SplitRequest, TransferRequest,
};
use crate::error::{DocuportError, Result};
use crate::model::{
    BatchUpdateResultItem, Container, Dialog, Document, QueryResultPage, Session,
};
use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    organization: &'a str,
    user_name: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct TokenLoginRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    organization: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest {
    lifetime_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    message: String,
}

pub struct HttpConnector {
    client: Client,
    jar: Arc<Jar>,
    base_url: String,
    persistence: Box<dyn CookiePersistence>,
}

impl HttpConnector {
    /// Build a connector against `server_url` with a fresh cookie jar.
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            jar,
            base_url: server_url.into().trim_end_matches('/').to_string(),
            persistence: Box::new(NoCookiePersistence),
        })
    }

    /// Wire in a cookie persistence implementation and seed the jar from it.
    pub fn with_cookie_persistence(
        mut self,
        persistence: impl CookiePersistence + 'static,
    ) -> Result<Self> {
        if let Some(cookies) = persistence.load_cookies()? {
            let url = self.base()?;
            for cookie in cookies.split("; ") {
                self.jar.add_cookie_str(cookie, &url);
            }
            debug!("seeded cookie jar from persisted cookies");
        }
        self.persistence = Box::new(persistence);
        Ok(self)
    }

    /// Authenticate with organization credentials and obtain a session.
    pub fn connect(
        &self,
        organization: &str,
        user_name: &str,
        password: &str,
    ) -> Result<Session> {
        let body = LoginRequest {
            organization,
            user_name,
            password,
        };
        let response: LoginResponse = self.post("/api/auth/login", &body)?;
        self.persist_cookies()?;
        debug!("session opened for organization '{}'", response.organization);
        Ok(Session::new(response.organization, self.base_url.clone()))
    }

    /// Authenticate with a previously issued multi-use token.
    pub fn connect_with_token(&self, token: &str) -> Result<Session> {
        let body = TokenLoginRequest { token };
        let response: LoginResponse = self.post("/api/auth/token-login", &body)?;
        self.persist_cookies()?;
        Ok(Session::new(response.organization, self.base_url.clone()))
    }

    fn base(&self) -> Result<reqwest::Url> {
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| DocuportError::Transport(format!("invalid server url: {}", e)))
    }

    fn persist_cookies(&self) -> Result<()> {
        let url = self.base()?;
        if let Some(header) = self.jar.cookies(&url) {
            if let Ok(cookies) = header.to_str() {
                self.persistence.save_cookies(cookies)?;
            }
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().map_err(transport)?;
        decode(response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(transport)?;
        decode(response)
    }
}

fn transport(err: reqwest::Error) -> DocuportError {
    DocuportError::Transport(err.to_string())
}

/// Map a completed response onto the taxonomy: remote rejections by status,
/// everything unexpected as `Transport`.
fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response.json().map_err(transport);
    }
    let message = response
        .json::<RemoteError>()
        .map(|e| e.message)
        .unwrap_or_else(|_| status.to_string());
    Err(match status {
        StatusCode::NOT_FOUND => DocuportError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DocuportError::Validation(message)
        }
        StatusCode::CONFLICT | StatusCode::LOCKED => DocuportError::Transfer(message),
        _ => DocuportError::Transport(format!("{}: {}", status, message)),
    })
}

impl RepositoryConnector for HttpConnector {
    fn list_containers(&self, _session: &Session) -> Result<Vec<Container>> {
        self.get("/api/containers")
    }

    fn container_dialogs(&self, _session: &Session, container_id: &str) -> Result<Vec<Dialog>> {
        self.get(&format!("/api/containers/{}/dialogs", container_id))
    }

    fn fetch_document(
        &self,
        _session: &Session,
        container_id: &str,
        document_id: &str,
    ) -> Result<Document> {
        self.get(&format!(
            "/api/containers/{}/documents/{}",
            container_id, document_id
        ))
    }

    fn run_query(
        &self,
        _session: &Session,
        dialog_id: &str,
        request: &QueryRequest,
    ) -> Result<QueryResultPage> {
        debug!(
            "query through dialog '{}' (start={}, count_only={})",
            dialog_id, request.start, request.count_only
        );
        self.post(&format!("/api/dialogs/{}/query", dialog_id), request)
    }

    fn submit_transfer(
        &self,
        _session: &Session,
        request: &TransferRequest,
    ) -> Result<QueryResultPage> {
        debug!(
            "transfer document '{}' from '{}' to '{}'",
            request.document_id, request.source_container_id, request.destination_container_id
        );
        self.post("/api/transfers", request)
    }

    fn submit_merge(&self, _session: &Session, request: &MergeRequest) -> Result<Document> {
        self.post("/api/merges", request)
    }

    fn submit_split(&self, _session: &Session, request: &SplitRequest) -> Result<QueryResultPage> {
        self.post("/api/splits", request)
    }

    fn submit_batch_update(
        &self,
        _session: &Session,
        request: &BatchUpdateRequest,
    ) -> Result<Vec<BatchUpdateResultItem>> {
        debug!(
            "batch update of {} document(s) in '{}'",
            request.document_ids.len(),
            request.container_id
        );
        self.post("/api/batch-updates", request)
    }

    fn request_multi_use_token(&self, _session: &Session, lifetime: Duration) -> Result<String> {
        let body = TokenRequest {
            lifetime_seconds: lifetime.as_secs(),
        };
        let response: TokenResponse = self.post("/api/auth/multi-use-token", &body)?;
        Ok(response.token)
    }

    fn close(&self, session: &Session) -> Result<()> {
        // Best-effort: the server releases its capacity reservation
        // asynchronously, and a failed logout leaves nothing to recover.
        match self.client.post(self.url("/api/auth/logout")).send() {
            Ok(response) if response.status().is_success() => {
                debug!("session {} released", session.id);
            }
            Ok(response) => {
                warn!("logout for session {} answered {}", session.id, response.status());
            }
            Err(err) => {
                warn!("logout for session {} failed in transit: {}", session.id, err);
            }
        }
        Ok(())
    }
}
