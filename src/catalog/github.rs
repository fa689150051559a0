//! Catalog mirror stored as a JSON file committed to a GitHub repository via
//! the contents API. The blob sha is the revision marker: updates carry the
//! prior sha and GitHub rejects the commit when it no longer matches.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{CatalogStore, Revision};
use crate::config::GithubConfig;
use crate::domain::Product;
use crate::{Result, ShopError};

const GITHUB_API: &str = "https://api.github.com";

pub struct GithubCatalog {
    http: reqwest::Client,
    config: GithubConfig,
    api_base: String,
}

impl GithubCatalog {
    pub fn new(config: GithubConfig) -> Result<Self> {
        if config.token.is_empty() || config.repo.is_empty() {
            return Err(ShopError::Config("GITHUB_TOKEN/GITHUB_REPO".into()));
        }
        let http = reqwest::Client::builder()
            .user_agent("shoplite")
            .build()?;
        Ok(Self { http, config, api_base: GITHUB_API.to_string() })
    }

    /// Point the client at a different API host (stub server in tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn contents_url(&self) -> String {
        format!("{}/repos/{}/contents/{}", self.api_base, self.config.repo, self.config.path)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Authorization", format!("token {}", self.config.token))
            .header("Accept", "application/vnd.github.v3+json")
    }
}

#[derive(Deserialize)]
struct ContentsFile {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Deserialize)]
struct PutResponse {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[async_trait]
impl CatalogStore for GithubCatalog {
    async fn fetch(&self) -> Result<(Vec<Product>, Option<Revision>)> {
        let url = format!("{}?ref={}", self.contents_url(), self.config.branch);
        let res = self.auth(self.http.get(&url)).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok((Vec::new(), None));
        }
        if !res.status().is_success() {
            return Err(ShopError::Upstream {
                status: res.status().as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let file: ContentsFile = res.json().await?;
        // The API wraps base64 content at 60 columns.
        let stripped: String = file.content.chars().filter(|c| !c.is_whitespace()).collect();
        let raw = BASE64
            .decode(stripped.as_bytes())
            .map_err(|e| ShopError::Internal(format!("invalid catalog content: {e}")))?;
        let products: Vec<Product> = serde_json::from_slice(&raw)?;
        Ok((products, Some(Revision(file.sha))))
    }

    async fn replace(
        &self,
        products: Vec<Product>,
        expected: Option<&Revision>,
        message: &str,
    ) -> Result<Revision> {
        let content = BASE64.encode(serde_json::to_vec_pretty(&products)?);
        let body = PutBody {
            message,
            content,
            branch: &self.config.branch,
            sha: expected.map(Revision::as_str),
        };
        let res = self.auth(self.http.put(self.contents_url())).json(&body).send().await?;
        match res.status() {
            // Stale sha comes back as 409; a missing sha for an existing
            // file as 422.
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(ShopError::Conflict),
            status if !status.is_success() => Err(ShopError::Upstream {
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            }),
            _ => {
                let put: PutResponse = res.json().await?;
                Ok(Revision(put.commit.sha))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::routing::get;
    use axum::{Json, Router};
    use rust_decimal::Decimal;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct StubState {
        file: Arc<Mutex<Option<(String, String)>>>, // (content b64, sha)
    }

    async fn stub_get(State(s): State<StubState>) -> axum::response::Response {
        use axum::response::IntoResponse;
        match s.file.lock().unwrap().clone() {
            Some((content, sha)) => {
                Json(serde_json::json!({ "content": content, "sha": sha })).into_response()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn stub_put(
        State(s): State<StubState>,
        Json(body): Json<serde_json::Value>,
    ) -> axum::response::Response {
        use axum::response::IntoResponse;
        let mut file = s.file.lock().unwrap();
        let current_sha = file.as_ref().map(|(_, sha)| sha.clone());
        let sent_sha = body.get("sha").and_then(|v| v.as_str()).map(String::from);
        if current_sha != sent_sha {
            return StatusCode::CONFLICT.into_response();
        }
        let content = body["content"].as_str().unwrap_or_default().to_string();
        let sha = format!("sha-{:016x}", xxhash_rust::xxh3::xxh3_64(content.as_bytes()));
        *file = Some((content, sha.clone()));
        Json(serde_json::json!({ "commit": { "sha": sha } })).into_response()
    }

    async fn spawn_stub() -> (String, StubState) {
        let state = StubState::default();
        let app = Router::new()
            .route("/repos/acme/shop/contents/products.json", get(stub_get).put(stub_put))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), state)
    }

    fn catalog(base: &str) -> GithubCatalog {
        GithubCatalog::new(GithubConfig {
            token: "t0ken".into(),
            repo: "acme/shop".into(),
            path: "products.json".into(),
            branch: "main".into(),
        })
        .unwrap()
        .with_api_base(base)
    }

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            title: id.to_uppercase(),
            category: "General".into(),
            price: Decimal::new(10, 0),
            image: String::new(),
            description: String::new(),
            poster: None,
            stock: None,
            added_by_admin: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let err = GithubCatalog::new(GithubConfig {
            token: String::new(),
            repo: "acme/shop".into(),
            path: "products.json".into(),
            branch: "main".into(),
        })
        .err()
        .unwrap();
        assert!(matches!(err, ShopError::Config(_)));
    }

    #[tokio::test]
    async fn test_absent_file_reads_empty() {
        let (base, _state) = spawn_stub().await;
        let (products, revision) = catalog(&base).fetch().await.unwrap();
        assert!(products.is_empty());
        assert!(revision.is_none());
    }

    #[tokio::test]
    async fn test_commit_roundtrip_and_conflict() {
        let (base, _state) = spawn_stub().await;
        let store = catalog(&base);

        let rev = store.replace(vec![product("p1")], None, "seed").await.unwrap();
        let (products, current) = store.fetch().await.unwrap();
        assert_eq!(products[0].id, "p1");
        assert_eq!(current.as_ref(), Some(&rev));

        store.replace(vec![product("p2")], Some(&rev), "update").await.unwrap();
        let err = store.replace(vec![product("p3")], Some(&rev), "stale").await.unwrap_err();
        assert!(matches!(err, ShopError::Conflict));
    }
}
