#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use filmes_api::{router, AppConfig, AppState, Database};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// In-process server with its own in-memory database. Every test gets a
/// fresh one, so tests never see each other's rows.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).bearer_auth(token).json(body).send().await?)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).bearer_auth(token).json(body).send().await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    /// Register and log in; returns (user id, bearer token).
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(i64, String)> {
        let res = self
            .post("/auth/registrar", &json!({"nome": name, "email": email, "senha": password}))
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED, "registration failed");

        let res = self.post("/auth/login", &json!({"email": email, "senha": password})).await?;
        assert_eq!(res.status(), StatusCode::OK, "login failed");
        let body = res.json::<Value>().await?;

        let id = body["data"]["usuario"]["id"].as_i64().context("login without user id")?;
        let token = body["data"]["token"].as_str().context("login without token")?.to_string();
        Ok((id, token))
    }

    /// Create a movie as the token's owner; returns its id.
    pub async fn create_movie(&self, token: &str, title: &str, director: &str, genre: &str) -> Result<i64> {
        let res = self
            .post_auth(
                "/filmes",
                token,
                &json!({
                    "titulo": title,
                    "descricao": format!("Sinopse de {title}"),
                    "diretor": director,
                    "ano_lancamento": 2014,
                    "genero": genre,
                }),
            )
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED, "movie creation failed");

        let body = res.json::<Value>().await?;
        body["data"]["filme"]["id"].as_i64().context("created movie without id")
    }

    pub async fn rate(&self, token: &str, movie_id: i64, score: Value) -> Result<Response> {
        self.post_auth(&format!("/filmes/{movie_id}/avaliar"), token, &json!({"nota": score}))
            .await
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_JWT_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(test_config()).await
}

pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let db = Database::in_memory().await.context("in-memory database")?;
    db.migrate().await.context("migrations")?;

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    let state = AppState::new(db, config);
    let app = router(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        client: reqwest::Client::new(),
    })
}

/// Assert the status and return the parsed body.
pub async fn expect_status(res: Response, status: StatusCode) -> Result<Value> {
    let actual = res.status();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    assert_eq!(actual, status, "unexpected status, body: {}", body);
    Ok(body)
}
