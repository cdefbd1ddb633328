//! Test helpers: server lifecycle, REST client, WebSocket client

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use courier_common::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, GatewayConfig, ServerConfig,
};
use courier_server::{create_app, create_app_state};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::fixtures::{AuthData, SignupRequest};

/// Check whether the backing stores are configured; tests return early
/// when they are not.
pub async fn check_test_env() -> bool {
    let ok = std::env::var("DATABASE_URL").is_ok() && std::env::var("REDIS_URL").is_ok();
    if !ok {
        eprintln!("skipping: DATABASE_URL / REDIS_URL not set");
    }
    ok
}

/// Build a config for tests from the environment
pub fn test_config() -> Result<AppConfig> {
    Ok(AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL")?,
            max_connections: 5,
            min_connections: 1,
            query_timeout_secs: 5,
        },
        cache: CacheConfig {
            url: std::env::var("REDIS_URL").context("REDIS_URL")?,
            max_connections: 5,
            op_timeout_secs: 1,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
            access_token_ttl_secs: 900,
            refresh_token_ttl_secs: 604_800,
            reset_token_ttl_secs: 3_600,
        },
        gateway: GatewayConfig {
            max_connections_per_user: 5,
            heartbeat_ttl_secs: 60,
            idle_timeout_secs: 90,
            outbound_buffer: 256,
            offline_queue_ttl_secs: 604_800,
        },
        smtp: None,
        client_base_url: "http://localhost:3000".to_string(),
    })
}

/// A running server instance
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on an ephemeral port
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        let state = create_app_state(config).await.map_err(|e| anyhow!("{e}"))?;
        let app = create_app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={token}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(format!("{}{path}", self.base_url())).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(format!("{}{path}", self.base_url()))
            .bearer_auth(token)
            .send()
            .await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}{path}", self.base_url()))
            .json(body)
            .send()
            .await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}{path}", self.base_url()))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn post_auth_empty(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}{path}", self.base_url()))
            .bearer_auth(token)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(format!("{}{path}", self.base_url()))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Sign up a fresh user and return the signup data + tokens
    pub async fn signup_user(&self) -> Result<(SignupRequest, AuthData)> {
        let signup = SignupRequest::unique();
        let response = self.post("/api/v1/auth/signup", &signup).await?;
        let auth: AuthData = assert_json(response, StatusCode::CREATED).await?;
        Ok((signup, auth))
    }

    /// Open an authenticated WebSocket
    pub async fn connect_ws(&self, token: &str) -> Result<WsClient> {
        let (stream, _) = connect_async(self.ws_url(token)).await?;
        Ok(WsClient { stream })
    }
}

/// Assert a status and return the decoded `data` field of the envelope
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected: StatusCode,
) -> Result<T> {
    let status = response.status();
    let body: Value = response.json().await?;
    if status != expected {
        return Err(anyhow!("expected {expected}, got {status}: {body}"));
    }
    let data = body
        .get("data")
        .cloned()
        .ok_or_else(|| anyhow!("envelope missing data: {body}"))?;
    Ok(serde_json::from_value(data)?)
}

/// Assert a status and the envelope's error code
pub async fn assert_error(response: Response, expected: StatusCode, code: &str) -> Result<()> {
    let status = response.status();
    let body: Value = response.json().await?;
    if status != expected {
        return Err(anyhow!("expected {expected}, got {status}: {body}"));
    }
    let got = body
        .pointer("/error/code")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if got != code {
        return Err(anyhow!("expected error code {code}, got {got}: {body}"));
    }
    Ok(())
}

/// A connected WebSocket test client
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    /// Send one JSON frame
    pub async fn send(&mut self, frame: Value) -> Result<()> {
        self.send_raw(&frame.to_string()).await
    }

    /// Send a raw text frame (does not need to be valid JSON)
    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Receive the next text frame as JSON (2 s timeout)
    pub async fn recv(&mut self) -> Result<Value> {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(2), self.stream.next())
                .await
                .context("timed out waiting for frame")?
                .ok_or_else(|| anyhow!("socket closed"))??;

            match message {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(frame) => {
                    return Err(anyhow!("socket closed: {frame:?}"));
                }
                other => return Err(anyhow!("unexpected message: {other:?}")),
            }
        }
    }

    /// Receive frames until one matches the given `type`, failing after
    /// a few frames
    pub async fn recv_type(&mut self, frame_type: &str) -> Result<Value> {
        for _ in 0..8 {
            let frame = self.recv().await?;
            if frame["type"] == frame_type {
                return Ok(frame);
            }
        }
        Err(anyhow!("no {frame_type} frame received"))
    }

    /// Ping and wait for pong. Doubles as a registration barrier: once
    /// the pong arrives, the connection is registered and presence set.
    pub async fn ping(&mut self) -> Result<()> {
        self.send(serde_json::json!({"type": "ping"})).await?;
        self.recv_type("pong").await?;
        Ok(())
    }

    /// Wait for the server-initiated close frame and return its code
    pub async fn expect_close(&mut self) -> Result<u16> {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(2), self.stream.next())
                .await
                .context("timed out waiting for close")?
                .ok_or_else(|| anyhow!("socket ended without close frame"))??;

            match message {
                Message::Close(Some(frame)) => return Ok(frame.code.into()),
                Message::Close(None) => return Err(anyhow!("close frame without code")),
                _ => continue,
            }
        }
    }

    /// Close the socket from the client side
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
