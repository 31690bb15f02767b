//! Shared test utilities: a scripted transport and assertion macros.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use cloud_orchestrator_driver::{
    AlibabaSdkError, ApiRequest, ClientError, CloudflareApiError, CloudflareErrorItem,
    RequestParam, TencentSdkError, Transport,
};

/// Skips a live test when a required environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: {} is not set", $var);
                return;
            }
        )+
    };
}

/// Asserts that an `Option` is `Some` and unwraps it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Asserts that a `Result` is `Ok` and unwraps it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

type Scripted = std::result::Result<Value, ClientError>;

/// Transport that replays scripted responses and records every request.
///
/// Responses are keyed by RPC action (`DescribeInstances`) or, for REST
/// calls, by `METHOD path` (`GET /zones`). Each key holds a queue; the last
/// entry of a queue is replayed for any further calls.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn respond(&self, key: &str, body: Value) {
        self.push(key, Ok(body)).await;
    }

    pub async fn fail(&self, key: &str, err: ClientError) {
        self.push(key, Err(err)).await;
    }

    async fn push(&self, key: &str, response: Scripted) {
        self.responses
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    /// Every request seen so far, in call order.
    pub async fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Requests recorded under `key`.
    pub async fn calls_to(&self, key: &str) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|req| request_key(req) == key)
            .cloned()
            .collect()
    }
}

fn request_key(request: &ApiRequest) -> String {
    if request.action.starts_with('/') {
        format!("{} {}", request.method, request.action)
    } else {
        request.action.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, request: ApiRequest) -> std::result::Result<Value, ClientError> {
        let key = request_key(&request);
        self.calls.lock().await.push(request);

        let mut responses = self.responses.lock().await;
        let Some(queue) = responses.get_mut(&key) else {
            return Err(ClientError::Network(format!("no scripted response for {key}")));
        };
        match queue.len() {
            0 => Err(ClientError::Network(format!("no scripted response for {key}"))),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap(),
        }
    }
}

pub fn test_param() -> RequestParam {
    RequestParam::new("test-secret-id", "test-secret-key").region("test-region")
}

pub fn alibaba_error(code: &str, message: &str) -> ClientError {
    ClientError::Alibaba(AlibabaSdkError::from_api(
        400,
        code,
        message,
        Some("0A1B2C3D-REQUEST".to_string()),
    ))
}

pub fn tencent_error(code: &str, message: &str) -> ClientError {
    ClientError::Tencent(TencentSdkError {
        code: code.to_string(),
        message: format!("{message}[request id:4f1a-77]"),
        request_id: Some("4f1a-77".to_string()),
    })
}

pub fn cloudflare_error(status_code: u16, code: i64, message: &str) -> ClientError {
    ClientError::Cloudflare(CloudflareApiError {
        status_code,
        errors: vec![CloudflareErrorItem {
            code,
            message: message.to_string(),
        }],
    })
}

/// Credentials for live tests, read from the environment.
pub fn live_param(id_var: &str, key_var: &str) -> Option<RequestParam> {
    let secret_id = env::var(id_var).unwrap_or_default();
    let secret_key = env::var(key_var).ok()?;
    let mut param = RequestParam::new(secret_id, secret_key);
    if let Ok(region) = env::var("TEST_REGION") {
        param = param.region(region);
    }
    Some(param)
}
