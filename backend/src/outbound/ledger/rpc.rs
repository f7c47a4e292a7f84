//! Reqwest-backed JSON-RPC client for an Ethereum-style ledger node.
//!
//! The client owns transport details only: envelope serialisation, HTTP
//! status and JSON-RPC error mapping, and decoding of `result` payloads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::time::{Instant, sleep};
use tracing::debug;

use super::dto::{RpcRequestDto, RpcResponseDto, TransactionReceipt, TransactionRequest};

/// Failures talking to the ledger node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// The node could not be reached.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The request or the node timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },
    /// The node answered with a non-success HTTP status.
    #[error("unexpected http status: {message}")]
    Status { message: String },
    /// The payload was not a valid JSON-RPC response.
    #[error("invalid response: {message}")]
    Decode { message: String },
    /// The node returned a JSON-RPC error object.
    #[error("node error {code}: {message}")]
    Remote { code: i64, message: String },
}

impl RpcError {
    /// Whether the failure means the node itself is unavailable.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
            || matches!(self, Self::Status { message } if message.starts_with("status 5"))
    }
}

/// JSON-RPC client bound to one node endpoint.
#[derive(Debug)]
pub struct JsonRpcClient {
    client: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Build a client with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Invoke `method` and decode its `result`. A `null` result decodes only
    /// into types that accept it, such as `Option<T>`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequestDto {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(method, id, "sending ledger rpc request");
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_result(method, body.as_ref())
    }

    /// Accounts the node manages, in node order.
    pub async fn accounts(&self) -> Result<Vec<String>, RpcError> {
        self.call("eth_accounts", json!([])).await
    }

    /// Latest block number.
    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let raw: String = self.call("eth_blockNumber", json!([])).await?;
        parse_quantity(&raw)
    }

    /// Submit a transaction signed by the node; returns its hash.
    pub async fn send_transaction(&self, request: &TransactionRequest) -> Result<String, RpcError> {
        self.call("eth_sendTransaction", json!([request])).await
    }

    /// Receipt for `transaction`, or `None` while it is pending.
    pub async fn transaction_receipt(
        &self,
        transaction: &str,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.call("eth_getTransactionReceipt", json!([transaction]))
            .await
    }

    /// Poll for a receipt every `interval` until one appears or `timeout`
    /// elapses. `Ok(None)` means the wait timed out.
    pub async fn wait_for_receipt(
        &self,
        transaction: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(receipt) = self.transaction_receipt(transaction).await? {
                return Ok(Some(receipt));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            sleep(interval.min(deadline - now)).await;
        }
    }
}

fn decode_result<T: DeserializeOwned>(method: &str, body: &[u8]) -> Result<T, RpcError> {
    let envelope: RpcResponseDto = serde_json::from_slice(body).map_err(|error| {
        RpcError::Decode {
            message: format!("{method}: invalid JSON-RPC payload: {error}"),
        }
    })?;
    if let Some(error) = envelope.error {
        return Err(RpcError::Remote {
            code: error.code,
            message: error.message,
        });
    }
    serde_json::from_value(envelope.result.unwrap_or(Value::Null)).map_err(|error| {
        RpcError::Decode {
            message: format!("{method}: unexpected result: {error}"),
        }
    })
}

/// Parse a `0x`-prefixed hex quantity.
pub(crate) fn parse_quantity(raw: &str) -> Result<u64, RpcError> {
    raw.strip_prefix("0x")
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .ok_or_else(|| RpcError::Decode {
            message: format!("invalid hex quantity {raw:?}"),
        })
}

fn map_transport_error(error: reqwest::Error) -> RpcError {
    if error.is_timeout() {
        RpcError::Timeout {
            message: error.to_string(),
        }
    } else {
        RpcError::Transport {
            message: error.to_string(),
        }
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RpcError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => RpcError::Timeout { message },
        _ => RpcError::Status { message },
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for JSON-RPC decoding and error mapping.
    use super::*;
    use crate::outbound::ledger::test_node::{StubNode, StubNodeBehaviour};
    use rstest::rstest;

    #[rstest]
    #[case(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case(StatusCode::BAD_GATEWAY, true)]
    #[case(StatusCode::NOT_FOUND, false)]
    fn status_errors_classify_reachability(#[case] status: StatusCode, #[case] unreachable: bool) {
        let error = map_status_error(status, b"  upstream\n  down ");
        assert_eq!(error.is_unreachable(), unreachable);
    }

    #[rstest]
    fn status_message_compacts_body() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"  no\n  such   route ");
        assert_eq!(
            error,
            RpcError::Status {
                message: "status 404: no such route".to_owned()
            }
        );
    }

    #[rstest]
    fn remote_errors_surface_code_and_message() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"sender account not recognized"}}"#;
        let error = decode_result::<String>("eth_sendTransaction", body).expect_err("remote");
        assert_eq!(
            error,
            RpcError::Remote {
                code: -32000,
                message: "sender account not recognized".to_owned()
            }
        );
        assert!(!error.is_unreachable());
    }

    #[rstest]
    fn null_result_decodes_to_none() {
        let body = br#"{"jsonrpc":"2.0","id":3,"result":null}"#;
        let receipt = decode_result::<Option<TransactionReceipt>>("eth_getTransactionReceipt", body)
            .expect("null result");
        assert!(receipt.is_none());
    }

    #[rstest]
    fn non_json_payload_is_decode_error() {
        let error = decode_result::<String>("eth_blockNumber", b"<html>").expect_err("html");
        assert!(matches!(error, RpcError::Decode { .. }));
    }

    #[rstest]
    #[case("0x0", Some(0))]
    #[case("0x1b4", Some(436))]
    #[case("1b4", None)]
    #[case("0xzz", None)]
    fn parses_hex_quantities(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_quantity(raw).ok(), expected);
    }

    #[rstest]
    #[actix_rt::test]
    async fn waits_until_receipt_appears() {
        let node = StubNode::start(StubNodeBehaviour {
            pending_polls: 2,
            ..StubNodeBehaviour::default()
        })
        .await;
        let client = node.client();

        let receipt = client
            .wait_for_receipt(
                StubNode::TRANSACTION,
                Duration::from_millis(5),
                Duration::from_secs(5),
            )
            .await
            .expect("rpc ok")
            .expect("receipt arrives");
        assert_eq!(receipt.transaction_hash, StubNode::TRANSACTION);
        assert_eq!(node.calls_to("eth_getTransactionReceipt"), 3);
    }

    #[rstest]
    #[actix_rt::test]
    async fn wait_gives_up_at_deadline() {
        let node = StubNode::start(StubNodeBehaviour {
            pending_polls: u32::MAX,
            ..StubNodeBehaviour::default()
        })
        .await;

        let receipt = node
            .client()
            .wait_for_receipt(
                StubNode::TRANSACTION,
                Duration::from_millis(5),
                Duration::from_millis(30),
            )
            .await
            .expect("rpc ok");
        assert!(receipt.is_none());
    }

    #[rstest]
    #[actix_rt::test]
    async fn reads_accounts_and_block_number() {
        let node = StubNode::start(StubNodeBehaviour::default()).await;
        let client = node.client();

        assert_eq!(
            client.accounts().await.expect("accounts"),
            vec![StubNode::ADMIN.to_owned()]
        );
        assert_eq!(client.block_number().await.expect("block"), 7);
    }

    #[rstest]
    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        let endpoint = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("url");
        let client = JsonRpcClient::new(endpoint, Duration::from_secs(2)).expect("client");

        let error = client.accounts().await.expect_err("nothing listening");
        assert!(error.is_unreachable(), "{error:?}");
    }
}
