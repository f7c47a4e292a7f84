//! In-process JSON-RPC ledger node for adapter tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, web};
use reqwest::Url;
use serde_json::{Value, json};

use super::rpc::JsonRpcClient;

/// How the stub node answers.
#[derive(Debug, Clone)]
pub(crate) struct StubNodeBehaviour {
    pub(crate) accounts: Vec<String>,
    /// Receipt polls answered with `null` before the receipt is returned.
    pub(crate) pending_polls: u32,
    pub(crate) receipt_status: &'static str,
    /// Methods answered with a JSON-RPC error object.
    pub(crate) failing_method: Option<&'static str>,
}

impl Default for StubNodeBehaviour {
    fn default() -> Self {
        Self {
            accounts: vec![StubNode::ADMIN.to_owned()],
            pending_polls: 0,
            receipt_status: "0x1",
            failing_method: None,
        }
    }
}

#[derive(Debug)]
struct NodeState {
    behaviour: StubNodeBehaviour,
    polls: AtomicU32,
    calls: Mutex<Vec<(String, Value)>>,
}

/// Running stub node; dropped servers stop with the test runtime.
pub(crate) struct StubNode {
    endpoint: Url,
    state: Arc<NodeState>,
}

impl StubNode {
    pub(crate) const ADMIN: &'static str = "0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1";
    pub(crate) const TRANSACTION: &'static str =
        "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";
    pub(crate) const CONTRACT: &'static str = "0xe78a0f7e598cc8b0bb87894b0f60dd2a88d6a8ab";

    /// Bind on an ephemeral port and serve on the current actix runtime.
    pub(crate) async fn start(behaviour: StubNodeBehaviour) -> Self {
        let state = Arc::new(NodeState {
            behaviour,
            polls: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
        });
        let data = web::Data::from(Arc::clone(&state));
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/", web::post().to(handle))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub node");
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());
        let endpoint = Url::parse(&format!("http://{addr}/")).expect("stub url");
        Self { endpoint, state }
    }

    pub(crate) fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    pub(crate) fn client(&self) -> JsonRpcClient {
        JsonRpcClient::new(self.endpoint(), Duration::from_secs(5)).expect("rpc client")
    }

    /// Number of calls received for `method`.
    pub(crate) fn calls_to(&self, method: &str) -> usize {
        self.state
            .calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(name, _)| name == method)
            .count()
    }

    /// Params of every call received for `method`.
    pub(crate) fn params_of(&self, method: &str) -> Vec<Value> {
        self.state
            .calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(name, _)| name == method)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

async fn handle(state: web::Data<NodeState>, body: web::Json<Value>) -> HttpResponse {
    let id = body.get("id").cloned().unwrap_or(Value::Null);
    let method = body
        .get("method")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let params = body.get("params").cloned().unwrap_or(Value::Null);
    state
        .calls
        .lock()
        .expect("calls lock")
        .push((method.clone(), params));

    let behaviour = &state.behaviour;
    if behaviour.failing_method == Some(method.as_str()) {
        return HttpResponse::Ok().json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32000, "message": format!("{method} rejected")}
        }));
    }
    let result = match method.as_str() {
        "eth_accounts" => json!(behaviour.accounts),
        "eth_blockNumber" => json!("0x7"),
        "eth_sendTransaction" => json!(StubNode::TRANSACTION),
        "eth_getTransactionReceipt" => {
            let seen = state.polls.fetch_add(1, Ordering::SeqCst);
            if seen < behaviour.pending_polls {
                Value::Null
            } else {
                json!({
                    "transactionHash": StubNode::TRANSACTION,
                    "status": behaviour.receipt_status,
                    "contractAddress": StubNode::CONTRACT,
                    "blockNumber": "0x8"
                })
            }
        }
        _ => {
            return HttpResponse::Ok().json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": "method not found"}
            }));
        }
    };
    HttpResponse::Ok().json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}
