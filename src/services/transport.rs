// ============================================================================
// RPC TRANSPORT - Canal JSON-RPC hacia la red (wallet o endpoint público)
// ============================================================================

use std::cell::Cell;
use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;
use crate::error::RpcError;
use crate::models::rpc::{JsonRpcRequest, JsonRpcResponse};

/// Cualquier cosa capaz de responder peticiones JSON-RPC de Ethereum
#[async_trait(?Send)]
pub trait RpcTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    /// Etiqueta para logs
    fn describe(&self) -> String;
}

/// Cliente HTTP contra el RPC público de la red por defecto
/// (lecturas sin wallet conectada)
pub struct HttpRpcClient {
    url: String,
    next_id: Cell<u64>,
}

impl HttpRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            next_id: Cell::new(1),
        }
    }
}

#[async_trait(?Send)]
impl RpcTransport for HttpRpcClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let body = JsonRpcRequest::new(id, method, params);
        log::debug!("🌐 [RPC] {} -> {}", method, self.url);

        let response = Request::post(&self.url)
            .json(&body)
            .map_err(|e| RpcError::transport(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| RpcError::transport(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(RpcError::transport(format!(
                "HTTP {}: {}",
                response.status(),
                response.status_text()
            )));
        }

        response
            .json::<JsonRpcResponse>()
            .await
            .map_err(|e| RpcError::transport(format!("Parse error: {}", e)))?
            .into_result()
    }

    fn describe(&self) -> String {
        format!("http:{}", self.url)
    }
}
