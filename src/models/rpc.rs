use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::RpcError;

/// Request JSON-RPC 2.0 (endpoint HTTP público)
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self { jsonrpc: "2.0", id, method, params }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorBody>,
}

impl JsonRpcResponse {
    pub fn into_result(self) -> Result<Value, RpcError> {
        if let Some(err) = self.error {
            return Err(RpcError::new(err.code, err.message));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Parámetro de `eth_call`
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    pub to: String,
    pub data: String,
}

/// Parámetro de `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    pub data: String,
    /// Wei en hex (`0x...`)
    pub value: String,
}

/// Subconjunto del receipt que nos interesa
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    /// "0x1" éxito, "0x0" revertida (pre-Byzantium puede faltar)
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0"))
    }
}
