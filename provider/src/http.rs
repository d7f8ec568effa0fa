//! JSON-RPC-over-HTTP provider bridge.
//!
//! Lets a headless host drive a wallet fronted by an HTTP JSON-RPC endpoint
//! (a signing relay, or a plain node for read-only calls). Requests use the
//! standard EIP-1193 method names; provider failures arrive as JSON-RPC error
//! objects and are mapped by code in one place.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::broadcast;

use async_trait::async_trait;
use chainvote_types::{Address, ChainId, NativeAmount, NetworkDescriptor, TxHash};

use crate::error::ProviderError;
use crate::event::ProviderEvent;
use crate::port::{TransferCall, WalletProvider};

/// Capacity of the event channel handed to subscribers.
const EVENT_CAPACITY: usize = 16;

/// HTTP bridge to a wallet's JSON-RPC endpoint.
#[derive(Clone)]
pub struct HttpProvider {
    http: reqwest::Client,
    endpoint: String,
    events: broadcast::Sender<ProviderEvent>,
}

impl HttpProvider {
    /// Create a bridge targeting `endpoint` (e.g. `http://127.0.0.1:8545`).
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to create HTTP client: {e}")))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            events,
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "endpoint returned HTTP {}",
                response.status()
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error") {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unspecified provider error");
            tracing::debug!(method, code, message, "provider rejected the request");
            return Err(ProviderError::from_code(code, message));
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| ProviderError::InvalidPayload("response missing result".into()))
    }

    fn parse_accounts(result: Value) -> Result<Vec<Address>, ProviderError> {
        let arr = result
            .as_array()
            .ok_or_else(|| ProviderError::InvalidPayload("account list must be an array".into()))?;
        let mut accounts = Vec::with_capacity(arr.len());
        for item in arr {
            let raw = item.as_str().ok_or_else(|| {
                ProviderError::InvalidPayload("account entry must be a string".into())
            })?;
            accounts.push(Address::parse(raw)?);
        }
        Ok(accounts)
    }

    fn parse_string(result: Value, what: &str) -> Result<String, ProviderError> {
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::InvalidPayload(format!("{what} must be a string")))
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let result = self.rpc_call("eth_requestAccounts", json!([])).await?;
        Self::parse_accounts(result)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let result = self.rpc_call("eth_accounts", json!([])).await?;
        Self::parse_accounts(result)
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let result = self.rpc_call("eth_chainId", json!([])).await?;
        Ok(ChainId::parse(&Self::parse_string(result, "chain id")?)?)
    }

    async fn balance_of(&self, address: &Address) -> Result<NativeAmount, ProviderError> {
        let result = self
            .rpc_call("eth_getBalance", json!([address.as_str(), "latest"]))
            .await?;
        Ok(NativeAmount::from_hex_str(&Self::parse_string(
            result, "balance",
        )?)?)
    }

    async fn switch_chain(&self, chain: &ChainId) -> Result<(), ProviderError> {
        self.rpc_call(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain.as_str() }]),
        )
        .await?;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> Result<(), ProviderError> {
        self.rpc_call("wallet_addEthereumChain", json!([descriptor]))
            .await?;
        Ok(())
    }

    async fn send_transaction(&self, call: &TransferCall) -> Result<TxHash, ProviderError> {
        let params = json!([{
            "from": call.from.as_str(),
            "to": call.to.as_str(),
            "value": call.value.to_hex(),
            "gas": call.gas_hex(),
        }]);
        let result = self.rpc_call("eth_sendTransaction", params).await?;
        Ok(TxHash::new(Self::parse_string(result, "transaction hash")?))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        // Plain HTTP has no push channel, so these receivers never fire.
        self.events.subscribe()
    }
}
