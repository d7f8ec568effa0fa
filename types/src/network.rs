//! Network descriptor for add-chain requests.

use serde::{Deserialize, Serialize};

use crate::chain::ChainId;

/// The native currency section of an add-chain request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything a wallet needs to register a chain it does not yet know.
///
/// Serialises in the camelCase shape injected providers expect as the
/// parameter of an add-chain request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDescriptor {
    /// The Monad testnet parameters (chain `0x27af`, MON with 18 decimals).
    pub fn monad_testnet() -> Self {
        Self {
            chain_id: ChainId::monad_testnet(),
            chain_name: "Monad Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Monad".to_string(),
                symbol: "MON".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://testnet-rpc.monad.xyz".to_string()],
            block_explorer_urls: vec!["https://testnet.monadexplorer.com".to_string()],
        }
    }

    /// First block-explorer base URL, if the descriptor carries one.
    pub fn explorer_url(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(String::as_str)
    }
}
