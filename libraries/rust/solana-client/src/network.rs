use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::hash::Hash;

use crate::NetworkInterface;

const MAINNET_HASH: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";
const DEVNET_HASH: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG";

/// Description for the Solana network a client may connect to
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// The public mainnet-beta network
    #[default]
    Mainnet,

    /// The public network for development testing
    Devnet,

    /// A non-public network for testing
    Localnet,
}

impl NetworkKind {
    /// Determine the network type based on its genesis hash
    pub fn from_genesis_hash(network_genesis_hash: &Hash) -> Self {
        if is_hash(MAINNET_HASH, network_genesis_hash) {
            NetworkKind::Mainnet
        } else if is_hash(DEVNET_HASH, network_genesis_hash) {
            NetworkKind::Devnet
        } else {
            NetworkKind::Localnet
        }
    }

    /// Determine the network type for a given interface
    pub async fn from_interface<I: NetworkInterface>(network: &I) -> Result<Self, I::Error> {
        let network_hash = network.get_genesis_hash().await?;
        Ok(Self::from_genesis_hash(&network_hash))
    }

    /// The query string an explorer needs to display data from this network
    pub fn explorer_query(&self, rpc_url: Option<&str>) -> String {
        match (self, rpc_url) {
            (NetworkKind::Mainnet, _) => String::new(),
            (NetworkKind::Devnet, _) => "?cluster=devnet".to_owned(),
            (NetworkKind::Localnet, Some(url)) => format!("?cluster=custom&customUrl={url}"),
            (NetworkKind::Localnet, None) => "?cluster=custom".to_owned(),
        }
    }
}

fn is_hash(encoded: &str, hash: &Hash) -> bool {
    Hash::from_str(encoded).map_or(false, |known| known == *hash)
}
