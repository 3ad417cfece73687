use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use strike_solana_client::network::NetworkKind;

pub use strike_solana_client::ConfirmationConfig;

/// Settings for a client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Most mint instructions repeated in one transaction
    pub max_mint_units_per_tx: u64,

    /// Most close position instructions repeated in one transaction
    pub max_close_units_per_tx: u64,

    /// Base url of the block explorer used for transaction links
    pub explorer_url: String,

    /// The rpc endpoint, used by the explorer to find a custom network
    pub rpc_url: Option<String>,

    /// Known tokens, used to describe amounts to the user
    pub assets: Vec<AssetInfo>,

    pub confirmation: ConfirmationConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_mint_units_per_tx: Self::DEFAULT_MAX_MINT_UNITS_PER_TX,
            max_close_units_per_tx: Self::DEFAULT_MAX_CLOSE_UNITS_PER_TX,
            explorer_url: Self::DEFAULT_EXPLORER_URL.to_owned(),
            rpc_url: None,
            assets: vec![],
            confirmation: ConfirmationConfig::default(),
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_MAX_MINT_UNITS_PER_TX: u64 = 10;
    pub const DEFAULT_MAX_CLOSE_UNITS_PER_TX: u64 = 25;
    pub const DEFAULT_EXPLORER_URL: &'static str = "https://explorer.solana.com";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn asset(&self, mint: &Pubkey) -> Option<&AssetInfo> {
        self.assets.iter().find(|asset| asset.mint == *mint)
    }

    /// Link to a transaction in the block explorer
    pub fn transaction_url(&self, signature: &Signature, network: NetworkKind) -> String {
        format!(
            "{}/tx/{signature}{}",
            self.explorer_url.trim_end_matches('/'),
            network.explorer_query(self.rpc_url.as_deref())
        )
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub symbol: String,
    pub decimals: u8,

    #[serde_as(as = "DisplayFromStr")]
    pub mint: Pubkey,
}

impl AssetInfo {
    /// Format an amount of base units as a decimal amount of this asset
    pub fn ui_amount(&self, amount: u64) -> String {
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return amount.to_string();
        }

        let digits = format!("{amount:0>width$}", width = decimals + 1);
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        let fraction = fraction.trim_end_matches('0');

        if fraction.is_empty() {
            whole.to_owned()
        } else {
            format!("{whole}.{fraction}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_json() {
        let mint = Pubkey::new_unique();
        let json = format!(
            r#"{{
                "maxMintUnitsPerTx": 4,
                "assets": [{{ "symbol": "USDC", "decimals": 6, "mint": "{mint}" }}],
                "confirmation": {{ "attempts": 5, "intervalMs": 200 }}
            }}"#
        );

        let config = ClientConfig::from_json(&json).unwrap();

        assert_eq!(4, config.max_mint_units_per_tx);
        assert_eq!(
            ClientConfig::DEFAULT_MAX_CLOSE_UNITS_PER_TX,
            config.max_close_units_per_tx
        );
        assert_eq!(ClientConfig::DEFAULT_EXPLORER_URL, config.explorer_url);
        assert_eq!("USDC", config.asset(&mint).unwrap().symbol);
        assert_eq!(5, config.confirmation.attempts);
        assert_eq!(200, config.confirmation.interval_ms);
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(ClientConfig::default(), ClientConfig::from_json("{}").unwrap());
    }

    #[test]
    fn transaction_links() {
        let signature = Signature::default();
        let mut config = ClientConfig::default();

        assert_eq!(
            format!("https://explorer.solana.com/tx/{signature}?cluster=devnet"),
            config.transaction_url(&signature, NetworkKind::Devnet)
        );

        config.rpc_url = Some("http://localhost:8899".to_owned());
        assert_eq!(
            format!("https://explorer.solana.com/tx/{signature}?cluster=custom&customUrl=http://localhost:8899"),
            config.transaction_url(&signature, NetworkKind::Localnet)
        );
    }

    #[test]
    fn ui_amounts() {
        let asset = |decimals| AssetInfo {
            symbol: "T".to_owned(),
            decimals,
            mint: Pubkey::new_unique(),
        };

        assert_eq!("25", asset(6).ui_amount(25_000_000));
        assert_eq!("0.0015", asset(6).ui_amount(1_500));
        assert_eq!("1.5", asset(9).ui_amount(1_500_000_000));
        assert_eq!("42", asset(0).ui_amount(42));
    }
}
