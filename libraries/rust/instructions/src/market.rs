use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

use solana_sdk::pubkey::Pubkey;

/// The deployed versions of the options program, which differ in their
/// instruction encoding and account layout.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProgramVersion {
    /// The original native program, with hand-packed instructions
    V1,

    /// The anchor-based program
    V2,
}

/// Description of an options market, as provided by the market data service.
///
/// Amounts are in base units of the respective mints.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptionMarket {
    /// The address of the market account
    #[serde_as(as = "DisplayFromStr")]
    pub address: Pubkey,

    /// The options program that owns the market
    #[serde_as(as = "DisplayFromStr")]
    pub program_id: Pubkey,

    pub program_version: ProgramVersion,

    #[serde_as(as = "DisplayFromStr")]
    pub underlying_asset_mint: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub quote_asset_mint: Pubkey,

    /// Underlying tokens locked by each contract
    pub underlying_amount_per_contract: u64,

    /// Quote tokens paid to exercise each contract
    pub quote_amount_per_contract: u64,

    #[serde_as(as = "DisplayFromStr")]
    pub option_mint: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub writer_token_mint: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub underlying_asset_pool: Pubkey,

    #[serde_as(as = "DisplayFromStr")]
    pub quote_asset_pool: Pubkey,

    /// Receives the protocol fee charged when minting
    #[serde_as(as = "DisplayFromStr")]
    pub mint_fee_account: Pubkey,

    /// Unix timestamp after which contracts can no longer be exercised
    pub expiration: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("market {0} has no underlying amount per contract")]
    EmptyContract(Pubkey),

    #[error("market {0} uses the same mint for option and writer tokens")]
    SharedTokenMint(Pubkey),
}

impl OptionMarket {
    /// Check the descriptor is usable for building instructions
    pub fn validate(&self) -> Result<(), MarketError> {
        if self.underlying_amount_per_contract == 0 {
            return Err(MarketError::EmptyContract(self.address));
        }
        if self.option_mint == self.writer_token_mint {
            return Err(MarketError::SharedTokenMint(self.address));
        }

        Ok(())
    }

    /// Underlying tokens required to back `contracts` contracts
    pub fn underlying_amount(&self, contracts: u64) -> Option<u64> {
        self.underlying_amount_per_contract.checked_mul(contracts)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn test_market(version: ProgramVersion, underlying: Pubkey) -> OptionMarket {
        OptionMarket {
            address: Pubkey::new_unique(),
            program_id: Pubkey::new_unique(),
            program_version: version,
            underlying_asset_mint: underlying,
            quote_asset_mint: Pubkey::new_unique(),
            underlying_amount_per_contract: 1_000_000,
            quote_amount_per_contract: 50_000_000,
            option_mint: Pubkey::new_unique(),
            writer_token_mint: Pubkey::new_unique(),
            underlying_asset_pool: Pubkey::new_unique(),
            quote_asset_pool: Pubkey::new_unique(),
            mint_fee_account: Pubkey::new_unique(),
            expiration: 1_700_000_000,
        }
    }

    #[test]
    fn market_from_json() {
        let market = test_market(ProgramVersion::V2, spl_token::native_mint::ID);
        let json = serde_json::to_string(&market).unwrap();

        assert!(json.contains("\"programVersion\":\"v2\""));
        assert!(json.contains(&format!("\"optionMint\":\"{}\"", market.option_mint)));
        assert_eq!(market, serde_json::from_str(&json).unwrap());
    }

    #[test]
    fn validation() {
        let mut market = test_market(ProgramVersion::V1, Pubkey::new_unique());
        assert_eq!(Ok(()), market.validate());

        market.writer_token_mint = market.option_mint;
        assert_eq!(
            Err(MarketError::SharedTokenMint(market.address)),
            market.validate()
        );

        market.underlying_amount_per_contract = 0;
        assert_eq!(
            Err(MarketError::EmptyContract(market.address)),
            market.validate()
        );
    }

    #[test]
    fn underlying_amount_overflow() {
        let market = test_market(ProgramVersion::V2, Pubkey::new_unique());

        assert_eq!(Some(25_000_000), market.underlying_amount(25));
        assert_eq!(None, market.underlying_amount(u64::MAX));
    }
}
