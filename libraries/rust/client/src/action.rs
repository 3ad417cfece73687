use std::fmt;

use solana_sdk::pubkey::Pubkey;

use strike_instructions::OptionMarket;

use crate::error::ActionError;

/// The operations a user can perform on a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Lock underlying to create option and writer tokens
    Mint,

    /// Burn option and writer tokens to unlock underlying
    Close,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Mint => write!(f, "Mint"),
            ActionKind::Close => write!(f, "Close Position"),
        }
    }
}

/// A request to perform `kind` on `quantity` contracts of a market
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub quantity: u64,
    pub market: OptionMarket,

    /// The wallet that owns the token accounts and pays for the transactions
    pub owner: Pubkey,
}

impl ActionRequest {
    pub fn mint(market: OptionMarket, owner: Pubkey, quantity: u64) -> Self {
        Self {
            kind: ActionKind::Mint,
            quantity,
            market,
            owner,
        }
    }

    pub fn close(market: OptionMarket, owner: Pubkey, quantity: u64) -> Self {
        Self {
            kind: ActionKind::Close,
            quantity,
            market,
            owner,
        }
    }

    pub fn validate(&self) -> Result<(), ActionError> {
        if self.quantity == 0 {
            return Err(ActionError::InvalidQuantity);
        }

        Ok(())
    }
}

/// A token account held by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccount {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

/// The user's current holdings relevant to a single market
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetHoldings {
    /// Account holding the market's underlying asset
    pub underlying: Option<TokenAccount>,

    /// Account holding the market's option tokens
    pub option_tokens: Option<TokenAccount>,

    /// Account holding the market's writer tokens
    pub writer_tokens: Option<TokenAccount>,

    /// Lamports held directly by the wallet
    pub native_lamports: u64,

    /// Rent exempt minimum for a token account
    pub token_account_rent: u64,
}

/// Accounts chosen by the caller instead of the default wallet accounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestinationOverrides {
    pub option_destination: Option<Pubkey>,
    pub writer_destination: Option<Pubkey>,
    pub underlying_destination: Option<Pubkey>,
}
