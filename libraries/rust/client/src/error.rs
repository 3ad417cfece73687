use thiserror::Error;

use solana_sdk::{program_error::ProgramError, pubkey::Pubkey};

use strike_instructions::MarketError;

/// Reasons an action could not be planned or executed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("quantity must be at least one contract")]
    InvalidQuantity,

    #[error("invalid market: {0}")]
    InvalidMarket(#[from] MarketError),

    #[error("no token account found for mint {mint}")]
    MissingAccount { mint: Pubkey },

    #[error("insufficient balance of {mint}: {required} required, {available} available")]
    MissingFunds {
        mint: Pubkey,
        required: u64,
        available: u64,
    },

    #[error("batch {batch_index} needs {size} bytes even with a single contract")]
    Oversized { batch_index: usize, size: usize },

    #[error("unable to encode transaction: {0}")]
    Encoding(String),

    #[error("wallet declined to sign: {0}")]
    SigningRejected(String),

    #[error("batch {batch_index} failed: {reason}")]
    SubmissionFailed { batch_index: usize, reason: String },

    #[error("invalid instruction input: {0}")]
    Instruction(#[from] ProgramError),
}
