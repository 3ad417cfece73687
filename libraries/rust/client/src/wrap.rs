use solana_sdk::{
    instruction::Instruction, program_error::ProgramError, pubkey::Pubkey, signature::Keypair,
    signer::Signer,
};

use strike_instructions::{fees, token, OptionMarket};
use strike_solana_client::transaction::{TransactionBuilder, WithSigner};

use crate::error::ActionError;

/// A temporary token account holding wrapped SOL for the duration of an action
pub struct WrappedNative {
    pub account: Pubkey,

    /// Creates and funds the account. Includes the new account's keypair.
    pub funding: TransactionBuilder,

    /// Closes the account, returning all lamports to the owner
    pub unwrap: Instruction,
}

impl WrappedNative {
    /// Lamports the owner needs to fund the account
    pub fn cost(rent: u64, lamports: u64) -> Result<u64, ActionError> {
        rent.checked_add(lamports)
            .ok_or(ActionError::Instruction(ProgramError::ArithmeticOverflow))
    }
}

/// Build the lifecycle of a new wrapped SOL account owned by `owner` and
/// holding `lamports` beyond its rent
pub fn wrap(owner: &Pubkey, lamports: u64, rent: u64) -> Result<WrappedNative, ActionError> {
    let keypair = Keypair::new();
    let account = keypair.pubkey();

    let funding = token::create_native_account(owner, owner, &account, rent, lamports)?
        .with_signer(keypair);
    let unwrap = token::close_native_account(&account, owner)?;

    log::debug!("wrapping {lamports} lamports in temporary account {account}");

    Ok(WrappedNative {
        account,
        funding,
        unwrap,
    })
}

/// Lamports to wrap so that `contracts` contracts can be minted, fees included
pub fn mint_lamports(market: &OptionMarket, contracts: u64) -> Result<u64, ActionError> {
    fees::mint_cost(market.underlying_amount_per_contract, contracts)
        .ok_or(ActionError::Instruction(ProgramError::ArithmeticOverflow))
}
