use solana_sdk::{
    instruction::Instruction, program_error::ProgramError, program_pack::Pack, pubkey::Pubkey,
    system_instruction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};

pub use spl_token::native_mint::ID as NATIVE_MINT;

/// Space used by an spl token account
pub const TOKEN_ACCOUNT_LEN: usize = spl_token::state::Account::LEN;

/// Whether the mint is the wrapped form of the network's native currency
pub fn is_native(mint: &Pubkey) -> bool {
    *mint == NATIVE_MINT
}

/// The associated token account of `owner` for `mint`
pub fn wallet_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Get instruction to create the associated token account of `owner` for
/// `mint`, along with its address
pub fn create_wallet_account(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> (Instruction, Pubkey) {
    let address = wallet_account(owner, mint);
    let ix = create_associated_token_account(payer, owner, mint, &spl_token::ID);

    (ix, address)
}

/// Get instructions to create a token account for the native mint at
/// `account`, funded with `rent + lamports`.
///
/// The new account must sign the resulting transaction.
pub fn create_native_account(
    payer: &Pubkey,
    owner: &Pubkey,
    account: &Pubkey,
    rent: u64,
    lamports: u64,
) -> Result<Vec<Instruction>, ProgramError> {
    let total = rent
        .checked_add(lamports)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    Ok(vec![
        system_instruction::create_account(
            payer,
            account,
            total,
            TOKEN_ACCOUNT_LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_account(&spl_token::ID, account, &NATIVE_MINT, owner)?,
    ])
}

/// Get instruction to close a native token account, sending all of its
/// lamports back to the owner
pub fn close_native_account(account: &Pubkey, owner: &Pubkey) -> Result<Instruction, ProgramError> {
    spl_token::instruction::close_account(&spl_token::ID, account, owner, owner, &[])
}

#[cfg(test)]
mod tests {
    use solana_sdk::system_program;

    use super::*;

    #[test]
    fn native_account_is_created_then_initialized() {
        let owner = Pubkey::new_unique();
        let account = Pubkey::new_unique();

        let ixns = create_native_account(&owner, &owner, &account, 2_039_280, 500).unwrap();

        assert_eq!(2, ixns.len());
        assert_eq!(system_program::ID, ixns[0].program_id);
        assert_eq!(spl_token::ID, ixns[1].program_id);
        assert!(ixns[0]
            .accounts
            .iter()
            .any(|meta| meta.pubkey == account && meta.is_signer));
    }

    #[test]
    fn native_account_funding_overflow() {
        let owner = Pubkey::new_unique();

        assert_eq!(
            Err(ProgramError::ArithmeticOverflow),
            create_native_account(&owner, &owner, &Pubkey::new_unique(), u64::MAX, 1)
        );
    }

    #[test]
    fn wallet_account_matches_created_address() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (ix, address) = create_wallet_account(&owner, &owner, &mint);

        assert_eq!(wallet_account(&owner, &mint), address);
        assert_eq!(spl_associated_token_account::ID, ix.program_id);
    }
}
