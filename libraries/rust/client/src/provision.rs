use solana_sdk::{instruction::Instruction, program_error::ProgramError, pubkey::Pubkey};

use strike_instructions::{
    token::{self, NATIVE_MINT},
    ClosePositionAccounts, MintAccounts,
};

use crate::{
    action::{ActionKind, ActionRequest, AssetHoldings, DestinationOverrides, TokenAccount},
    error::ActionError,
    wrap::{self, WrappedNative},
};

/// The accounts an action instruction will use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionAccounts {
    Mint(MintAccounts),
    Close(ClosePositionAccounts),
}

/// Everything that must exist before the action can run
pub struct Provisioned {
    /// Creates missing wallet accounts
    pub setup: Vec<Instruction>,

    /// Temporary wrapped SOL account, when the underlying is native
    pub wrapped: Option<WrappedNative>,

    pub accounts: ActionAccounts,
}

/// Determine the accounts needed by the request, creating whatever is missing.
///
/// Fails without producing any instructions when the user's holdings cannot
/// support the request.
pub fn provision(
    request: &ActionRequest,
    holdings: &AssetHoldings,
    overrides: &DestinationOverrides,
) -> Result<Provisioned, ActionError> {
    request.validate()?;
    request.market.validate()?;

    match request.kind {
        ActionKind::Mint => provision_mint(request, holdings, overrides),
        ActionKind::Close => provision_close(request, holdings, overrides),
    }
}

fn provision_mint(
    request: &ActionRequest,
    holdings: &AssetHoldings,
    overrides: &DestinationOverrides,
) -> Result<Provisioned, ActionError> {
    let market = &request.market;
    let underlying_mint = market.underlying_asset_mint;
    let underlying = holding_for(&holdings.underlying, &underlying_mint);

    let (underlying_source, wrapped) = if token::is_native(&underlying_mint) {
        let lamports = wrap::mint_lamports(market, request.quantity)?;
        let cost = WrappedNative::cost(holdings.token_account_rent, lamports)?;
        check_balance(&NATIVE_MINT, cost, holdings.native_lamports)?;

        let wrapped = wrap::wrap(&request.owner, lamports, holdings.token_account_rent)?;
        (wrapped.account, Some(wrapped))
    } else {
        let source = underlying.ok_or(ActionError::MissingAccount {
            mint: underlying_mint,
        })?;
        let required = market
            .underlying_amount(request.quantity)
            .ok_or(ActionError::Instruction(ProgramError::ArithmeticOverflow))?;
        check_balance(&underlying_mint, required, source.amount)?;

        (source.address, None)
    };

    let mut setup = vec![];
    let option_destination = destination(
        request,
        overrides.option_destination,
        &holdings.option_tokens,
        &market.option_mint,
        &mut setup,
    );
    let writer_destination = destination(
        request,
        overrides.writer_destination,
        &holdings.writer_tokens,
        &market.writer_token_mint,
        &mut setup,
    );

    Ok(Provisioned {
        setup,
        wrapped,
        accounts: ActionAccounts::Mint(MintAccounts {
            underlying_source,
            option_destination,
            writer_destination,
        }),
    })
}

fn provision_close(
    request: &ActionRequest,
    holdings: &AssetHoldings,
    overrides: &DestinationOverrides,
) -> Result<Provisioned, ActionError> {
    let market = &request.market;
    let option_source = source(&holdings.option_tokens, &market.option_mint, request.quantity)?;
    let writer_source = source(
        &holdings.writer_tokens,
        &market.writer_token_mint,
        request.quantity,
    )?;

    let mut setup = vec![];
    let (underlying_destination, wrapped) = if token::is_native(&market.underlying_asset_mint) {
        check_balance(
            &NATIVE_MINT,
            holdings.token_account_rent,
            holdings.native_lamports,
        )?;

        let wrapped = wrap::wrap(&request.owner, 0, holdings.token_account_rent)?;
        (wrapped.account, Some(wrapped))
    } else {
        let address = destination(
            request,
            overrides.underlying_destination,
            &holdings.underlying,
            &market.underlying_asset_mint,
            &mut setup,
        );
        (address, None)
    };

    Ok(Provisioned {
        setup,
        wrapped,
        accounts: ActionAccounts::Close(ClosePositionAccounts {
            option_source,
            writer_source,
            underlying_destination,
        }),
    })
}

/// A holding only counts if it is for the expected mint
fn holding_for<'a>(holding: &'a Option<TokenAccount>, mint: &Pubkey) -> Option<&'a TokenAccount> {
    holding.as_ref().filter(|account| account.mint == *mint)
}

fn check_balance(mint: &Pubkey, required: u64, available: u64) -> Result<(), ActionError> {
    if available < required {
        return Err(ActionError::MissingFunds {
            mint: *mint,
            required,
            available,
        });
    }

    Ok(())
}

fn source(
    holding: &Option<TokenAccount>,
    mint: &Pubkey,
    quantity: u64,
) -> Result<Pubkey, ActionError> {
    let account = holding_for(holding, mint).ok_or(ActionError::MissingAccount { mint: *mint })?;
    check_balance(mint, quantity, account.amount)?;

    Ok(account.address)
}

fn destination(
    request: &ActionRequest,
    chosen: Option<Pubkey>,
    holding: &Option<TokenAccount>,
    mint: &Pubkey,
    setup: &mut Vec<Instruction>,
) -> Pubkey {
    if let Some(address) = chosen {
        return address;
    }
    if let Some(account) = holding_for(holding, mint) {
        return account.address;
    }

    let (ix, address) = token::create_wallet_account(&request.owner, &request.owner, mint);
    log::debug!("creating wallet account {address} for mint {mint}");
    setup.push(ix);

    address
}
