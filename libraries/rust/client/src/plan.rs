use std::iter;

use solana_sdk::pubkey::Pubkey;

use strike_instructions::OptionsIxBuilder;
use strike_solana_client::{
    cat,
    transaction::{TransactionBuilder, MAX_TX_SIZE},
};

use crate::{
    action::{ActionKind, ActionRequest, AssetHoldings, DestinationOverrides},
    config::ClientConfig,
    error::ActionError,
    provision::{provision, ActionAccounts, Provisioned},
};

/// The work for a single transaction
#[derive(Debug, Clone)]
pub struct Batch {
    /// Position of this batch within the plan
    pub index: usize,

    /// Number of contracts this batch acts on
    pub units: u64,

    /// Instructions in execution order, and the generated keys that sign them
    pub builder: TransactionBuilder,
}

/// Splits an action into transactions that each repeat the action
/// instruction at most the capacity for that kind of action. A batch that
/// would still exceed the transaction size limit carries fewer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    mint_capacity: u64,
    close_capacity: u64,
}

impl BatchPlanner {
    pub fn new(mint_capacity: u64, close_capacity: u64) -> Self {
        Self {
            mint_capacity: usable_capacity(ActionKind::Mint, mint_capacity),
            close_capacity: usable_capacity(ActionKind::Close, close_capacity),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_mint_units_per_tx, config.max_close_units_per_tx)
    }

    pub fn capacity(&self, kind: ActionKind) -> u64 {
        match kind {
            ActionKind::Mint => self.mint_capacity,
            ActionKind::Close => self.close_capacity,
        }
    }

    /// Build every batch needed to complete the request.
    ///
    /// The first batch creates any missing accounts and funds the wrapped SOL
    /// account, and the last batch closes it.
    pub fn plan(
        &self,
        request: &ActionRequest,
        holdings: &AssetHoldings,
        overrides: &DestinationOverrides,
    ) -> Result<Vec<Batch>, ActionError> {
        request.validate()?;

        let Provisioned {
            setup,
            wrapped,
            accounts,
        } = provision(request, holdings, overrides)?;

        let options = OptionsIxBuilder::new(request.market.clone(), request.owner);
        let action = match &accounts {
            ActionAccounts::Mint(accounts) => options.mint_option(accounts, 1),
            ActionAccounts::Close(accounts) => options.close_position(accounts, 1),
        };

        let (funding, unwrap) = match wrapped {
            Some(wrapped) => (wrapped.funding, Some(wrapped.unwrap)),
            None => (TransactionBuilder::default(), None),
        };
        let prelude = cat![TransactionBuilder::from(setup), funding];
        let capacity = self.capacity(request.kind);

        let mut batches = vec![];
        let mut remaining = request.quantity;

        while remaining > 0 {
            let index = batches.len();
            let compose = |units: u64| {
                let mut builder = if index == 0 {
                    prelude.clone()
                } else {
                    TransactionBuilder::default()
                };
                builder
                    .instructions
                    .extend(iter::repeat(action.clone()).take(units as usize));
                if units == remaining {
                    builder.instructions.extend(unwrap.clone());
                }
                builder
            };

            let units = units_that_fit(index, &request.owner, remaining.min(capacity), &compose)?;
            batches.push(Batch {
                index,
                units,
                builder: compose(units),
            });
            remaining -= units;
        }

        log::debug!(
            "planned {} of {} contracts in {} batches: {:?}",
            request.kind,
            request.quantity,
            batches.len(),
            batches.iter().map(|b| b.units).collect::<Vec<_>>()
        );

        Ok(batches)
    }
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

fn usable_capacity(kind: ActionKind, capacity: u64) -> u64 {
    if capacity == 0 {
        log::warn!("{kind} batch capacity of 0 is not usable, using 1");
    }

    capacity.max(1)
}

/// The most units, up to `max_units`, whose batch from `compose` fits in a
/// single transaction paid for by `payer`
fn units_that_fit(
    batch_index: usize,
    payer: &Pubkey,
    max_units: u64,
    compose: &impl Fn(u64) -> TransactionBuilder,
) -> Result<u64, ActionError> {
    let size = |units: u64| {
        compose(units)
            .serialized_size(payer)
            .map_err(|e| ActionError::Encoding(e.to_string()))
    };

    if size(max_units)? <= MAX_TX_SIZE {
        return Ok(max_units);
    }

    let single = size(1)?;
    if single > MAX_TX_SIZE {
        return Err(ActionError::Oversized {
            batch_index,
            size: single,
        });
    }

    // size grows with every unit, so search between a count known to fit and
    // one known not to
    let (mut fits, mut oversized) = (1, max_units);
    while oversized - fits > 1 {
        let middle = fits + (oversized - fits) / 2;
        if size(middle)? <= MAX_TX_SIZE {
            fits = middle;
        } else {
            oversized = middle;
        }
    }

    log::warn!(
        "batch {batch_index} reduced from {max_units} to {fits} units to fit in a transaction"
    );

    Ok(fits)
}

#[cfg(test)]
mod tests {
    use solana_sdk::{
        instruction::{AccountMeta, Instruction},
        signer::Signer,
    };

    use strike_instructions::{token::NATIVE_MINT, MarketError, OptionMarket, ProgramVersion};

    use super::*;
    use crate::{
        test_util::{holding, market, RENT},
        wrap,
    };

    fn count_program(ixns: &[Instruction], program: &Pubkey) -> usize {
        ixns.iter().filter(|ix| ix.program_id == *program).count()
    }

    fn closeable(market: &OptionMarket, quantity: u64) -> AssetHoldings {
        AssetHoldings {
            underlying: Some(holding(market.underlying_asset_mint, 0)),
            option_tokens: Some(holding(market.option_mint, quantity)),
            writer_tokens: Some(holding(market.writer_token_mint, quantity)),
            token_account_rent: RENT,
            ..Default::default()
        }
    }

    fn padded_ix(payload: usize) -> Instruction {
        Instruction {
            program_id: Pubkey::new_unique(),
            accounts: vec![AccountMeta::new(Pubkey::new_unique(), false)],
            data: vec![7; payload],
        }
    }

    #[test]
    fn units_split_by_capacity() {
        for capacity in 1..=8 {
            for quantity in 1..=30 {
                let market = market(Pubkey::new_unique());
                let request = ActionRequest::close(market.clone(), Pubkey::new_unique(), quantity);
                let units = BatchPlanner::new(capacity, capacity)
                    .plan(&request, &closeable(&market, quantity), &DestinationOverrides::default())
                    .unwrap()
                    .iter()
                    .map(|b| b.units)
                    .collect::<Vec<_>>();

                assert_eq!(((quantity + capacity - 1) / capacity) as usize, units.len());
                assert_eq!(quantity, units.iter().sum::<u64>());
                assert!(units.iter().all(|u| *u <= capacity));
                assert!(units.iter().filter(|u| **u < capacity).count() <= 1);
            }
        }
    }

    #[test]
    fn capacities_per_action() {
        let planner = BatchPlanner::default();
        assert_eq!(
            ClientConfig::DEFAULT_MAX_MINT_UNITS_PER_TX,
            planner.capacity(ActionKind::Mint)
        );
        assert_eq!(
            ClientConfig::DEFAULT_MAX_CLOSE_UNITS_PER_TX,
            planner.capacity(ActionKind::Close)
        );

        let planner = BatchPlanner::new(0, 7);
        assert_eq!(1, planner.capacity(ActionKind::Mint));
        assert_eq!(7, planner.capacity(ActionKind::Close));
    }

    /// Every combination of program version, action, native underlying and
    /// account creation stays within the transaction size limit
    #[test]
    fn default_batches_fit_in_transactions() {
        let planner = BatchPlanner::default();
        let quantity = 60;

        for version in [ProgramVersion::V1, ProgramVersion::V2] {
            for kind in [ActionKind::Mint, ActionKind::Close] {
                for native in [false, true] {
                    for creates_accounts in [false, true] {
                        let owner = Pubkey::new_unique();
                        let mut market = market(if native {
                            NATIVE_MINT
                        } else {
                            Pubkey::new_unique()
                        });
                        market.program_version = version;

                        let has_destinations = !(kind == ActionKind::Mint && creates_accounts);
                        let has_underlying =
                            !native && !(kind == ActionKind::Close && creates_accounts);
                        let holdings = AssetHoldings {
                            underlying: has_underlying
                                .then(|| holding(market.underlying_asset_mint, u64::MAX / 2)),
                            option_tokens: has_destinations
                                .then(|| holding(market.option_mint, quantity)),
                            writer_tokens: has_destinations
                                .then(|| holding(market.writer_token_mint, quantity)),
                            native_lamports: u64::MAX / 2,
                            token_account_rent: RENT,
                        };
                        let request = match kind {
                            ActionKind::Mint => ActionRequest::mint(market, owner, quantity),
                            ActionKind::Close => ActionRequest::close(market, owner, quantity),
                        };

                        let batches = planner
                            .plan(&request, &holdings, &DestinationOverrides::default())
                            .unwrap();

                        let case =
                            format!("{version:?} {kind} native={native} creates={creates_accounts}");
                        assert_eq!(
                            quantity,
                            batches.iter().map(|b| b.units).sum::<u64>(),
                            "{case}"
                        );
                        for batch in &batches {
                            assert!(batch.units <= planner.capacity(kind), "{case}");
                            assert!(batch.builder.fits_in_transaction(&owner).unwrap(), "{case}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn oversized_capacity_is_reduced_to_fit() {
        let market = market(Pubkey::new_unique());
        let owner = Pubkey::new_unique();
        let request = ActionRequest::close(market.clone(), owner, 60);

        let batches = BatchPlanner::new(1, 200)
            .plan(&request, &closeable(&market, 60), &DestinationOverrides::default())
            .unwrap();

        assert!(batches.len() > 1);
        assert!(batches[0].units < 60);
        assert_eq!(60, batches.iter().map(|b| b.units).sum::<u64>());
        for batch in &batches {
            assert!(batch.builder.fits_in_transaction(&owner).unwrap());
        }
    }

    #[test]
    fn largest_fitting_unit_count() {
        let payer = Pubkey::new_unique();
        let ix = padded_ix(100);
        let compose = |units: u64| {
            TransactionBuilder::from(
                iter::repeat(ix.clone())
                    .take(units as usize)
                    .collect::<Vec<_>>(),
            )
        };

        assert_eq!(Ok(3), units_that_fit(0, &payer, 3, &compose));

        let units = units_that_fit(0, &payer, 30, &compose).unwrap();
        assert!(units < 30);
        assert!(compose(units).fits_in_transaction(&payer).unwrap());
        assert!(!compose(units + 1).fits_in_transaction(&payer).unwrap());
    }

    #[test]
    fn single_unit_too_large_is_an_error() {
        let payer = Pubkey::new_unique();
        let ix = padded_ix(MAX_TX_SIZE);
        let compose = |units: u64| {
            TransactionBuilder::from(
                iter::repeat(ix.clone())
                    .take(units as usize)
                    .collect::<Vec<_>>(),
            )
        };

        match units_that_fit(2, &payer, 5, &compose) {
            Err(ActionError::Oversized { batch_index, size }) => {
                assert_eq!(2, batch_index);
                assert!(size > MAX_TX_SIZE);
            }
            other => panic!("expected an oversized batch, got {other:?}"),
        }
    }

    #[test]
    fn zero_quantity_builds_nothing() {
        let market = market(Pubkey::new_unique());
        let request = ActionRequest::mint(market, Pubkey::new_unique(), 0);

        assert_eq!(
            Some(ActionError::InvalidQuantity),
            BatchPlanner::default()
                .plan(&request, &AssetHoldings::default(), &DestinationOverrides::default())
                .err()
        );
    }

    #[test]
    fn setup_only_in_first_batch() {
        let market = market(Pubkey::new_unique());
        let holdings = AssetHoldings {
            underlying: Some(holding(market.underlying_asset_mint, 30_000_000)),
            ..Default::default()
        };
        let request = ActionRequest::mint(market.clone(), Pubkey::new_unique(), 30);

        let batches = BatchPlanner::new(25, 25)
            .plan(&request, &holdings, &DestinationOverrides::default())
            .unwrap();

        assert_eq!(30, batches.iter().map(|b| b.units).sum::<u64>());
        assert_eq!(
            2,
            count_program(&batches[0].builder.instructions, &spl_associated_token_account::ID)
        );
        for batch in &batches {
            assert_eq!(
                batch.units as usize,
                count_program(&batch.builder.instructions, &market.program_id)
            );
            if batch.index > 0 {
                assert_eq!(
                    0,
                    count_program(&batch.builder.instructions, &spl_associated_token_account::ID)
                );
            }
        }
    }

    #[test]
    fn wrapped_account_funded_first_and_closed_last() {
        let market = market(NATIVE_MINT);
        let lamports = wrap::mint_lamports(&market, 7).unwrap();
        let holdings = AssetHoldings {
            native_lamports: RENT + lamports,
            token_account_rent: RENT,
            ..Default::default()
        };
        let request = ActionRequest::mint(market.clone(), Pubkey::new_unique(), 7);

        let batches = BatchPlanner::new(3, 3)
            .plan(&request, &holdings, &DestinationOverrides::default())
            .unwrap();

        assert_eq!(vec![3, 3, 1], batches.iter().map(|b| b.units).collect::<Vec<_>>());

        let first = &batches[0].builder;
        let wrapped = first.signers[0].pubkey();
        let funding = first
            .instructions
            .iter()
            .position(|ix| ix.program_id == solana_sdk::system_program::ID)
            .unwrap();
        let action = first
            .instructions
            .iter()
            .position(|ix| ix.program_id == market.program_id)
            .unwrap();
        assert!(funding < action);

        for batch in &batches[1..] {
            assert!(batch.builder.signers.is_empty());
            assert_eq!(
                0,
                count_program(&batch.builder.instructions, &solana_sdk::system_program::ID)
            );
        }

        let last = batches.last().unwrap().builder.instructions.last().unwrap();
        assert_eq!(spl_token::ID, last.program_id);
        assert_eq!(wrapped, last.accounts[0].pubkey);

        for batch in &batches {
            assert!(batch
                .builder
                .instructions
                .iter()
                .filter(|ix| ix.program_id == market.program_id)
                .all(|ix| ix.accounts.iter().any(|meta| meta.pubkey == wrapped)));
        }
    }

    #[test]
    fn empty_contract_market_builds_nothing() {
        let mut market = market(Pubkey::new_unique());
        market.underlying_amount_per_contract = 0;
        let holdings = AssetHoldings {
            underlying: Some(holding(market.underlying_asset_mint, 0)),
            ..Default::default()
        };
        let request = ActionRequest::mint(market.clone(), Pubkey::new_unique(), 1);

        assert_eq!(
            Some(ActionError::InvalidMarket(MarketError::EmptyContract(market.address))),
            BatchPlanner::default()
                .plan(&request, &holdings, &DestinationOverrides::default())
                .err()
        );
    }

    #[test]
    fn failed_provisioning_builds_nothing() {
        let market = market(Pubkey::new_unique());
        let request = ActionRequest::close(market, Pubkey::new_unique(), 1);

        assert!(matches!(
            BatchPlanner::default().plan(
                &request,
                &AssetHoldings::default(),
                &DestinationOverrides::default()
            ),
            Err(ActionError::MissingAccount { .. })
        ));
    }
}
