use std::error::Error as StdError;
use thiserror::Error;

use solana_sdk::pubkey::Pubkey;

use strike_instructions::{token, OptionMarket};
use strike_solana_client::{
    network::NetworkKind, ExtError, NetworkInterface, NetworkInterfaceExt, WalletInterface,
};

use crate::{
    action::{ActionRequest, AssetHoldings, DestinationOverrides, TokenAccount},
    assemble::{self, AssembledTransaction},
    config::ClientConfig,
    error::ActionError,
    notify::{self, Notification, NotificationSink, Severity},
    plan::{Batch, BatchPlanner},
    submit::{ActionOutcome, SubmissionCoordinator},
};

pub type ClientResult<N, T> = std::result::Result<T, ClientError<N>>;

#[derive(Error)]
pub enum ClientError<N: NetworkInterface> {
    #[error("{0}")]
    Action(ActionError),
    #[error("interface error: {0}")]
    Interface(N::Error),
    #[error("decode error: {0}")]
    Deserialize(Box<dyn StdError + Send + Sync>),
}

impl<N: NetworkInterface> std::fmt::Debug for ClientError<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Action(e) => write!(f, "action error: {e:?}"),
            Self::Interface(e) => write!(f, "interface error: {e:?}"),
            Self::Deserialize(e) => write!(f, "decode error: {e}"),
        }
    }
}

impl<N: NetworkInterface> From<ActionError> for ClientError<N> {
    fn from(e: ActionError) -> Self {
        Self::Action(e)
    }
}

impl<N: NetworkInterface> From<ExtError<N>> for ClientError<N> {
    fn from(e: ExtError<N>) -> Self {
        match e {
            ExtError::Interface(err) => Self::Interface(err),
            ExtError::Unpack { error, .. } => Self::Deserialize(Box::new(error)),
        }
    }
}

impl<N: NetworkInterface> ClientError<N> {
    /// The action error, if this was not a network problem
    pub fn action(&self) -> Option<&ActionError> {
        match self {
            Self::Action(e) => Some(e),
            _ => None,
        }
    }
}

/// Central object for client implementations, holding the connections and
/// configuration shared by every action.
pub struct ClientState<N, W> {
    pub(crate) network: N,
    pub(crate) wallet: W,
    pub(crate) config: ClientConfig,
    pub(crate) network_kind: NetworkKind,
    notifier: Box<dyn NotificationSink>,
    planner: BatchPlanner,
}

impl<N: NetworkInterface, W: WalletInterface> ClientState<N, W> {
    pub fn new(
        network: N,
        wallet: W,
        config: ClientConfig,
        network_kind: NetworkKind,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            planner: BatchPlanner::from_config(&config),
            network,
            wallet,
            config,
            network_kind,
            notifier,
        }
    }

    pub fn owner(&self) -> Pubkey {
        self.wallet.public_key()
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.push(notification)
    }

    /// Read the wallet's accounts for the market's tokens
    pub async fn load_holdings(&self, market: &OptionMarket) -> ClientResult<N, AssetHoldings> {
        let owner = self.owner();
        let mints = [
            market.underlying_asset_mint,
            market.option_mint,
            market.writer_token_mint,
        ];
        let addresses = mints
            .iter()
            .map(|mint| token::wallet_account(&owner, mint))
            .collect::<Vec<_>>();

        let mut accounts = self
            .network
            .get_token_accounts(&addresses)
            .await?
            .into_iter()
            .zip(&addresses)
            .map(|(account, address)| {
                account.map(|account| TokenAccount {
                    address: *address,
                    mint: account.mint,
                    amount: account.amount,
                })
            });

        let native_lamports = self
            .network
            .get_account(&owner)
            .await?
            .map(|account| account.lamports)
            .unwrap_or_default();
        let token_account_rent = self
            .network
            .get_minimum_balance_for_rent_exemption(token::TOKEN_ACCOUNT_LEN)
            .await
            .map_err(ClientError::Interface)?;

        Ok(AssetHoldings {
            underlying: accounts.next().flatten(),
            option_tokens: accounts.next().flatten(),
            writer_tokens: accounts.next().flatten(),
            native_lamports,
            token_account_rent,
        })
    }

    /// Plan the batches for a request, telling the user when their holdings
    /// are not enough
    pub fn plan(
        &self,
        request: &ActionRequest,
        holdings: &AssetHoldings,
        overrides: &DestinationOverrides,
    ) -> ClientResult<N, Vec<Batch>> {
        self.planner
            .plan(request, holdings, overrides)
            .map_err(|e| {
                if let Some(message) =
                    notify::describe_holdings_error(&self.config, request.kind, request.quantity, &e)
                {
                    self.notify(Notification::new(Severity::Warning, message));
                }
                e.into()
            })
    }

    /// Compile every batch, each with its own recent blockhash
    pub async fn assemble_all(
        &self,
        batches: &[Batch],
    ) -> ClientResult<N, Vec<AssembledTransaction>> {
        let fee_payer = self.owner();
        let mut assembled = Vec::with_capacity(batches.len());

        for batch in batches {
            assembled.push(
                assemble::assemble(batch, &fee_payer, &self.network)
                    .await
                    .map_err(ClientError::Interface)?,
            );
        }

        Ok(assembled)
    }

    pub async fn execute(
        &self,
        request: &ActionRequest,
        holdings: &AssetHoldings,
        overrides: &DestinationOverrides,
    ) -> ClientResult<N, ActionOutcome> {
        let batches = self.plan(request, holdings, overrides)?;
        let transactions = self.assemble_all(&batches).await?;

        let coordinator = SubmissionCoordinator {
            network: &self.network,
            wallet: &self.wallet,
            notifier: self.notifier.as_ref(),
            config: &self.config,
            network_kind: self.network_kind,
        };
        let results = coordinator.submit_all(request.kind, transactions).await?;

        Ok(ActionOutcome {
            kind: request.kind,
            requested: request.quantity,
            results,
        })
    }
}
