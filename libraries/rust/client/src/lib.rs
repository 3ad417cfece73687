use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;

use strike_instructions::OptionMarket;
use strike_solana_client::{NetworkInterface, WalletInterface};

use client::ClientState;
use config::ClientConfig;
use notify::NotificationSink;

pub mod action;
pub mod assemble;
mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod plan;
pub mod provision;
pub mod submit;
pub mod wrap;

pub use action::{
    ActionKind, ActionRequest, AssetHoldings, DestinationOverrides, TokenAccount,
};
pub use client::{ClientError, ClientResult};
pub use error::ActionError;
pub use strike_solana_client::network::NetworkKind;
pub use submit::{ActionOutcome, SubmissionResult, SubmissionState};

/// Central client object for acting on options markets with a wallet
pub struct StrikeClient<N, W> {
    client: Arc<ClientState<N, W>>,
}

impl<N, W> Clone for StrikeClient<N, W> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<N: NetworkInterface, W: WalletInterface> StrikeClient<N, W> {
    pub fn new(
        network: N,
        wallet: W,
        config: ClientConfig,
        network_kind: NetworkKind,
        notifier: impl NotificationSink + 'static,
    ) -> Self {
        Self {
            client: Arc::new(ClientState::new(
                network,
                wallet,
                config,
                network_kind,
                Box::new(notifier),
            )),
        }
    }

    /// Create a client, detecting which network the interface is connected to
    pub async fn connect(
        network: N,
        wallet: W,
        config: ClientConfig,
        notifier: impl NotificationSink + 'static,
    ) -> ClientResult<N, Self> {
        let network_kind = NetworkKind::from_interface(&network)
            .await
            .map_err(ClientError::Interface)?;
        log::info!("connected to {network_kind:?}");

        Ok(Self::new(network, wallet, config, network_kind, notifier))
    }

    /// The wallet that owns the accounts and pays for transactions
    pub fn owner(&self) -> Pubkey {
        self.client.owner()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.client.config
    }

    pub fn network_kind(&self) -> NetworkKind {
        self.client.network_kind
    }

    /// Get the wallet's current holdings for a market
    pub async fn load_holdings(&self, market: &OptionMarket) -> ClientResult<N, AssetHoldings> {
        self.client.load_holdings(market).await
    }

    /// Mint contracts, using the wallet's current holdings
    pub async fn mint(
        &self,
        market: &OptionMarket,
        quantity: u64,
        overrides: &DestinationOverrides,
    ) -> ClientResult<N, ActionOutcome> {
        let request = ActionRequest::mint(market.clone(), self.owner(), quantity);
        request.validate()?;

        let holdings = self.load_holdings(market).await?;
        self.execute(&request, &holdings, overrides).await
    }

    /// Close written positions, using the wallet's current holdings
    pub async fn close_position(
        &self,
        market: &OptionMarket,
        quantity: u64,
        overrides: &DestinationOverrides,
    ) -> ClientResult<N, ActionOutcome> {
        let request = ActionRequest::close(market.clone(), self.owner(), quantity);
        request.validate()?;

        let holdings = self.load_holdings(market).await?;
        self.execute(&request, &holdings, overrides).await
    }

    /// Plan, assemble, sign and submit a request against known holdings
    pub async fn execute(
        &self,
        request: &ActionRequest,
        holdings: &AssetHoldings,
        overrides: &DestinationOverrides,
    ) -> ClientResult<N, ActionOutcome> {
        log::debug!(
            "{} {} contracts of market {}",
            request.kind,
            request.quantity,
            request.market.address
        );
        self.client.execute(request, holdings, overrides).await
    }
}
