use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    account::Account,
    commitment_config::{CommitmentConfig, CommitmentLevel},
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use crate::{ConfirmationConfig, NetworkInterface};

/// A wrapper for an RPC client to implement `NetworkInterface` trait
#[derive(Clone)]
pub struct RpcConnection {
    rpc: Arc<RpcClient>,
    confirmation: ConfirmationConfig,
}

impl RpcConnection {
    pub fn new(url: &str) -> Self {
        Self::from(RpcClient::new_with_commitment(
            url.to_owned(),
            CommitmentConfig::confirmed(),
        ))
    }

    pub fn with_confirmation(mut self, confirmation: ConfirmationConfig) -> Self {
        self.confirmation = confirmation;
        self
    }
}

impl From<RpcClient> for RpcConnection {
    fn from(rpc: RpcClient) -> Self {
        Self {
            rpc: Arc::new(rpc),
            confirmation: ConfirmationConfig::default(),
        }
    }
}

#[async_trait(?Send)]
impl NetworkInterface for RpcConnection {
    type Error = ClientError;

    async fn get_genesis_hash(&self) -> Result<Hash, Self::Error> {
        self.rpc.get_genesis_hash().await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Self::Error> {
        self.rpc.get_latest_blockhash().await
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        length: usize,
    ) -> Result<u64, Self::Error> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(length)
            .await
    }

    async fn get_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, Self::Error> {
        Ok(self
            .rpc
            .get_multiple_accounts_with_commitment(addresses, CommitmentConfig::processed())
            .await?
            .value)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, Self::Error> {
        self.rpc
            .send_transaction_with_config(
                transaction,
                RpcSendTransactionConfig {
                    skip_preflight: false,
                    preflight_commitment: Some(CommitmentLevel::Processed),
                    ..Default::default()
                },
            )
            .await
    }

    async fn confirm_transaction(&self, signature: &Signature) -> Result<bool, Self::Error> {
        let interval = Duration::from_millis(self.confirmation.interval_ms);

        for _ in 0..self.confirmation.attempts {
            match self.rpc.get_signature_status(signature).await? {
                None => tokio::time::sleep(interval).await,
                Some(Ok(())) => return Ok(true),
                Some(Err(e)) => {
                    log::warn!("transaction {signature} failed: {e}");
                    return Ok(false);
                }
            }
        }

        Err(ClientErrorKind::Custom(format!(
            "transaction {signature} was not confirmed after {} attempts",
            self.confirmation.attempts
        ))
        .into())
    }
}
