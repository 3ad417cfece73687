use std::fmt::{Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use solana_sdk::{
    account::Account, hash::Hash, program_error::ProgramError, program_pack::Pack, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

pub mod network;
#[cfg(feature = "client-native")]
pub mod rpc;
pub mod signature;
pub mod transaction;
pub mod util;

/// How long to wait for a submitted transaction before giving up on it
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationConfig {
    /// Number of times the signature status is requested
    pub attempts: u32,

    /// Delay between status requests, in milliseconds
    pub interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval_ms: 1_000,
        }
    }
}

/// A type that provides an interface to interact with the Solana network.
///
/// Calls are expected to run on a single cooperative executor (e.g. a browser
/// event loop), so the futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait NetworkInterface: Clone + 'static {
    type Error: Debug + Display;

    /// Get the genesis hash for the network
    async fn get_genesis_hash(&self) -> Result<Hash, Self::Error>;

    /// Get the latest blockhash from the network
    async fn get_latest_blockhash(&self) -> Result<Hash, Self::Error>;

    /// The lamports an account of the given size must hold to be rent exempt
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        length: usize,
    ) -> Result<u64, Self::Error>;

    /// Retrieve multiple accounts in one operation
    async fn get_accounts(&self, addresses: &[Pubkey])
        -> Result<Vec<Option<Account>>, Self::Error>;

    /// Submit a fully signed transaction, without waiting for it to land
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, Self::Error>;

    /// Wait for a submitted transaction to reach a final outcome.
    ///
    /// Returns `Ok(false)` when the transaction landed but failed, and an error
    /// when the outcome could not be observed (e.g. timeout).
    async fn confirm_transaction(&self, signature: &Signature) -> Result<bool, Self::Error>;
}

/// A wallet that holds the user's key, and can authorize a set of transactions
/// with a single user interaction.
#[async_trait(?Send)]
pub trait WalletInterface {
    type Error: Debug + Display;

    /// The address of the wallet, which also pays transaction fees
    fn public_key(&self) -> Pubkey;

    /// Add the wallet signature to every transaction in the set.
    ///
    /// Any error is treated as the user rejecting the whole set.
    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, Self::Error>;
}

#[async_trait(?Send)]
pub trait NetworkInterfaceExt: NetworkInterface {
    async fn get_accounts_all(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, ExtError<Self>> {
        let mut result = vec![];

        for chunk in addresses.chunks(100) {
            let accounts = self
                .get_accounts(chunk)
                .await
                .map_err(ExtError::Interface)?;

            result.extend(accounts);
        }

        Ok(result)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, ExtError<Self>> {
        Ok(self
            .get_accounts_all(&[*address])
            .await?
            .into_iter()
            .next()
            .flatten())
    }

    async fn get_token_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<spl_token::state::Account>>, ExtError<Self>> {
        self.get_accounts_all(addresses)
            .await?
            .into_iter()
            .zip(addresses)
            .map(|(account, address)| match account {
                None => Ok(None),
                Some(account) => spl_token::state::Account::unpack(&account.data)
                    .map(Some)
                    .map_err(|e| ExtError::Unpack {
                        address: *address,
                        error: e,
                    }),
            })
            .collect()
    }
}

#[derive(Error, Debug)]
pub enum ExtError<I: NetworkInterface> {
    #[error("interface error: {0}")]
    Interface(I::Error),

    #[error("error unpacking account {address}: {error}")]
    Unpack {
        address: Pubkey,
        error: ProgramError,
    },
}

impl<T: NetworkInterface> NetworkInterfaceExt for T {}
