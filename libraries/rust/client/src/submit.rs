use futures::future::join_all;

use solana_sdk::{signature::Signature, transaction::Transaction};

use strike_solana_client::{network::NetworkKind, NetworkInterface, WalletInterface};

use crate::{
    action::ActionKind,
    assemble::AssembledTransaction,
    config::ClientConfig,
    error::ActionError,
    notify::{Notification, NotificationSink, Severity},
};

/// Progress of a single transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Built,
    AwaitingWalletSignature,
    Submitted,
    Confirmed,
    Failed(String),
}

/// What happened to one batch of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub batch_index: usize,
    pub units: u64,

    /// Known once the transaction has been sent
    pub signature: Option<Signature>,

    pub state: SubmissionState,
}

impl SubmissionResult {
    pub fn is_confirmed(&self) -> bool {
        self.state == SubmissionState::Confirmed
    }

    /// The error for this batch, if it failed
    pub fn error(&self) -> Option<ActionError> {
        match &self.state {
            SubmissionState::Failed(reason) => Some(ActionError::SubmissionFailed {
                batch_index: self.batch_index,
                reason: reason.clone(),
            }),
            _ => None,
        }
    }

    fn advance(&mut self, state: SubmissionState) {
        log::debug!(
            "batch {}: {:?} -> {:?}",
            self.batch_index,
            self.state,
            state
        );
        self.state = state;
    }
}

/// The combined result of every batch of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub requested: u64,
    pub results: Vec<SubmissionResult>,
}

impl ActionOutcome {
    /// Contracts acted on by confirmed transactions
    pub fn applied_units(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.is_confirmed())
            .map(|r| r.units)
            .sum()
    }

    pub fn is_complete(&self) -> bool {
        self.results.iter().all(SubmissionResult::is_confirmed)
            && self.applied_units() == self.requested
    }

    pub fn errors(&self) -> Vec<ActionError> {
        self.results.iter().filter_map(|r| r.error()).collect()
    }
}

/// Gets a set of transactions signed by the wallet, then sends and confirms
/// each of them independently.
pub struct SubmissionCoordinator<'a, N, W> {
    pub network: &'a N,
    pub wallet: &'a W,
    pub notifier: &'a dyn NotificationSink,
    pub config: &'a ClientConfig,
    pub network_kind: NetworkKind,
}

impl<'a, N: NetworkInterface, W: WalletInterface> SubmissionCoordinator<'a, N, W> {
    /// Sign and submit every transaction.
    ///
    /// Nothing is sent if the wallet declines to sign. Otherwise each
    /// transaction gets its own result, and a failure in one does not
    /// affect the others.
    pub async fn submit_all(
        &self,
        kind: ActionKind,
        transactions: Vec<AssembledTransaction>,
    ) -> Result<Vec<SubmissionResult>, ActionError> {
        let mut results = transactions
            .iter()
            .map(|tx| SubmissionResult {
                batch_index: tx.batch_index,
                units: tx.units,
                signature: None,
                state: SubmissionState::Built,
            })
            .collect::<Vec<_>>();

        for result in &mut results {
            result.advance(SubmissionState::AwaitingWalletSignature);
        }

        let unsigned = transactions
            .into_iter()
            .map(|tx| tx.transaction)
            .collect::<Vec<_>>();
        let expected = unsigned.len();

        let signed = match self.wallet.sign_all_transactions(unsigned).await {
            Ok(signed) if signed.len() == expected => signed,
            Ok(signed) => {
                return Err(self.rejected(format!(
                    "wallet returned {} of {expected} transactions",
                    signed.len()
                )))
            }
            Err(e) => return Err(self.rejected(e.to_string())),
        };

        log::info!("sending {expected} transactions for {kind}");

        Ok(join_all(
            results
                .into_iter()
                .zip(signed)
                .map(|(result, tx)| self.send_and_confirm(kind, result, tx)),
        )
        .await)
    }

    async fn send_and_confirm(
        &self,
        kind: ActionKind,
        mut result: SubmissionResult,
        transaction: Transaction,
    ) -> SubmissionResult {
        let signature = match self.network.send_transaction(&transaction).await {
            Ok(signature) => signature,
            Err(e) => {
                log::error!("batch {} was not sent: {e}", result.batch_index);
                self.notify(Notification::new(Severity::Error, e.to_string()));
                result.advance(SubmissionState::Failed(e.to_string()));
                return result;
            }
        };

        let link = self.config.transaction_url(&signature, self.network_kind);
        result.signature = Some(signature);
        result.advance(SubmissionState::Submitted);
        self.notify(
            Notification::new(Severity::Info, format!("Submitted Transaction: {kind}"))
                .with_link(link.clone()),
        );

        let failure = match self.network.confirm_transaction(&signature).await {
            Ok(true) => None,
            Ok(false) => Some(format!("transaction {signature} failed")),
            Err(e) => Some(e.to_string()),
        };

        match failure {
            None => {
                log::info!("tx result success: #{} {signature}", result.batch_index);
                result.advance(SubmissionState::Confirmed);
                self.notify(
                    Notification::new(Severity::Success, format!("Transaction Confirmed: {kind}"))
                        .with_link(link),
                );
            }
            Some(reason) => {
                log::error!("tx result failed: #{} {signature}: {reason}", result.batch_index);
                self.notify(
                    Notification::new(Severity::Error, format!("Transaction Failed: {kind}: {reason}"))
                        .with_link(link),
                );
                result.advance(SubmissionState::Failed(reason));
            }
        }

        result
    }

    fn rejected(&self, reason: String) -> ActionError {
        let error = ActionError::SigningRejected(reason);
        log::warn!("{error}");
        self.notify(Notification::new(Severity::Error, error.to_string()));

        error
    }

    fn notify(&self, notification: Notification) {
        self.notifier.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(units: u64, state: SubmissionState) -> SubmissionResult {
        SubmissionResult {
            batch_index: 0,
            units,
            signature: None,
            state,
        }
    }

    #[test]
    fn applied_units_count_confirmed_batches() {
        let outcome = ActionOutcome {
            kind: ActionKind::Close,
            requested: 30,
            results: vec![
                result(25, SubmissionState::Confirmed),
                result(5, SubmissionState::Failed("expired".to_owned())),
            ],
        };

        assert_eq!(25, outcome.applied_units());
        assert!(!outcome.is_complete());
        assert_eq!(
            vec![ActionError::SubmissionFailed {
                batch_index: 0,
                reason: "expired".to_owned()
            }],
            outcome.errors()
        );
    }

    #[test]
    fn complete_when_all_confirmed() {
        let outcome = ActionOutcome {
            kind: ActionKind::Mint,
            requested: 30,
            results: vec![
                result(25, SubmissionState::Confirmed),
                result(5, SubmissionState::Confirmed),
            ],
        };

        assert!(outcome.is_complete());
        assert!(outcome.errors().is_empty());
    }
}
