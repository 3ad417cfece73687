use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};

use strike_solana_client::NetworkInterface;

use crate::plan::Batch;

/// A batch compiled into a transaction, signed by everything except the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTransaction {
    pub batch_index: usize,
    pub units: u64,
    pub transaction: Transaction,
}

impl AssembledTransaction {
    /// Signatures still needed from keys outside of the batch
    pub fn missing_signers(&self) -> Vec<Pubkey> {
        let message = &self.transaction.message;
        let required = message.header.num_required_signatures as usize;

        message
            .account_keys
            .iter()
            .zip(&self.transaction.signatures)
            .take(required)
            .filter(|(_, signature)| **signature == Signature::default())
            .map(|(key, _)| *key)
            .collect()
    }
}

/// Compile a batch using a blockhash freshly fetched from the network
pub async fn assemble<N: NetworkInterface>(
    batch: &Batch,
    fee_payer: &Pubkey,
    network: &N,
) -> Result<AssembledTransaction, N::Error> {
    let blockhash = network.get_latest_blockhash().await?;

    Ok(assemble_with_blockhash(batch, fee_payer, blockhash))
}

/// Compile a batch into a transaction paid for by `fee_payer`. The batch's
/// generated keys sign now, and the wallet signs later.
pub fn assemble_with_blockhash(
    batch: &Batch,
    fee_payer: &Pubkey,
    blockhash: Hash,
) -> AssembledTransaction {
    let transaction = batch
        .builder
        .clone()
        .compile_partial(Some(fee_payer), blockhash);

    log::debug!(
        "assembled batch {} with {} instructions and {} signatures pending",
        batch.index,
        transaction.message.instructions.len(),
        transaction
            .signatures
            .iter()
            .filter(|s| **s == Signature::default())
            .count()
    );

    AssembledTransaction {
        batch_index: batch.index,
        units: batch.units,
        transaction,
    }
}
