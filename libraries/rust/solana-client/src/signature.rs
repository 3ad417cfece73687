use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::Keypair,
    signer::{Signer, SignerError},
    transaction::Transaction,
};

use crate::WalletInterface;

pub trait NeedsSignature {
    fn needs_signature(&self, potential_signer: Pubkey) -> bool;
}

impl NeedsSignature for Instruction {
    fn needs_signature(&self, potential_signer: Pubkey) -> bool {
        self.accounts
            .iter()
            .any(|a| a.is_signer && potential_signer == a.pubkey)
    }
}

impl NeedsSignature for Vec<Instruction> {
    fn needs_signature(&self, potential_signer: Pubkey) -> bool {
        self.iter().any(|ix| ix.needs_signature(potential_signer))
    }
}

/// A wallet backed by a keypair held in memory, which signs without any user
/// interaction.
pub struct KeypairWallet {
    keypair: Keypair,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait(?Send)]
impl WalletInterface for KeypairWallet {
    type Error = SignerError;

    fn public_key(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_all_transactions(
        &self,
        mut transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, Self::Error> {
        for tx in &mut transactions {
            let blockhash = tx.message.recent_blockhash;
            tx.try_partial_sign(&[&self.keypair], blockhash)?;
        }

        Ok(transactions)
    }
}
