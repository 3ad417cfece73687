use std::collections::HashSet;

use solana_sdk::hash::Hash;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::{instruction::Instruction, transaction::Transaction};

use crate::signature::NeedsSignature;
use crate::util::data::Concat;
use crate::util::keypair::clone_vec;

/// Maximum size in bytes of a serialized transaction accepted by the network
pub const MAX_TX_SIZE: usize = 1232;

/// A group of instructions that are expected to execute in the same
/// transaction. Can be merged with other TransactionBuilder instances:
/// ```rust ignore
/// let builder = cat![setup, action, teardown];
/// ```
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    /// see above
    pub instructions: Vec<Instruction>,
    /// Generated keypairs that will be used for the for the included
    /// instructions. Typically, this is used when an account needs to be
    /// initialized for this instruction.
    ///
    /// This does not include the payer or the user's wallet, whose signature
    /// is added later by the wallet.
    pub signers: Vec<Keypair>,
}

impl Clone for TransactionBuilder {
    fn clone(&self) -> Self {
        Self {
            instructions: self.instructions.clone(),
            signers: clone_vec(&self.signers),
        }
    }
}

impl From<Vec<Instruction>> for TransactionBuilder {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            signers: vec![],
        }
    }
}

impl From<Instruction> for TransactionBuilder {
    fn from(ix: Instruction) -> Self {
        Self {
            instructions: vec![ix],
            signers: vec![],
        }
    }
}

impl TransactionBuilder {
    /// Cleans up any duplicate or unneeded signers.
    pub fn prune(&mut self) {
        let mut signer_pubkeys = HashSet::new();
        for signer in std::mem::take(&mut self.signers) {
            let pubkey = signer.pubkey();
            if !signer_pubkeys.contains(&pubkey) && self.instructions.needs_signature(pubkey) {
                signer_pubkeys.insert(pubkey);
                self.signers.push(signer);
            }
        }
    }

    /// Convert the TransactionBuilder into a solana Transaction, signed by
    /// every keypair held by the builder.
    ///
    /// The signatures of the payer and any other external signer are left
    /// empty, to be added later by the wallet.
    pub fn compile_partial(mut self, payer: Option<&Pubkey>, recent_blockhash: Hash) -> Transaction {
        self.prune();
        let mut tx = Transaction::new_unsigned(Message::new(&self.instructions, payer));
        tx.partial_sign(&self.signers.iter().collect::<Vec<_>>(), recent_blockhash);
        tx
    }

    /// The size of the transaction as it would be submitted to an rpc node.
    /// Placeholder signatures are used, so only the size is meaningful.
    pub fn serialized_size(&self, payer: &Pubkey) -> Result<usize, bincode::Error> {
        let mut compiled = Transaction::new_unsigned(Message::new(&self.instructions, Some(payer)));
        compiled.signatures.extend(
            (0..compiled.message.header.num_required_signatures as usize)
                .map(|_| Signature::new_unique()),
        );

        Ok(bincode::serialized_size(&compiled)? as usize)
    }

    /// Whether this builder fits in a single transaction paid for by `payer`
    pub fn fits_in_transaction(&self, payer: &Pubkey) -> Result<bool, bincode::Error> {
        Ok(self.serialized_size(payer)? <= MAX_TX_SIZE)
    }
}

impl Concat for TransactionBuilder {
    fn cat(mut self, other: Self) -> Self {
        self.instructions.extend(other.instructions);
        self.signers.extend(other.signers);

        self
    }

    fn cat_ref(mut self, other: &Self) -> Self {
        self.instructions.extend(other.instructions.iter().cloned());
        self.signers.extend(clone_vec(&other.signers));

        self
    }
}

/// Convert types to a TransactionBuilder while including signers. Serves a
/// similar purpose to From<Instruction>, but it's used when you also need to
/// add signers.
pub trait WithSigner: Sized {
    /// convert to a TransactionBuilder that includes this signer
    fn with_signer(self, signer: Keypair) -> TransactionBuilder {
        self.with_signers(vec![signer])
    }

    /// convert to a TransactionBuilder that includes these signers
    fn with_signers(self, signers: Vec<Keypair>) -> TransactionBuilder;
}

impl WithSigner for Instruction {
    fn with_signers(self, signers: Vec<Keypair>) -> TransactionBuilder {
        vec![self].with_signers(signers)
    }
}

impl WithSigner for Vec<Instruction> {
    fn with_signers(self, signers: Vec<Keypair>) -> TransactionBuilder {
        TransactionBuilder {
            instructions: self,
            signers,
        }
    }
}

impl WithSigner for TransactionBuilder {
    fn with_signers(mut self, signers: Vec<Keypair>) -> TransactionBuilder {
        self.signers.extend(signers);
        self
    }
}
