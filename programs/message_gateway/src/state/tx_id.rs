use anchor_lang::prelude::*;

use crate::errors::GatewayError;
use crate::state::MessageDigest;

/// TxId PDA for two-transaction replay protection
/// Created in TX1, closed in TX2 (rent reclaimed)
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct TxIdPDA {
    /// Transaction ID from source chain
    pub tx_id: u128,

    /// Source chain the transaction ID belongs to
    pub source_chain_id: u64,

    /// Digest recorded in TX1, TX2 must recompute the same value
    pub message_hash: MessageDigest,

    /// PDA bump seed
    pub bump: u8,
}

impl TxIdPDA {
    pub const SIZE: usize = 16  // tx_id (u128)
        + 8                     // source_chain_id
        + 32                    // message_hash
        + 1;                    // bump

    /// Cross-check the full message presented in TX2 against what TX1 committed to
    pub fn ensure_matches(&self, tx_id: u128, source_chain_id: u64, digest: &MessageDigest) -> Result<()> {
        require!(
            self.tx_id == tx_id && self.source_chain_id == source_chain_id,
            GatewayError::RecordNotFound
        );
        if self.message_hash != *digest {
            msg!(
                "Digest mismatch for tx_id={}: stored={:?}, recomputed={:?}",
                tx_id,
                self.message_hash,
                digest
            );
            return err!(GatewayError::DigestMismatch);
        }
        Ok(())
    }
}
