use anchor_lang::prelude::*;

use crate::errors::GatewayError;

/// Counter PDA tracking message processing per source chain
/// Allows out-of-order message processing while detecting gaps
#[account]
pub struct CounterPDA {
    /// Source chain identifier
    pub source_chain_id: u64,

    /// Highest transaction ID seen from this chain
    pub highest_tx_id_seen: u128,

    /// PDA bump seed
    pub bump: u8,
}

impl CounterPDA {
    pub const SIZE: usize = 8   // source_chain_id
        + 16                    // highest_tx_id_seen (u128)
        + 1;                    // bump

    /// Transaction ids from one source chain are accepted in increasing order only.
    /// A closed marker leaves its key free, so this is what stops a second TX1.
    pub fn ensure_fresh(&self, tx_id: u128) -> Result<()> {
        if tx_id <= self.highest_tx_id_seen {
            msg!(
                "tx_id={} not above highest seen {} for source_chain={}",
                tx_id,
                self.highest_tx_id_seen,
                self.source_chain_id
            );
            return err!(GatewayError::TxIdTooOld);
        }
        Ok(())
    }

    pub fn advance(&mut self, tx_id: u128) -> Result<()> {
        self.ensure_fresh(tx_id)?;
        self.highest_tx_id_seen = tx_id;
        Ok(())
    }
}
