use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::GatewayError;
use crate::utils::hash::create_cross_chain_hash;

/// Keccak-256 digest of the canonical message encoding
pub type MessageDigest = [u8; 32];

/// Inbound cross-chain message as signed off-chain.
///
/// `off_chain_data` participates in the digest but is never stored on-chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossChainMessage {
    pub tx_id: u128,
    pub source_chain_id: u64,
    pub dest_chain_id: u64,
    pub sender: Vec<u8>,
    pub recipient: Vec<u8>,
    pub on_chain_data: Vec<u8>,
    pub off_chain_data: Vec<u8>,
}

impl CrossChainMessage {
    /// DOS protection: reject oversized fields before hashing
    pub fn validate_sizes(&self) -> Result<()> {
        require!(
            self.sender.len() <= MAX_SENDER_SIZE,
            GatewayError::SenderTooLong
        );
        require!(
            self.recipient.len() <= MAX_RECIPIENT_SIZE,
            GatewayError::RecipientTooLong
        );
        require!(
            self.on_chain_data.len() <= MAX_ON_CHAIN_DATA_SIZE,
            GatewayError::OnChainDataTooLarge
        );
        require!(
            self.off_chain_data.len() <= MAX_OFF_CHAIN_DATA_SIZE,
            GatewayError::OffChainDataTooLarge
        );
        Ok(())
    }

    /// The digest every signer in every layer signs
    pub fn digest(&self) -> Result<MessageDigest> {
        create_cross_chain_hash(self)
    }
}
