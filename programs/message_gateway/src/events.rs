use anchor_lang::prelude::*;

use crate::state::SignerRegistryType;

/// Event emitted when a message is sent
#[event]
pub struct SendRequested {
    pub tx_id: u128,
    pub sender: [u8; 32],
    pub recipient: Vec<u8>,
    pub dest_chain_id: u64,
    pub chain_data: Vec<u8>,
    pub confirmations: u16,
}

/// Event emitted when TxId PDA is created (TX1)
#[event]
pub struct TxPdaCreated {
    pub tx_id: u128,
    pub source_chain_id: u64,
    pub message_hash: [u8; 32],
}

/// Event emitted when a message is processed (TX2)
#[event]
pub struct MessageProcessed {
    pub tx_id: u128,
    pub source_chain_id: u64,
    pub message_hash: [u8; 32],
    pub relayer: Pubkey,
}

/// Event emitted when system status changes
#[event]
pub struct SystemStatusChanged {
    pub chain_id: u64,
    pub enabled: bool,
}

#[event]
pub struct CounterInitialized {
    pub source_chain_id: u64,
    pub counter_pda: Pubkey,
    pub authority: Pubkey,
    pub gateway: Pubkey,
}

/// Emitted after any registry mutation with the resulting configuration
#[event]
pub struct SignerRegistryUpdated {
    pub registry_type: SignerRegistryType,
    pub chain_id: u64,
    pub signer_count: u8,
    pub required_signatures: u8,
    pub enabled: bool,
}
