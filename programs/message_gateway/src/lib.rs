use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod replay;
pub mod state;
pub mod utils;

pub use instructions::*;

use crate::state::{MessageSignature, SignerRegistryType};

declare_id!("6ddGrPepLFD5c2NCPNAPCJyfbSwzrjtw1ACGebWpRgQC");

/// Cross-chain message gateway
///
/// Inbound messages are delivered in two transactions: TX1 commits to the
/// message digest in a TxId PDA (the replay gate), TX2 verifies Via, Chain
/// and Project signatures over the same digest and closes the PDA.
#[program]
pub mod message_gateway {
    use super::*;

    /// Initialize the gateway for a specific chain
    pub fn initialize_gateway(ctx: Context<InitializeGateway>, chain_id: u64) -> Result<()> {
        instructions::initialize::handler(ctx, chain_id)
    }

    /// Update system enabled status (admin only)
    pub fn set_system_enabled(ctx: Context<SetSystemEnabled>, enabled: bool) -> Result<()> {
        instructions::admin::set_system_enabled(ctx, enabled)
    }

    /// Create the per-source-chain counter TX1 updates (admin only)
    pub fn initialize_counter(ctx: Context<InitializeCounter>, source_chain_id: u64) -> Result<()> {
        instructions::initialize_counter::handler(ctx, source_chain_id)
    }

    /// Initialize a signer registry
    pub fn initialize_signer_registry(
        ctx: Context<InitializeSignerRegistry>,
        registry_type: SignerRegistryType,
        chain_id: u64,
        initial_signers: Vec<Pubkey>,
        required_signatures: u8,
    ) -> Result<()> {
        instructions::signer_registry::initialize_signer_registry(
            ctx,
            registry_type,
            chain_id,
            initial_signers,
            required_signatures,
        )
    }

    /// Update signers in an existing registry
    pub fn update_signers(
        ctx: Context<ModifySignerRegistry>,
        registry_type: SignerRegistryType,
        chain_id: u64,
        new_signers: Vec<Pubkey>,
        new_required_signatures: u8,
    ) -> Result<()> {
        instructions::signer_registry::update_signers(
            ctx,
            registry_type,
            chain_id,
            new_signers,
            new_required_signatures,
        )
    }

    /// Add a signer to an existing registry
    pub fn add_signer(
        ctx: Context<ModifySignerRegistry>,
        registry_type: SignerRegistryType,
        chain_id: u64,
        new_signer: Pubkey,
    ) -> Result<()> {
        instructions::signer_registry::add_signer(ctx, registry_type, chain_id, new_signer)
    }

    /// Remove a signer from an existing registry
    pub fn remove_signer(
        ctx: Context<ModifySignerRegistry>,
        registry_type: SignerRegistryType,
        chain_id: u64,
        signer_to_remove: Pubkey,
    ) -> Result<()> {
        instructions::signer_registry::remove_signer(ctx, registry_type, chain_id, signer_to_remove)
    }

    /// Update signature threshold for a registry
    pub fn update_threshold(
        ctx: Context<ModifySignerRegistry>,
        registry_type: SignerRegistryType,
        chain_id: u64,
        new_threshold: u8,
    ) -> Result<()> {
        instructions::signer_registry::update_threshold(ctx, registry_type, chain_id, new_threshold)
    }

    /// Enable or disable a signer registry
    pub fn set_registry_enabled(
        ctx: Context<ModifySignerRegistry>,
        registry_type: SignerRegistryType,
        chain_id: u64,
        enabled: bool,
    ) -> Result<()> {
        instructions::signer_registry::set_registry_enabled(ctx, registry_type, chain_id, enabled)
    }

    /// Send a cross-chain message
    pub fn send_message(
        ctx: Context<SendMessage>,
        tx_id: u128,
        recipient: Vec<u8>,
        dest_chain_id: u64,
        chain_data: Vec<u8>,
        confirmations: u16,
    ) -> Result<()> {
        instructions::send_message::handler(ctx, tx_id, recipient, dest_chain_id, chain_data, confirmations)
    }

    /// TX1: Create TxId PDA for replay protection
    pub fn create_tx_pda(
        ctx: Context<CreateTxPda>,
        tx_id: u128,
        source_chain_id: u64,
        dest_chain_id: u64,
        sender: Vec<u8>,
        recipient: Vec<u8>,
        on_chain_data: Vec<u8>,
        off_chain_data: Vec<u8>,
        signatures: Vec<MessageSignature>,
    ) -> Result<()> {
        instructions::create_tx_pda::handler(
            ctx,
            tx_id,
            source_chain_id,
            dest_chain_id,
            sender,
            recipient,
            on_chain_data,
            off_chain_data,
            signatures,
        )
    }

    /// TX2: Verify signatures and close the TxId PDA
    pub fn process_message(
        ctx: Context<ProcessMessage>,
        tx_id: u128,
        source_chain_id: u64,
        dest_chain_id: u64,
        sender: Vec<u8>,
        recipient: Vec<u8>,
        on_chain_data: Vec<u8>,
        off_chain_data: Vec<u8>,
        signatures: Vec<MessageSignature>,
    ) -> Result<()> {
        instructions::process_message::handler(
            ctx,
            tx_id,
            source_chain_id,
            dest_chain_id,
            sender,
            recipient,
            on_chain_data,
            off_chain_data,
            signatures,
        )
    }
}
