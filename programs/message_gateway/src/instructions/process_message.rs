use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar;

use crate::constants::*;
use crate::events::MessageProcessed;
use crate::replay::{finalize_record, MarkerState};
use crate::state::{CrossChainMessage, MessageGateway, MessageSignature, SignerRegistry, SignerRegistryType};
use crate::utils::pda::close_account;
use crate::utils::signature::{Ed25519Attestations, LayerRegistries};

pub fn handler(
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
    let message = CrossChainMessage {
        tx_id,
        source_chain_id,
        dest_chain_id,
        sender,
        recipient,
        on_chain_data,
        off_chain_data,
    };

    let tx_pda = ctx.accounts.tx_id_pda.to_account_info();
    let state = MarkerState::load(&tx_pda, ctx.program_id)?;

    let attestations = Ed25519Attestations::load(&ctx.accounts.instructions.to_account_info())?;
    let project = SignerRegistry::load_optional(
        &ctx.accounts.project_registry.to_account_info(),
        ctx.program_id,
    )?;
    let registries = LayerRegistries {
        via: &ctx.accounts.via_registry,
        chain: &ctx.accounts.chain_registry,
        project: project.as_ref(),
    };

    let finalized = finalize_record(
        &state,
        &ctx.accounts.gateway,
        &message,
        &signatures,
        &registries,
        &attestations,
    )?;

    // Rent goes back to whoever relays TX2
    close_account(&tx_pda, &ctx.accounts.relayer.to_account_info())?;

    emit!(MessageProcessed {
        tx_id,
        source_chain_id,
        message_hash: finalized.message_hash,
        relayer: ctx.accounts.relayer.key(),
    });

    msg!(
        "Message processed and TxId PDA closed for tx_id={} ({} valid signatures)",
        tx_id,
        finalized.validation.total_valid
    );
    Ok(())
}

#[derive(Accounts)]
#[instruction(tx_id: u128, source_chain_id: u64)]
pub struct ProcessMessage<'info> {
    #[account(
        seeds = [GATEWAY_SEED, gateway.chain_id.to_le_bytes().as_ref()],
        bump = gateway.bump
    )]
    pub gateway: Account<'info, MessageGateway>,

    /// CHECK: loaded and closed in the handler; a missing record is RecordNotFound
    #[account(
        mut,
        seeds = [
            TX_SEED,
            source_chain_id.to_le_bytes().as_ref(),
            &tx_id.to_le_bytes()
        ],
        bump
    )]
    pub tx_id_pda: UncheckedAccount<'info>,

    #[account(
        seeds = [
            SIGNER_REGISTRY_SEED,
            &SignerRegistryType::Via.discriminant().to_le_bytes(),
            &source_chain_id.to_le_bytes()
        ],
        bump = via_registry.bump
    )]
    pub via_registry: Account<'info, SignerRegistry>,

    #[account(
        seeds = [
            SIGNER_REGISTRY_SEED,
            &SignerRegistryType::Chain.discriminant().to_le_bytes(),
            &source_chain_id.to_le_bytes()
        ],
        bump = chain_registry.bump
    )]
    pub chain_registry: Account<'info, SignerRegistry>,

    /// CHECK: always the canonical Project address; enforced whenever a registry lives there
    #[account(
        seeds = [
            SIGNER_REGISTRY_SEED,
            &SignerRegistryType::Project.discriminant().to_le_bytes(),
            &source_chain_id.to_le_bytes()
        ],
        bump
    )]
    pub project_registry: UncheckedAccount<'info>,

    #[account(mut)]
    pub relayer: Signer<'info>,

    /// CHECK: instructions sysvar, address-checked
    #[account(address = sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,
}
