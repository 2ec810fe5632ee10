use anchor_lang::prelude::*;
use crate::{
    constants::{GATEWAY_SEED, MAX_SIGNERS_PER_REGISTRY, SIGNER_REGISTRY_SEED},
    errors::GatewayError,
    state::{MessageGateway, SignerRegistry, SignerRegistryType},
    utils::pda::{create_pda_account, write_account},
};

/// Initialize a signer registry for a specific tier and chain
#[derive(Accounts)]
#[instruction(registry_type: SignerRegistryType, chain_id: u64)]
pub struct InitializeSignerRegistry<'info> {
    /// CHECK: created in the handler; must not exist yet
    #[account(
        mut,
        seeds = [
            SIGNER_REGISTRY_SEED,
            &registry_type.discriminant().to_le_bytes(),
            &chain_id.to_le_bytes()
        ],
        bump
    )]
    pub signer_registry: UncheckedAccount<'info>,

    #[account(
        seeds = [GATEWAY_SEED, &gateway.chain_id.to_le_bytes()],
        bump = gateway.bump,
        constraint = gateway.is_authority(&authority.key()) @ GatewayError::Unauthorized
    )]
    pub gateway: Account<'info, MessageGateway>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_signer_registry(
    ctx: Context<InitializeSignerRegistry>,
    registry_type: SignerRegistryType,
    chain_id: u64,
    initial_signers: Vec<Pubkey>,
    required_signatures: u8,
) -> Result<()> {
    let registry = SignerRegistry::new(
        registry_type,
        chain_id,
        ctx.accounts.authority.key(),
        initial_signers,
        required_signatures,
        ctx.bumps.signer_registry,
    )?;

    let discriminant = registry_type.discriminant().to_le_bytes();
    let chain_bytes = chain_id.to_le_bytes();
    let bump = [registry.bump];
    create_pda_account(
        &ctx.accounts.signer_registry.to_account_info(),
        &ctx.accounts.authority.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        SignerRegistry::space(MAX_SIGNERS_PER_REGISTRY),
        &[SIGNER_REGISTRY_SEED, &discriminant, &chain_bytes, &bump],
        ctx.program_id,
    )?;
    write_account(&ctx.accounts.signer_registry.to_account_info(), &registry)?;

    emit!(registry.updated_event());

    msg!(
        "Initialized {:?} signer registry for chain {} with {} signers, requiring {} signatures",
        registry_type,
        chain_id,
        registry.signers.len(),
        registry.required_signatures
    );

    Ok(())
}

/// Mutable registry plus the gateway whose authority may change it
#[derive(Accounts)]
#[instruction(registry_type: SignerRegistryType, chain_id: u64)]
pub struct ModifySignerRegistry<'info> {
    #[account(
        mut,
        seeds = [
            SIGNER_REGISTRY_SEED,
            &registry_type.discriminant().to_le_bytes(),
            &chain_id.to_le_bytes()
        ],
        bump = signer_registry.bump,
        has_one = authority @ GatewayError::Unauthorized
    )]
    pub signer_registry: Account<'info, SignerRegistry>,

    #[account(
        seeds = [GATEWAY_SEED, &gateway.chain_id.to_le_bytes()],
        bump = gateway.bump,
        constraint = gateway.is_authority(&authority.key()) @ GatewayError::Unauthorized
    )]
    pub gateway: Account<'info, MessageGateway>,

    pub authority: Signer<'info>,
}

/// Replace the whole signer set and threshold
pub fn update_signers(
    ctx: Context<ModifySignerRegistry>,
    _registry_type: SignerRegistryType,
    _chain_id: u64,
    new_signers: Vec<Pubkey>,
    new_required_signatures: u8,
) -> Result<()> {
    let registry = &mut ctx.accounts.signer_registry;
    let old_count = registry.signers.len();

    registry.replace_signers(new_signers, new_required_signatures)?;

    emit!(registry.updated_event());
    msg!(
        "Updated {:?} signer registry: {} -> {} signers, requiring {} signatures",
        registry.registry_type,
        old_count,
        registry.signers.len(),
        registry.required_signatures
    );

    Ok(())
}

/// Add a single signer to an existing registry
pub fn add_signer(
    ctx: Context<ModifySignerRegistry>,
    _registry_type: SignerRegistryType,
    _chain_id: u64,
    new_signer: Pubkey,
) -> Result<()> {
    let registry = &mut ctx.accounts.signer_registry;
    registry.add_signer(new_signer)?;

    emit!(registry.updated_event());
    msg!(
        "Added signer {} to {:?} registry (total signers: {})",
        new_signer,
        registry.registry_type,
        registry.signers.len()
    );

    Ok(())
}

/// Remove a signer from an existing registry
pub fn remove_signer(
    ctx: Context<ModifySignerRegistry>,
    _registry_type: SignerRegistryType,
    _chain_id: u64,
    signer_to_remove: Pubkey,
) -> Result<()> {
    let registry = &mut ctx.accounts.signer_registry;
    registry.remove_signer(&signer_to_remove)?;

    emit!(registry.updated_event());
    msg!(
        "Removed signer {} from {:?} registry (remaining signers: {})",
        signer_to_remove,
        registry.registry_type,
        registry.signers.len()
    );

    Ok(())
}

/// Update the required signature threshold for a registry
pub fn update_threshold(
    ctx: Context<ModifySignerRegistry>,
    _registry_type: SignerRegistryType,
    _chain_id: u64,
    new_threshold: u8,
) -> Result<()> {
    let registry = &mut ctx.accounts.signer_registry;
    let old_threshold = registry.required_signatures;
    registry.set_threshold(new_threshold)?;

    emit!(registry.updated_event());
    msg!(
        "Updated {:?} registry threshold from {} to {}",
        registry.registry_type,
        old_threshold,
        new_threshold
    );

    Ok(())
}

/// Enable or disable a signer registry
pub fn set_registry_enabled(
    ctx: Context<ModifySignerRegistry>,
    _registry_type: SignerRegistryType,
    _chain_id: u64,
    enabled: bool,
) -> Result<()> {
    let registry = &mut ctx.accounts.signer_registry;
    registry.set_enabled(enabled)?;

    emit!(registry.updated_event());
    msg!(
        "Set {:?} registry enabled status to: {}",
        registry.registry_type,
        enabled
    );

    Ok(())
}
