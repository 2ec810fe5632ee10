use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::GatewayError;
use crate::events::SystemStatusChanged;
use crate::state::MessageGateway;

pub fn handler(ctx: Context<InitializeGateway>, chain_id: u64) -> Result<()> {
    require!(chain_id > 0, GatewayError::InvalidChainId);

    let gateway = &mut ctx.accounts.gateway;

    // Set gateway configuration; the signer becomes the permanent authority
    gateway.authority = ctx.accounts.authority.key();
    gateway.chain_id = chain_id;
    gateway.system_enabled = true;
    gateway.bump = ctx.bumps.gateway;

    emit!(SystemStatusChanged {
        chain_id,
        enabled: true,
    });

    msg!(
        "Gateway initialized for chain {} with authority {}",
        chain_id,
        gateway.authority
    );
    Ok(())
}

#[derive(Accounts)]
#[instruction(chain_id: u64)]
pub struct InitializeGateway<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + MessageGateway::SIZE,
        seeds = [GATEWAY_SEED, chain_id.to_le_bytes().as_ref()],
        bump
    )]
    pub gateway: Account<'info, MessageGateway>,

    #[account(mut)]
    pub authority: Signer<'info>,

    // Only the program's upgrade authority may stand up gateways. Registries are
    // created through a gateway's authority, so this also decides who owns them.
    #[account(constraint = program.programdata_address()? == Some(program_data.key()))]
    pub program: Program<'info, crate::program::MessageGateway>,

    #[account(
        constraint = program_data.upgrade_authority_address == Some(authority.key())
            @ GatewayError::Unauthorized
    )]
    pub program_data: Account<'info, ProgramData>,

    pub system_program: Program<'info, System>,
}
