use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::GatewayError;
use crate::events::SystemStatusChanged;
use crate::state::MessageGateway;

pub fn set_system_enabled(ctx: Context<SetSystemEnabled>, enabled: bool) -> Result<()> {
    let gateway = &mut ctx.accounts.gateway;
    gateway.system_enabled = enabled;

    emit!(SystemStatusChanged {
        chain_id: gateway.chain_id,
        enabled,
    });

    msg!(
        "System {} for chain {}",
        if enabled { "enabled" } else { "disabled" },
        gateway.chain_id
    );
    Ok(())
}

#[derive(Accounts)]
pub struct SetSystemEnabled<'info> {
    #[account(
        mut,
        seeds = [GATEWAY_SEED, gateway.chain_id.to_le_bytes().as_ref()],
        bump = gateway.bump,
        constraint = gateway.is_authority(&authority.key()) @ GatewayError::Unauthorized
    )]
    pub gateway: Account<'info, MessageGateway>,

    pub authority: Signer<'info>,
}
