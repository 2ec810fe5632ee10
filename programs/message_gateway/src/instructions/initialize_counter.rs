use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::GatewayError;
use crate::events::CounterInitialized;
use crate::state::{CounterPDA, MessageGateway};

pub fn handler(ctx: Context<InitializeCounter>, source_chain_id: u64) -> Result<()> {
    // Zero is never a real chain
    require!(source_chain_id > 0, GatewayError::InvalidChainId);

    let counter = &mut ctx.accounts.counter_pda;
    counter.source_chain_id = source_chain_id;
    counter.highest_tx_id_seen = 0;
    counter.bump = ctx.bumps.counter_pda;

    emit!(CounterInitialized {
        source_chain_id,
        counter_pda: ctx.accounts.counter_pda.key(),
        authority: ctx.accounts.authority.key(),
        gateway: ctx.accounts.gateway.key(),
    });

    msg!(
        "Counter PDA initialized for source_chain_id={}, counter_pda={}, authority={}",
        source_chain_id,
        ctx.accounts.counter_pda.key(),
        ctx.accounts.authority.key()
    );

    Ok(())
}

#[derive(Accounts)]
#[instruction(source_chain_id: u64)]
pub struct InitializeCounter<'info> {
    // init, not init_if_needed: a second call must fail rather than reset
    #[account(
        init,
        payer = authority,
        space = 8 + CounterPDA::SIZE,
        seeds = [
            COUNTER_SEED,
            source_chain_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub counter_pda: Account<'info, CounterPDA>,

    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [GATEWAY_SEED, gateway.chain_id.to_le_bytes().as_ref()],
        bump = gateway.bump,
        constraint = gateway.is_authority(&authority.key()) @ GatewayError::Unauthorized,
        constraint = gateway.system_enabled @ GatewayError::SystemDisabled
    )]
    pub gateway: Account<'info, MessageGateway>,

    pub system_program: Program<'info, System>,
}
