use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::GatewayError;
use crate::events::SendRequested;
use crate::state::MessageGateway;

/// Outbound request checks, kept apart from the handler so relayer tooling can reuse them
pub fn validate_send_request(recipient: &[u8], chain_data: &[u8]) -> Result<()> {
    require!(!recipient.is_empty(), GatewayError::EmptyRecipient);
    require!(!chain_data.is_empty(), GatewayError::EmptyChainData);
    require!(
        recipient.len() <= MAX_RECIPIENT_SIZE,
        GatewayError::RecipientTooLong
    );
    require!(
        chain_data.len() <= MAX_ON_CHAIN_DATA_SIZE,
        GatewayError::OnChainDataTooLarge
    );
    Ok(())
}

pub fn handler(
    ctx: Context<SendMessage>,
    tx_id: u128,
    recipient: Vec<u8>,
    dest_chain_id: u64,
    chain_data: Vec<u8>,
    confirmations: u16,
) -> Result<()> {
    ctx.accounts.gateway.ensure_enabled()?;
    validate_send_request(&recipient, &chain_data)?;

    // Nothing is stored: relayers pick the request up from the event
    emit!(SendRequested {
        tx_id,
        sender: ctx.accounts.sender.key().to_bytes(),
        recipient,
        dest_chain_id,
        chain_data,
        confirmations,
    });

    msg!(
        "Message sent: tx_id={}, source_chain={}, dest_chain={}",
        tx_id,
        ctx.accounts.gateway.chain_id,
        dest_chain_id
    );
    Ok(())
}

#[derive(Accounts)]
pub struct SendMessage<'info> {
    #[account(
        seeds = [GATEWAY_SEED, gateway.chain_id.to_le_bytes().as_ref()],
        bump = gateway.bump
    )]
    pub gateway: Account<'info, MessageGateway>,

    pub sender: Signer<'info>,
}
