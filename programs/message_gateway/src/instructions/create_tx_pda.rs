use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::TxPdaCreated;
use crate::replay::{open_record, MarkerState};
use crate::state::{CounterPDA, CrossChainMessage, MessageGateway, MessageSignature, TxIdPDA};
use crate::utils::pda::{create_pda_account, write_account};

pub fn handler(
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

    // No signature checks here; TX2 pays for verification
    let marker = open_record(
        &state,
        &ctx.accounts.gateway,
        &ctx.accounts.counter_pda,
        &message,
        &signatures,
        ctx.bumps.tx_id_pda,
    )?;

    let source_bytes = source_chain_id.to_le_bytes();
    let tx_bytes = tx_id.to_le_bytes();
    let bump = [marker.bump];
    create_pda_account(
        &tx_pda,
        &ctx.accounts.relayer.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        8 + TxIdPDA::SIZE,
        &[TX_SEED, &source_bytes, &tx_bytes, &bump],
        ctx.program_id,
    )?;
    write_account(&tx_pda, &marker)?;

    let counter = &mut ctx.accounts.counter_pda;
    counter.advance(tx_id)?;
    msg!(
        "Counter for source_chain={} advanced to {}",
        source_chain_id,
        counter.highest_tx_id_seen
    );

    emit!(TxPdaCreated {
        tx_id,
        source_chain_id,
        message_hash: marker.message_hash,
    });

    msg!("TxId PDA created for tx_id={} source_chain={}", tx_id, source_chain_id);
    Ok(())
}

#[derive(Accounts)]
#[instruction(tx_id: u128, source_chain_id: u64)]
pub struct CreateTxPda<'info> {
    #[account(
        seeds = [GATEWAY_SEED, gateway.chain_id.to_le_bytes().as_ref()],
        bump = gateway.bump
    )]
    pub gateway: Account<'info, MessageGateway>,

    /// CHECK: exclusive creation happens in the handler, which reports AlreadyExists
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

    // Counter PDA must already exist (created by authority via initialize_counter)
    #[account(
        mut,
        seeds = [
            COUNTER_SEED,
            source_chain_id.to_le_bytes().as_ref()
        ],
        bump = counter_pda.bump
    )]
    pub counter_pda: Account<'info, CounterPDA>,

    #[account(mut)]
    pub relayer: Signer<'info>,

    pub system_program: Program<'info, System>,
}
