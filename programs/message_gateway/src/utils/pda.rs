use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

use crate::constants::*;
use crate::errors::GatewayError;
use crate::state::SignerRegistryType;

/// An account holds a live record when our program owns it and it carries data
pub fn is_live_record(account: &AccountInfo, program_id: &Pubkey) -> bool {
    account.owner == program_id && !account.data_is_empty()
}

/// Create a PDA owned by this program, failing with `AlreadyExists` when a
/// record is already there. Handles addresses pre-funded by a third party the
/// same way Anchor's `init` does (top up, allocate, assign).
pub fn create_pda_account<'info>(
    target: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system: &AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<()> {
    if is_live_record(target, program_id) || *target.owner != system_program::ID {
        msg!("Record {} already exists", target.key);
        return err!(GatewayError::AlreadyExists);
    }

    let required = Rent::get()?.minimum_balance(space);
    let current = target.lamports();

    if current == 0 {
        system_program::create_account(
            CpiContext::new_with_signer(
                system.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: target.clone(),
                },
                &[signer_seeds],
            ),
            required,
            space as u64,
            program_id,
        )?;
        return Ok(());
    }

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system.clone(),
                Transfer {
                    from: payer.clone(),
                    to: target.clone(),
                },
            ),
            top_up,
        )?;
    }
    system_program::allocate(
        CpiContext::new_with_signer(
            system.clone(),
            Allocate {
                account_to_allocate: target.clone(),
            },
            &[signer_seeds],
        ),
        space as u64,
    )?;
    system_program::assign(
        CpiContext::new_with_signer(
            system.clone(),
            Assign {
                account_to_assign: target.clone(),
            },
            &[signer_seeds],
        ),
        program_id,
    )?;
    Ok(())
}

/// Serialize a record (discriminator included) into a freshly created account
pub fn write_account<T: AccountSerialize>(target: &AccountInfo, record: &T) -> Result<()> {
    let mut data = target.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)?;
    Ok(())
}

/// Close a record and return its rent to `destination`
pub fn close_account<'info>(target: &AccountInfo<'info>, destination: &AccountInfo<'info>) -> Result<()> {
    let reclaimed = target.lamports();
    let credited = destination
        .lamports()
        .checked_add(reclaimed)
        .ok_or(ProgramError::ArithmeticOverflow)?;

    **destination.try_borrow_mut_lamports()? = credited;
    **target.try_borrow_mut_lamports()? = 0;

    // Same teardown as Anchor's `close`: a later create of this address in the
    // same transaction sees an empty system account
    target.assign(&system_program::ID);
    target.realloc(0, false)?;
    Ok(())
}

pub fn gateway_address(chain_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GATEWAY_SEED, &chain_id.to_le_bytes()], &crate::ID)
}

pub fn signer_registry_address(registry_type: SignerRegistryType, chain_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            SIGNER_REGISTRY_SEED,
            &registry_type.discriminant().to_le_bytes(),
            &chain_id.to_le_bytes(),
        ],
        &crate::ID,
    )
}

pub fn tx_address(source_chain_id: u64, tx_id: u128) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[TX_SEED, &source_chain_id.to_le_bytes(), &tx_id.to_le_bytes()],
        &crate::ID,
    )
}

pub fn counter_address(source_chain_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COUNTER_SEED, &source_chain_id.to_le_bytes()], &crate::ID)
}
