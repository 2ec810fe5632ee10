//! Two-phase replay protection.
//!
//! TX1 commits to a message by creating the TxId PDA for
//! `(source_chain_id, tx_id)`. Creation is exclusive, so it is the only replay
//! gate and costs no signature checks. The per-source-chain counter only
//! accepts increasing transaction ids, so a key whose marker TX2 already closed
//! cannot be opened again. TX2 recomputes the digest from the full
//! message, checks it against the one TX1 stored, runs three-layer signature
//! validation and closes the PDA. A failed TX2 leaves the PDA pending so the
//! relayer can retry it with corrected signatures.

use anchor_lang::prelude::*;

use crate::errors::GatewayError;
use crate::state::{
    CounterPDA, CrossChainMessage, MessageDigest, MessageGateway, MessageSignature, TxIdPDA,
    ValidationResult,
};
use crate::utils::pda::is_live_record;
use crate::utils::signature::{
    check_signature_bounds, validate_three_layer_signatures, LayerRegistries, SignatureVerifier,
};

/// Key of a replay marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplayKey {
    pub source_chain_id: u64,
    pub tx_id: u128,
}

impl ReplayKey {
    pub fn of(message: &CrossChainMessage) -> Self {
        Self {
            source_chain_id: message.source_chain_id,
            tx_id: message.tx_id,
        }
    }
}

/// Observed state of the marker for one key
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkerState {
    Absent,
    Pending(TxIdPDA),
}

impl MarkerState {
    /// Read the marker from its PDA. Anything not owned by us or without data is absent.
    pub fn load(account: &AccountInfo, program_id: &Pubkey) -> Result<Self> {
        if !is_live_record(account, program_id) {
            return Ok(MarkerState::Absent);
        }
        let data = account.try_borrow_data()?;
        let marker = TxIdPDA::try_deserialize(&mut &data[..])?;
        Ok(MarkerState::Pending(marker))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MarkerState::Pending(_))
    }
}

/// Outcome of a successful TX2
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finalized {
    pub message_hash: MessageDigest,
    pub validation: ValidationResult,
}

/// TX1: produce the marker to store for `message`. Fails with `AlreadyExists`
/// while a marker for the same key is pending, whatever the message contents,
/// and with `TxIdTooOld` once the source chain's counter has moved past it.
/// The caller advances `counter` after storing the marker.
pub fn open_record(
    state: &MarkerState,
    gateway: &MessageGateway,
    counter: &CounterPDA,
    message: &CrossChainMessage,
    signatures: &[MessageSignature],
    bump: u8,
) -> Result<TxIdPDA> {
    gateway.ensure_enabled()?;
    gateway.ensure_destination(message.dest_chain_id)?;

    if state.is_pending() {
        msg!(
            "TxId PDA already pending for tx_id={} source_chain={}",
            message.tx_id,
            message.source_chain_id
        );
        return err!(GatewayError::AlreadyExists);
    }
    counter.ensure_fresh(message.tx_id)?;

    check_signature_bounds(signatures)?;
    let message_hash = message.digest()?;

    Ok(TxIdPDA {
        tx_id: message.tx_id,
        source_chain_id: message.source_chain_id,
        message_hash,
        bump,
    })
}

/// TX2: everything that must hold before the marker may be closed
pub fn finalize_record<V: SignatureVerifier>(
    state: &MarkerState,
    gateway: &MessageGateway,
    message: &CrossChainMessage,
    signatures: &[MessageSignature],
    registries: &LayerRegistries,
    verifier: &V,
) -> Result<Finalized> {
    gateway.ensure_enabled()?;
    gateway.ensure_destination(message.dest_chain_id)?;

    let marker = match state {
        MarkerState::Pending(marker) => marker,
        MarkerState::Absent => {
            msg!(
                "No pending TxId PDA for tx_id={} source_chain={}",
                message.tx_id,
                message.source_chain_id
            );
            return err!(GatewayError::RecordNotFound);
        }
    };

    registries.ensure_configured(message.source_chain_id, &gateway.authority)?;

    let message_hash = message.digest()?;
    marker.ensure_matches(message.tx_id, message.source_chain_id, &message_hash)?;

    let validation =
        validate_three_layer_signatures(signatures, &message_hash, registries, verifier)?;

    Ok(Finalized {
        message_hash,
        validation,
    })
}
