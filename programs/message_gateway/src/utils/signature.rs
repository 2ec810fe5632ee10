use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    ed25519_program,
    instruction::Instruction,
    sysvar::instructions::{load_current_index_checked, load_instruction_at_checked},
};

use crate::{
    constants::{
        ED25519_PUBKEY_SIZE, ED25519_SIGNATURE_SIZE, MAX_SIGNATURES_PER_MESSAGE,
        MIN_SIGNATURES_REQUIRED,
    },
    errors::GatewayError,
    state::{MessageDigest, MessageSignature, SignerRegistry, ValidationResult},
    utils::hash::validate_message_hash,
};

/// Ed25519 native program data layout
const SIGNATURE_OFFSETS_START: usize = 2;
const SIGNATURE_OFFSETS_SERIALIZED_SIZE: usize = 14;

/// Offset value meaning "data lives in this same instruction"
const CURRENT_INSTRUCTION: u16 = u16::MAX;

/// Answers whether `signature` is a valid Ed25519 signature of exactly `digest` by `signer`.
pub trait SignatureVerifier {
    fn verify(&self, digest: &MessageDigest, signature: &[u8; 64], signer: &Pubkey) -> bool;
}

/// One (key, signature, message) triple checked by the Ed25519 program
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ed25519Attestation {
    pub signer: Pubkey,
    pub signature: [u8; 64],
    pub message: Vec<u8>,
}

/// Signatures the runtime already verified through Ed25519 precompile
/// instructions placed ahead of ours in the same transaction.
///
/// A transaction whose precompile check fails never executes, so every entry
/// here is cryptographically valid. Verification is then a lookup.
#[derive(Clone, Debug, Default)]
pub struct Ed25519Attestations {
    entries: Vec<Ed25519Attestation>,
}

impl Ed25519Attestations {
    /// Collect attestations from every instruction before the current one
    pub fn load(ix_sysvar_account: &AccountInfo) -> Result<Self> {
        let current_index = load_current_index_checked(ix_sysvar_account)?;

        let mut instructions = Vec::with_capacity(current_index as usize);
        for index in 0..current_index {
            instructions.push(load_instruction_at_checked(index as usize, ix_sysvar_account)?);
        }

        let attestations = Self::from_instructions(&instructions);
        msg!(
            "Loaded {} Ed25519 attestations from {} preceding instructions",
            attestations.len(),
            current_index
        );
        Ok(attestations)
    }

    pub fn from_instructions<'a, I>(instructions: I) -> Self
    where
        I: IntoIterator<Item = &'a Instruction>,
    {
        let mut entries = Vec::new();
        for (index, ix) in instructions.into_iter().enumerate() {
            if ix.program_id != ed25519_program::ID {
                continue;
            }
            match parse_ed25519_instruction(&ix.data) {
                Some(found) => entries.extend(found),
                None => msg!("Skipping malformed Ed25519 instruction at index {}", index),
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SignatureVerifier for Ed25519Attestations {
    fn verify(&self, digest: &MessageDigest, signature: &[u8; 64], signer: &Pubkey) -> bool {
        // Exact 32-byte message match, no prefix or truncated digests
        self.entries.iter().any(|entry| {
            entry.signer == *signer
                && entry.signature == *signature
                && entry.message.as_slice() == digest.as_slice()
        })
    }
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Parse Ed25519 instruction data into the triples it verifies.
///
/// Layout: `[count u8][padding u8]`, then `count` offset records of seven
/// u16 LE values (signature offset, signature ix index, pubkey offset, pubkey
/// ix index, message offset, message size, message ix index). Records pointing
/// into other instructions are skipped.
pub fn parse_ed25519_instruction(data: &[u8]) -> Option<Vec<Ed25519Attestation>> {
    let count = *data.first()? as usize;
    let mut attestations = Vec::with_capacity(count);

    for i in 0..count {
        let base = SIGNATURE_OFFSETS_START + i * SIGNATURE_OFFSETS_SERIALIZED_SIZE;
        let field = |n: usize| read_u16(data, base + 2 * n);

        let signature_offset = field(0)? as usize;
        let signature_ix = field(1)?;
        let pubkey_offset = field(2)? as usize;
        let pubkey_ix = field(3)?;
        let message_offset = field(4)? as usize;
        let message_size = field(5)? as usize;
        let message_ix = field(6)?;

        if signature_ix != CURRENT_INSTRUCTION
            || pubkey_ix != CURRENT_INSTRUCTION
            || message_ix != CURRENT_INSTRUCTION
        {
            msg!("Ignoring Ed25519 entry {} that references another instruction", i);
            continue;
        }

        let signature: [u8; 64] = data
            .get(signature_offset..signature_offset + ED25519_SIGNATURE_SIZE)?
            .try_into()
            .ok()?;
        let signer = Pubkey::try_from(data.get(pubkey_offset..pubkey_offset + ED25519_PUBKEY_SIZE)?).ok()?;
        let message = data.get(message_offset..message_offset + message_size)?.to_vec();

        attestations.push(Ed25519Attestation {
            signer,
            signature,
            message,
        });
    }

    Some(attestations)
}

/// Build Ed25519 program instruction data checking every signature against
/// one shared message. Used by relayers to assemble TX2.
///
/// `None` when the entry count does not fit the one-byte header or an offset
/// would not fit its u16 field.
pub fn encode_ed25519_instruction_data(signatures: &[MessageSignature], message: &[u8]) -> Option<Vec<u8>> {
    let count = u8::try_from(signatures.len()).ok()?;
    let entry_size = ED25519_PUBKEY_SIZE + ED25519_SIGNATURE_SIZE;
    let data_start = SIGNATURE_OFFSETS_START + signatures.len() * SIGNATURE_OFFSETS_SERIALIZED_SIZE;
    let message_offset = data_start + signatures.len() * entry_size;
    let total_len = message_offset + message.len();
    if total_len > u16::MAX as usize {
        return None;
    }

    let mut data = Vec::with_capacity(total_len);
    data.push(count);
    data.push(0);

    // Every offset is below total_len, so the casts are exact
    for i in 0..signatures.len() {
        let pubkey_offset = data_start + i * entry_size;
        let signature_offset = pubkey_offset + ED25519_PUBKEY_SIZE;
        for value in [
            signature_offset as u16,
            CURRENT_INSTRUCTION,
            pubkey_offset as u16,
            CURRENT_INSTRUCTION,
            message_offset as u16,
            message.len() as u16,
            CURRENT_INSTRUCTION,
        ] {
            data.extend_from_slice(&value.to_le_bytes());
        }
    }

    for sig in signatures {
        data.extend_from_slice(sig.signer.as_ref());
        data.extend_from_slice(&sig.signature);
    }
    data.extend_from_slice(message);
    Some(data)
}

pub fn new_ed25519_instruction(signatures: &[MessageSignature], message: &[u8]) -> Option<Instruction> {
    Some(Instruction {
        program_id: ed25519_program::ID,
        accounts: vec![],
        data: encode_ed25519_instruction_data(signatures, message)?,
    })
}

/// Registries consulted for one message, all keyed by its source chain
pub struct LayerRegistries<'a> {
    pub via: &'a SignerRegistry,
    pub chain: &'a SignerRegistry,
    pub project: Option<&'a SignerRegistry>,
}

impl<'a> LayerRegistries<'a> {
    /// Each registry must be the right layer for `chain_id` and be configured
    /// by `authority`. Anyone can stand up a gateway of their own and fill
    /// unclaimed registry addresses, so the seed address alone proves nothing.
    pub fn ensure_configured(&self, chain_id: u64, authority: &Pubkey) -> Result<()> {
        use crate::state::SignerRegistryType::*;

        let mut expected = vec![(self.via, Via), (self.chain, Chain)];
        if let Some(project) = self.project {
            expected.push((project, Project));
        }
        for (registry, layer) in expected {
            require!(
                registry.registry_type == layer && registry.chain_id == chain_id,
                GatewayError::RegistryMismatch
            );
            if registry.authority != *authority {
                msg!(
                    "{:?} registry for chain {} belongs to {}, not the gateway authority",
                    layer,
                    chain_id,
                    registry.authority
                );
                return err!(GatewayError::Unauthorized);
            }
        }
        Ok(())
    }

    /// Project layer counts only when supplied and enabled
    fn active_project(&self) -> Option<&'a SignerRegistry> {
        self.project.filter(|registry| registry.enabled)
    }
}

/// Signature-set size must sit within protocol bounds
pub fn check_signature_bounds(signatures: &[MessageSignature]) -> Result<()> {
    require!(
        signatures.len() >= MIN_SIGNATURES_REQUIRED,
        GatewayError::TooFewSignatures
    );
    require!(
        signatures.len() <= MAX_SIGNATURES_PER_MESSAGE,
        GatewayError::TooManySignatures
    );
    Ok(())
}

/// Validate three-layer signatures according to Via Labs security model.
///
/// Every submitted signature must verify and belong to at least one active
/// layer. Layer counts come from `SignerRegistry::approvals`, so a signature
/// counts toward each layer whose registry holds its signer, and each layer's
/// threshold is checked independently.
pub fn validate_three_layer_signatures<V: SignatureVerifier>(
    signatures: &[MessageSignature],
    message_hash: &MessageDigest,
    registries: &LayerRegistries,
    verifier: &V,
) -> Result<ValidationResult> {
    check_signature_bounds(signatures)?;
    validate_message_hash(message_hash)?;

    require!(registries.via.enabled, GatewayError::SignerRegistryDisabled);
    require!(registries.chain.enabled, GatewayError::SignerRegistryDisabled);
    let project_registry = registries.active_project();

    let mut total_valid: u8 = 0;
    let mut used_signers: Vec<&Pubkey> = Vec::with_capacity(signatures.len());

    for signature in signatures {
        // Prevent signer reuse
        require!(
            !used_signers.contains(&&signature.signer),
            GatewayError::DuplicateSigner
        );
        used_signers.push(&signature.signer);

        if !verifier.verify(message_hash, &signature.signature, &signature.signer) {
            msg!("Invalid Ed25519 signature from signer: {}", signature.signer);
            return err!(GatewayError::InvalidSignature);
        }

        // Implicit layer detection: check membership across all registries
        let is_via_signer = registries.via.is_signer(&signature.signer);
        let is_chain_signer = registries.chain.is_signer(&signature.signer);
        let is_project_signer = project_registry
            .map(|registry| registry.is_signer(&signature.signer))
            .unwrap_or(false);

        if !is_via_signer && !is_chain_signer && !is_project_signer {
            msg!(
                "Unauthorized signer {} - not found in any registry",
                signature.signer
            );
            return err!(GatewayError::UnauthorizedSigner);
        }

        total_valid += 1;

        msg!(
            "Valid signature from {} (VIA: {}, Chain: {}, Project: {})",
            signature.signer,
            is_via_signer,
            is_chain_signer,
            is_project_signer
        );
    }

    let validation_result = ValidationResult {
        via_signatures: registries.via.approvals(signatures, message_hash, verifier),
        chain_signatures: registries.chain.approvals(signatures, message_hash, verifier),
        project_signatures: project_registry
            .map(|registry| registry.approvals(signatures, message_hash, verifier))
            .unwrap_or(0),
        total_valid,
    };

    validate_signature_thresholds(&validation_result, registries.via, registries.chain, project_registry)?;

    msg!(
        "Signature validation completed: VIA={}, Chain={}, Project={}, Total={}",
        validation_result.via_signatures,
        validation_result.chain_signatures,
        validation_result.project_signatures,
        validation_result.total_valid
    );

    Ok(validation_result)
}

/// Validate that signature thresholds are met for all required layers
fn validate_signature_thresholds(
    validation_result: &ValidationResult,
    via_registry: &SignerRegistry,
    chain_registry: &SignerRegistry,
    project_registry: Option<&SignerRegistry>,
) -> Result<()> {
    require!(
        via_registry.is_satisfied_by(validation_result.via_signatures),
        GatewayError::InsufficientViaSignatures
    );

    require!(
        chain_registry.is_satisfied_by(validation_result.chain_signatures),
        GatewayError::InsufficientChainSignatures
    );

    if let Some(proj_registry) = project_registry {
        require!(
            proj_registry.is_satisfied_by(validation_result.project_signatures),
            GatewayError::InsufficientProjectSignatures
        );
    }

    Ok(())
}
