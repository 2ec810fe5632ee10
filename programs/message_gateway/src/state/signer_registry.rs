use anchor_lang::prelude::*;

use crate::constants::{MAX_SIGNERS_PER_REGISTRY, MIN_THRESHOLD};
use crate::errors::GatewayError;
use crate::events::SignerRegistryUpdated;
use crate::state::MessageDigest;
use crate::utils::pda::is_live_record;
use crate::utils::signature::SignatureVerifier;

/// Signer registry for managing authorized signers in three-layer security model
#[account]
#[derive(Debug)]
pub struct SignerRegistry {
    /// Type of registry (VIA, Chain, or Project)
    pub registry_type: SignerRegistryType,

    /// Authority that can modify this registry
    pub authority: Pubkey,

    /// List of authorized signer public keys
    pub signers: Vec<Pubkey>,

    /// Required number of signatures for validation
    pub required_signatures: u8,

    /// Chain ID this registry is associated with
    pub chain_id: u64,

    /// Whether this registry is active
    pub enabled: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl SignerRegistry {
    /// Calculate the space needed for this account
    /// Base size + (32 bytes per signer)
    pub fn space(max_signers: usize) -> usize {
        8 +                         // discriminator
        1 +                         // registry_type
        32 +                        // authority
        4 + (32 * max_signers) +    // signers vec
        1 +                         // required_signatures
        8 +                         // chain_id
        1 +                         // enabled
        1                           // bump
    }

    /// Build a freshly initialized, enabled registry
    pub fn new(
        registry_type: SignerRegistryType,
        chain_id: u64,
        authority: Pubkey,
        signers: Vec<Pubkey>,
        required_signatures: u8,
        bump: u8,
    ) -> Result<Self> {
        validate_signer_set(&signers)?;
        validate_config(registry_type, &signers, required_signatures, true)?;
        Ok(Self {
            registry_type,
            authority,
            signers,
            required_signatures,
            chain_id,
            enabled: true,
            bump,
        })
    }

    /// Read a registry that may not exist yet. Only an account we own with data
    /// counts as configured; anything else at the address is treated as absent.
    pub fn load_optional(account: &AccountInfo, program_id: &Pubkey) -> Result<Option<Self>> {
        if !is_live_record(account, program_id) {
            return Ok(None);
        }
        let data = account.try_borrow_data()?;
        Ok(Some(Self::try_deserialize(&mut &data[..])?))
    }

    /// Check if a signer is authorized
    pub fn is_signer(&self, signer: &Pubkey) -> bool {
        self.enabled && self.signers.contains(signer)
    }

    pub fn replace_signers(&mut self, signers: Vec<Pubkey>, required_signatures: u8) -> Result<()> {
        validate_signer_set(&signers)?;
        validate_config(self.registry_type, &signers, required_signatures, self.enabled)?;
        self.signers = signers;
        self.required_signatures = required_signatures;
        Ok(())
    }

    pub fn add_signer(&mut self, signer: Pubkey) -> Result<()> {
        require!(
            !self.signers.contains(&signer),
            GatewayError::DuplicateSigner
        );
        require!(
            self.signers.len() < MAX_SIGNERS_PER_REGISTRY,
            GatewayError::TooManySigners
        );
        self.signers.push(signer);
        Ok(())
    }

    pub fn remove_signer(&mut self, signer: &Pubkey) -> Result<()> {
        let position = self
            .signers
            .iter()
            .position(|s| s == signer)
            .ok_or(GatewayError::SignerNotFound)?;

        // The threshold has to stay reachable with the remaining signers
        let mut remaining = self.signers.clone();
        remaining.remove(position);
        validate_config(
            self.registry_type,
            &remaining,
            self.required_signatures,
            self.enabled,
        )?;
        self.signers = remaining;
        Ok(())
    }

    pub fn set_threshold(&mut self, required_signatures: u8) -> Result<()> {
        validate_config(self.registry_type, &self.signers, required_signatures, self.enabled)?;
        self.required_signatures = required_signatures;
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        validate_config(self.registry_type, &self.signers, self.required_signatures, enabled)?;
        self.enabled = enabled;
        Ok(())
    }

    /// Count distinct registered signers whose signature over `digest` verifies
    pub fn approvals<V: SignatureVerifier>(
        &self,
        signatures: &[MessageSignature],
        digest: &MessageDigest,
        verifier: &V,
    ) -> u8 {
        let mut counted: Vec<&Pubkey> = Vec::with_capacity(signatures.len());
        for sig in signatures {
            if !self.is_signer(&sig.signer) || counted.contains(&&sig.signer) {
                continue;
            }
            if verifier.verify(digest, &sig.signature, &sig.signer) {
                counted.push(&sig.signer);
            }
        }
        counted.len() as u8
    }

    pub fn is_satisfied_by(&self, approvals: u8) -> bool {
        approvals >= self.required_signatures
    }

    /// Whether the signature set meets this layer's threshold on its own
    pub fn authorize<V: SignatureVerifier>(
        &self,
        signatures: &[MessageSignature],
        digest: &MessageDigest,
        verifier: &V,
    ) -> bool {
        self.is_satisfied_by(self.approvals(signatures, digest, verifier))
    }

    pub fn updated_event(&self) -> SignerRegistryUpdated {
        SignerRegistryUpdated {
            registry_type: self.registry_type,
            chain_id: self.chain_id,
            signer_count: self.signers.len() as u8,
            required_signatures: self.required_signatures,
            enabled: self.enabled,
        }
    }
}

/// Non-empty, bounded, no repeated keys
pub fn validate_signer_set(signers: &[Pubkey]) -> Result<()> {
    require!(!signers.is_empty(), GatewayError::EmptySignerSet);
    require!(
        signers.len() <= MAX_SIGNERS_PER_REGISTRY,
        GatewayError::TooManySigners
    );
    for (i, signer) in signers.iter().enumerate() {
        require!(
            !signers[..i].contains(signer),
            GatewayError::DuplicateSigner
        );
    }
    Ok(())
}

/// Threshold never exceeds the signer count. Zero is only legal on a
/// disabled Project registry, VIA and Chain always need at least one.
fn validate_config(
    registry_type: SignerRegistryType,
    signers: &[Pubkey],
    required_signatures: u8,
    enabled: bool,
) -> Result<()> {
    require!(
        required_signatures as usize <= signers.len(),
        GatewayError::ThresholdTooHigh
    );
    if required_signatures < MIN_THRESHOLD {
        require!(
            registry_type == SignerRegistryType::Project && !enabled,
            GatewayError::InvalidThreshold
        );
    }
    Ok(())
}

/// Type of signer registry for three-layer security
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum SignerRegistryType {
    /// Via Labs core signers - highest authority level
    Via,
    /// Chain-specific validators - chain security level
    Chain,
    /// Project-specific signers - application level
    Project,
}

impl SignerRegistryType {
    /// Get discriminant value for PDA seeds
    pub fn discriminant(&self) -> u8 {
        match self {
            SignerRegistryType::Via => 0,
            SignerRegistryType::Chain => 1,
            SignerRegistryType::Project => 2,
        }
    }

    /// Convert from discriminant value
    pub fn from_discriminant(value: u8) -> Option<Self> {
        match value {
            0 => Some(SignerRegistryType::Via),
            1 => Some(SignerRegistryType::Chain),
            2 => Some(SignerRegistryType::Project),
            _ => None,
        }
    }
}

/// One signer's Ed25519 signature over a message digest
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct MessageSignature {
    /// Ed25519 signature (64 bytes)
    pub signature: [u8; 64],

    /// Signer public key - layer determined by registry membership
    pub signer: Pubkey,
}

/// Per-layer approval counts of a validated signature set
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub via_signatures: u8,
    pub chain_signatures: u8,
    pub project_signatures: u8,
    pub total_valid: u8,
}
