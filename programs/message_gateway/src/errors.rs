use anchor_lang::prelude::*;

#[error_code]
pub enum GatewayError {
    #[msg("System is disabled")]
    SystemDisabled,

    #[msg("Unauthorized authority")]
    Unauthorized,

    #[msg("Invalid destination chain")]
    InvalidDestChain,

    #[msg("Invalid chain ID")]
    InvalidChainId,

    #[msg("Empty recipient address")]
    EmptyRecipient,

    #[msg("Empty chain data")]
    EmptyChainData,

    #[msg("Sender address too long")]
    SenderTooLong,

    #[msg("Recipient address too long")]
    RecipientTooLong,

    #[msg("On-chain data too large")]
    OnChainDataTooLarge,

    #[msg("Off-chain data too large")]
    OffChainDataTooLarge,

    #[msg("Too few signatures supplied")]
    TooFewSignatures,

    #[msg("Too many signatures supplied")]
    TooManySignatures,

    #[msg("Signature failed Ed25519 verification")]
    InvalidSignature,

    #[msg("Signer is not present in any active registry")]
    UnauthorizedSigner,

    #[msg("Signer appears more than once")]
    DuplicateSigner,

    #[msg("Insufficient VIA layer signatures")]
    InsufficientViaSignatures,

    #[msg("Insufficient chain layer signatures")]
    InsufficientChainSignatures,

    #[msg("Insufficient project layer signatures")]
    InsufficientProjectSignatures,

    #[msg("Record already exists")]
    AlreadyExists,

    #[msg("Transaction ID not above the highest seen for its source chain")]
    TxIdTooOld,

    #[msg("No pending record for this transaction")]
    RecordNotFound,

    #[msg("Recomputed message hash differs from the stored hash")]
    DigestMismatch,

    #[msg("Invalid message hash")]
    InvalidMessageHash,

    #[msg("Invalid signature threshold")]
    InvalidThreshold,

    #[msg("Threshold exceeds signer count")]
    ThresholdTooHigh,

    #[msg("Signer set is empty")]
    EmptySignerSet,

    #[msg("Too many signers for registry")]
    TooManySigners,

    #[msg("Signer not found in registry")]
    SignerNotFound,

    #[msg("Signer registry is disabled")]
    SignerRegistryDisabled,

    #[msg("Registry does not match the requested layer or chain")]
    RegistryMismatch,
}
