use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

use crate::errors::GatewayError;
use crate::state::{CrossChainMessage, MessageDigest};

/// Canonical encoding of a message. Field order, prefix width and byte order
/// are fixed by the protocol and shared with every counterpart chain:
///
/// `tx_id (u128 LE) | source_chain_id (u64 LE) | dest_chain_id (u64 LE)`
/// followed by `sender`, `recipient`, `on_chain_data`, `off_chain_data`,
/// each as `u32 LE length | bytes`.
pub fn encode_message(message: &CrossChainMessage) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(
        16 + 8
            + 8
            + 4 * 4
            + message.sender.len()
            + message.recipient.len()
            + message.on_chain_data.len()
            + message.off_chain_data.len(),
    );

    encoded.extend_from_slice(&message.tx_id.to_le_bytes());
    encoded.extend_from_slice(&message.source_chain_id.to_le_bytes());
    encoded.extend_from_slice(&message.dest_chain_id.to_le_bytes());

    encode_length_prefixed(&mut encoded, &message.sender);
    encode_length_prefixed(&mut encoded, &message.recipient);
    encode_length_prefixed(&mut encoded, &message.on_chain_data);
    encode_length_prefixed(&mut encoded, &message.off_chain_data);

    encoded
}

/// Cross-chain compatible message hash generation.
/// Keccak-256 over the canonical encoding; this is the exact value off-chain
/// validators sign.
pub fn create_cross_chain_hash(message: &CrossChainMessage) -> Result<MessageDigest> {
    // Bounded sizes keep the u32 prefixes exact
    message.validate_sizes()?;

    let hash = keccak::hash(&encode_message(message)).to_bytes();

    msg!(
        "Generated hash for tx_id={}, source_chain={}, dest_chain={}, hash={:?}",
        message.tx_id,
        message.source_chain_id,
        message.dest_chain_id,
        hash
    );

    Ok(hash)
}

/// Encode data with length prefix (u32 length + data bytes)
fn encode_length_prefixed(buffer: &mut Vec<u8>, data: &[u8]) {
    buffer.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buffer.extend_from_slice(data);
}

/// Validate message hash format
pub fn validate_message_hash(hash: &MessageDigest) -> Result<()> {
    // Ensure hash is not all zeros (invalid hash)
    require!(
        !hash.iter().all(|&b| b == 0),
        GatewayError::InvalidMessageHash
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> CrossChainMessage {
        CrossChainMessage {
            tx_id: 1,
            source_chain_id: 43113,
            dest_chain_id: 9_999_999_999_999_999_999,
            sender: b"avax".to_vec(),
            recipient: vec![7u8; 32],
            on_chain_data: b"hello".to_vec(),
            off_chain_data: Vec::new(),
        }
    }

    #[test]
    fn encoding_layout() {
        let encoded = encode_message(&scenario_a());
        assert_eq!(encoded.len(), 16 + 8 + 8 + (4 + 4) + (4 + 32) + (4 + 5) + 4);
        assert_eq!(&encoded[..16], &1u128.to_le_bytes());
        assert_eq!(&encoded[16..24], &43113u64.to_le_bytes());
        assert_eq!(&encoded[24..32], &9_999_999_999_999_999_999u64.to_le_bytes());
        assert_eq!(&encoded[32..36], &[4, 0, 0, 0]);
        assert_eq!(&encoded[36..40], b"avax");
        assert_eq!(&encoded[40..44], &[32, 0, 0, 0]);
        assert_eq!(&encoded[44..76], &[7u8; 32]);
        assert_eq!(&encoded[76..80], &[5, 0, 0, 0]);
        assert_eq!(&encoded[80..85], b"hello");
        assert_eq!(&encoded[85..], &[0, 0, 0, 0]);
    }

    #[test]
    fn known_answer_digest() {
        let expected: MessageDigest = [
            0x50, 0x6e, 0xba, 0xb3, 0x34, 0x0d, 0x40, 0x2a, 0x66, 0x60, 0x18, 0x4d, 0xb5, 0xa0,
            0x5d, 0x12, 0xa5, 0xf1, 0xce, 0x53, 0x0d, 0x51, 0x42, 0x04, 0x3a, 0xa0, 0x4f, 0x91,
            0xaa, 0x53, 0x42, 0x21,
        ];
        assert_eq!(create_cross_chain_hash(&scenario_a()).unwrap(), expected);
    }

    #[test]
    fn deterministic() {
        let msg = scenario_a();
        assert_eq!(
            create_cross_chain_hash(&msg).unwrap(),
            create_cross_chain_hash(&msg.clone()).unwrap()
        );
    }

    #[test]
    fn every_field_changes_the_digest() {
        let base = scenario_a();
        let mut variants = vec![base.clone()];

        let mut m = base.clone();
        m.tx_id = 2;
        variants.push(m);
        let mut m = base.clone();
        m.source_chain_id = 43114;
        variants.push(m);
        let mut m = base.clone();
        m.dest_chain_id = 1;
        variants.push(m);
        let mut m = base.clone();
        m.sender[0] ^= 1;
        variants.push(m);
        let mut m = base.clone();
        m.recipient[31] ^= 1;
        variants.push(m);
        let mut m = base.clone();
        m.on_chain_data[4] ^= 1;
        variants.push(m);
        let mut m = base.clone();
        m.off_chain_data = vec![0];
        variants.push(m);
        // Same bytes, different field boundary
        let mut m = base.clone();
        m.sender = b"ava".to_vec();
        m.recipient.insert(0, b'x');
        variants.push(m);

        let digests: Vec<_> = variants
            .iter()
            .map(|m| create_cross_chain_hash(m).unwrap())
            .collect();
        for i in 0..digests.len() {
            for j in (i + 1)..digests.len() {
                assert_ne!(digests[i], digests[j], "variants {} and {} collide", i, j);
            }
        }
    }

    #[test]
    fn zero_hash_is_rejected() {
        assert_eq!(
            validate_message_hash(&[0u8; 32]).unwrap_err(),
            error!(GatewayError::InvalidMessageHash)
        );
        assert!(validate_message_hash(&[1u8; 32]).is_ok());
    }
}
