use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use ed25519_dalek::{Signer as _, SigningKey};

use message_gateway::errors::GatewayError;
use message_gateway::replay::{finalize_record, open_record, Finalized, MarkerState, ReplayKey};
use message_gateway::constants::MAX_SIGNERS_PER_REGISTRY;
use message_gateway::state::{
    CounterPDA, CrossChainMessage, MessageDigest, MessageGateway, MessageSignature, SignerRegistry,
    SignerRegistryType, TxIdPDA,
};
use message_gateway::utils::signature::{new_ed25519_instruction, Ed25519Attestations, LayerRegistries};

const SOURCE: u64 = 43113;
const DEST: u64 = 9_999_999_999_999_999_999;
const AUTHORITY: Pubkey = Pubkey::new_from_array([42; 32]);

/// Markers keyed the way the program derives TxId PDA addresses, plus one
/// counter per source chain
#[derive(Default)]
struct Ledger {
    markers: BTreeMap<ReplayKey, TxIdPDA>,
    counters: BTreeMap<u64, CounterPDA>,
}

impl Ledger {
    fn state(&self, key: &ReplayKey) -> MarkerState {
        match self.markers.get(key) {
            Some(marker) => MarkerState::Pending(marker.clone()),
            None => MarkerState::Absent,
        }
    }

    fn create(&mut self, gateway: &MessageGateway, message: &CrossChainMessage, signatures: &[MessageSignature]) -> Result<()> {
        let key = ReplayKey::of(message);
        let state = self.state(&key);
        let counter = self
            .counters
            .entry(message.source_chain_id)
            .or_insert_with(|| CounterPDA {
                source_chain_id: message.source_chain_id,
                highest_tx_id_seen: 0,
                bump: 253,
            });
        let marker = open_record(&state, gateway, counter, message, signatures, 255)?;
        counter.advance(message.tx_id)?;
        self.markers.insert(key, marker);
        Ok(())
    }

    fn finalize(
        &mut self,
        gateway: &MessageGateway,
        message: &CrossChainMessage,
        signatures: &[MessageSignature],
        registries: &LayerRegistries,
    ) -> Result<Finalized> {
        let key = ReplayKey::of(message);
        // Relayer places one Ed25519 check over the digest ahead of TX2
        let digest = message.digest()?;
        let attestations = Ed25519Attestations::from_instructions(&[new_ed25519_instruction(signatures, &digest).unwrap()]);
        let done = finalize_record(&self.state(&key), gateway, message, signatures, registries, &attestations)?;
        self.markers.remove(&key);
        Ok(done)
    }

    fn is_pending(&self, message: &CrossChainMessage) -> bool {
        self.markers.contains_key(&ReplayKey::of(message))
    }
}

fn gateway() -> MessageGateway {
    MessageGateway {
        authority: AUTHORITY,
        chain_id: DEST,
        system_enabled: true,
        bump: 255,
    }
}

fn scenario_message() -> CrossChainMessage {
    CrossChainMessage {
        tx_id: 1,
        source_chain_id: SOURCE,
        dest_chain_id: DEST,
        sender: b"avax".to_vec(),
        recipient: vec![7u8; 32],
        on_chain_data: b"hello".to_vec(),
        off_chain_data: Vec::new(),
    }
}

fn key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

fn pubkey(key: &SigningKey) -> Pubkey {
    Pubkey::new_from_array(key.verifying_key().to_bytes())
}

fn sign(key: &SigningKey, digest: &MessageDigest) -> MessageSignature {
    MessageSignature {
        signature: key.sign(digest).to_bytes(),
        signer: pubkey(key),
    }
}

fn registry(layer: SignerRegistryType, keys: &[&SigningKey], threshold: u8) -> SignerRegistry {
    SignerRegistry::new(
        layer,
        SOURCE,
        AUTHORITY,
        keys.iter().map(|k| pubkey(k)).collect(),
        threshold,
        254,
    )
    .unwrap()
}

fn disabled_project() -> SignerRegistry {
    let mut project = registry(SignerRegistryType::Project, &[&key(90)], 1);
    project.set_enabled(false).unwrap();
    project
}

#[test]
fn scenario_a_one_via_one_chain_signer() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let (v, c) = (key(1), key(2));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c], 1);
    let project = disabled_project();
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: Some(&project),
    };
    let sigs = vec![sign(&v, &digest), sign(&c, &digest)];

    let mut ledger = Ledger::default();
    assert!(!ledger.is_pending(&msg));

    ledger.create(&gw, &msg, &sigs).unwrap();
    assert!(ledger.is_pending(&msg));

    let done = ledger.finalize(&gw, &msg, &sigs, &registries).unwrap();
    assert_eq!(done.message_hash, digest);
    assert_eq!(done.validation.via_signatures, 1);
    assert_eq!(done.validation.chain_signatures, 1);
    assert_eq!(done.validation.project_signatures, 0);
    assert!(!ledger.is_pending(&msg));

    // Closed marker: a second finalize has nothing to finish
    assert_eq!(
        ledger.finalize(&gw, &msg, &sigs, &registries).unwrap_err(),
        error!(GatewayError::RecordNotFound)
    );
}

#[test]
fn scenario_b_chain_threshold_unmet_then_retried() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let (v, c1, c2) = (key(1), key(2), key(3));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c1, &c2], 2);
    let project = disabled_project();
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: Some(&project),
    };

    let mut ledger = Ledger::default();
    let short = vec![sign(&v, &digest), sign(&c1, &digest)];
    ledger.create(&gw, &msg, &short).unwrap();

    assert_eq!(
        ledger.finalize(&gw, &msg, &short, &registries).unwrap_err(),
        error!(GatewayError::InsufficientChainSignatures)
    );
    assert!(ledger.is_pending(&msg));

    let mut full = short.clone();
    full.push(sign(&c2, &digest));
    let done = ledger.finalize(&gw, &msg, &full, &registries).unwrap();
    assert_eq!(done.validation.chain_signatures, 2);
    assert!(!ledger.is_pending(&msg));
}

#[test]
fn scenario_c_second_create_with_other_payload_is_rejected() {
    let gw = gateway();
    let original = scenario_message();
    let digest = original.digest().unwrap();
    let (v, c) = (key(1), key(2));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c], 1);
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: None,
    };
    let sigs = vec![sign(&v, &digest), sign(&c, &digest)];

    let mut ledger = Ledger::default();
    ledger.create(&gw, &original, &sigs).unwrap();

    let mut forged = original.clone();
    forged.on_chain_data = b"goodbye".to_vec();
    assert_eq!(
        ledger.create(&gw, &forged, &sigs).unwrap_err(),
        error!(GatewayError::AlreadyExists)
    );

    // Signatures over the forged digest still cannot finish the original marker
    let forged_digest = forged.digest().unwrap();
    let forged_sigs = vec![sign(&v, &forged_digest), sign(&c, &forged_digest)];
    assert_eq!(
        ledger.finalize(&gw, &forged, &forged_sigs, &registries).unwrap_err(),
        error!(GatewayError::DigestMismatch)
    );
    assert!(ledger.is_pending(&original));

    let done = ledger.finalize(&gw, &original, &sigs, &registries).unwrap();
    assert_eq!(done.message_hash, digest);
}

#[test]
fn finalize_before_create_is_record_not_found() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let (v, c) = (key(1), key(2));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c], 1);
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: None,
    };
    let sigs = vec![sign(&v, &digest), sign(&c, &digest)];

    let mut ledger = Ledger::default();
    assert_eq!(
        ledger.finalize(&gw, &msg, &sigs, &registries).unwrap_err(),
        error!(GatewayError::RecordNotFound)
    );
}

#[test]
fn markers_are_independent_per_source_chain() {
    let gw = gateway();
    let first = scenario_message();
    let mut second = first.clone();
    second.source_chain_id = SOURCE + 1;
    let sig = sign(&key(1), &first.digest().unwrap());

    let mut ledger = Ledger::default();
    ledger.create(&gw, &first, &[sig.clone()]).unwrap();
    ledger.create(&gw, &second, &[sig]).unwrap();
    assert!(ledger.is_pending(&first));
    assert!(ledger.is_pending(&second));
}

#[test]
fn enabled_project_layer_must_be_met() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let (v, c, p) = (key(1), key(2), key(3));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c], 1);
    let project = registry(SignerRegistryType::Project, &[&p], 1);
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: Some(&project),
    };

    let mut ledger = Ledger::default();
    let partial = vec![sign(&v, &digest), sign(&c, &digest)];
    ledger.create(&gw, &msg, &partial).unwrap();
    assert_eq!(
        ledger.finalize(&gw, &msg, &partial, &registries).unwrap_err(),
        error!(GatewayError::InsufficientProjectSignatures)
    );

    let mut full = partial.clone();
    full.push(sign(&p, &digest));
    let done = ledger.finalize(&gw, &msg, &full, &registries).unwrap();
    assert_eq!(done.validation.project_signatures, 1);
    assert_eq!(done.validation.total_valid, 3);
}

#[test]
fn processed_message_cannot_be_replayed() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let (v, c) = (key(1), key(2));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c], 1);
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: None,
    };
    let sigs = vec![sign(&v, &digest), sign(&c, &digest)];

    let mut ledger = Ledger::default();
    ledger.create(&gw, &msg, &sigs).unwrap();
    ledger.finalize(&gw, &msg, &sigs, &registries).unwrap();
    assert!(!ledger.is_pending(&msg));

    // Same key, same signatures: the counter has already moved past it
    assert_eq!(
        ledger.create(&gw, &msg, &sigs).unwrap_err(),
        error!(GatewayError::TxIdTooOld)
    );
    assert!(!ledger.is_pending(&msg));

    // Later ids from the same source still go through
    let mut next = msg.clone();
    next.tx_id = 2;
    let next_digest = next.digest().unwrap();
    let next_sigs = vec![sign(&v, &next_digest), sign(&c, &next_digest)];
    ledger.create(&gw, &next, &next_sigs).unwrap();
    ledger.finalize(&gw, &next, &next_sigs, &registries).unwrap();
}

#[test]
fn registries_from_another_authority_cannot_finalize() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let squatter = key(66);

    // Same layers and chain, configured by someone else's gateway
    let owner = Pubkey::new_unique();
    let via = SignerRegistry::new(SignerRegistryType::Via, SOURCE, owner, vec![pubkey(&squatter)], 1, 254).unwrap();
    let chain = SignerRegistry::new(SignerRegistryType::Chain, SOURCE, owner, vec![pubkey(&squatter)], 1, 254).unwrap();
    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: None,
    };
    let sigs = vec![sign(&squatter, &digest)];

    let mut ledger = Ledger::default();
    ledger.create(&gw, &msg, &sigs).unwrap();
    assert_eq!(
        ledger.finalize(&gw, &msg, &sigs, &registries).unwrap_err(),
        error!(GatewayError::Unauthorized)
    );
    assert!(ledger.is_pending(&msg));
}

#[test]
fn project_registry_at_its_address_is_enforced() {
    let gw = gateway();
    let msg = scenario_message();
    let digest = msg.digest().unwrap();
    let (v, c, p) = (key(1), key(2), key(3));

    let via = registry(SignerRegistryType::Via, &[&v], 1);
    let chain = registry(SignerRegistryType::Chain, &[&c], 1);

    let program_id = message_gateway::ID;
    let address = Pubkey::new_unique();
    let mut data = vec![0u8; SignerRegistry::space(MAX_SIGNERS_PER_REGISTRY)];
    registry(SignerRegistryType::Project, &[&p], 1)
        .try_serialize(&mut &mut data[..])
        .unwrap();
    let mut lamports = 1_000_000;
    let account = AccountInfo::new(&address, false, false, &mut lamports, &mut data, &program_id, false, 0);
    let project = SignerRegistry::load_optional(&account, &program_id).unwrap();
    assert!(project.is_some());

    let registries = LayerRegistries {
        via: &via,
        chain: &chain,
        project: project.as_ref(),
    };

    let mut ledger = Ledger::default();
    let partial = vec![sign(&v, &digest), sign(&c, &digest)];
    ledger.create(&gw, &msg, &partial).unwrap();
    assert_eq!(
        ledger.finalize(&gw, &msg, &partial, &registries).unwrap_err(),
        error!(GatewayError::InsufficientProjectSignatures)
    );

    let mut full = partial.clone();
    full.push(sign(&p, &digest));
    assert!(ledger.finalize(&gw, &msg, &full, &registries).is_ok());
}
