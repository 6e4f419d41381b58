//! Integration tests for the bearer token contract.
//!
//! These exercise full token lifecycles across module boundaries: issue,
//! transfer chains, rejected spend attempts of every flavor, and
//! dual-custody redemption. The cast is the classic one — Bob holds,
//! Alice receives, the Issuer giveth and (with cooperation) taketh away.

use sigil_contracts::bearer_token::{redeem, refresh, transfer, TokenError, TokenRecord};
use sigil_contracts::issuance::issue;
use sigil_protocol::crypto::hash::KeyHash;
use sigil_protocol::crypto::keys::{SigilKeypair, SigilSignature};
use sigil_protocol::transaction::digest::{spend_digest, spend_digest_all, SigningScope};
use sigil_protocol::transaction::outputs::TxOutput;

/// The designated state-continuation index used throughout these tests.
const STATE_INDEX: usize = 0;

/// Deterministic cast so failures reproduce byte-for-byte.
fn cast() -> (SigilKeypair, SigilKeypair, SigilKeypair) {
    let bob = SigilKeypair::from_seed(&[0xB0; 32]);
    let alice = SigilKeypair::from_seed(&[0xA1; 32]);
    let issuer = SigilKeypair::from_seed(&[0x15; 32]);
    (bob, alice, issuer)
}

fn hash_of(kp: &SigilKeypair) -> KeyHash {
    KeyHash::of(&kp.public_key())
}

/// Helper: builds a correctly formed transfer — the successor's state
/// output at [`STATE_INDEX`], any change after it — and signs the spend
/// digest with `signer`.
fn build_transfer(
    record: &TokenRecord,
    locked_value: u64,
    signer: &SigilKeypair,
    next_owner: KeyHash,
    change: &[(Vec<u8>, u64)],
) -> (Vec<TxOutput>, SigilSignature) {
    let successor = record.apply_transfer(next_owner);
    let mut outputs = vec![successor.expected_output(locked_value)];
    for (lock, value) in change {
        outputs.push(TxOutput::new(*value, lock.clone()));
    }

    let digest = spend_digest(
        &record.state_bytes(),
        locked_value,
        &outputs,
        SigningScope::Single(STATE_INDEX),
    )
    .unwrap();

    (outputs, signer.sign(&digest))
}

/// Helper: signs the redemption digest (All scope) for both parties.
fn sign_redemption(
    record: &TokenRecord,
    locked_value: u64,
    outputs: &[TxOutput],
    owner: &SigilKeypair,
    redeemer: &SigilKeypair,
) -> (SigilSignature, SigilSignature) {
    let digest = spend_digest_all(&record.state_bytes(), locked_value, outputs);
    (owner.sign(&digest), redeemer.sign(&digest))
}

// ---------------------------------------------------------------------------
// Lifecycle Tests
// ---------------------------------------------------------------------------

#[test]
fn bob_transfers_to_alice() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, b"ticket #7".to_vec(), 100);

    let (outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&alice), &[]);

    let successor = transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    )
    .unwrap();

    assert_eq!(successor.owner_hash, hash_of(&alice));
    assert_eq!(successor.redemption_authority_hash, hash_of(&issuer));
    assert!(successor.is_transferrable);
    assert_eq!(successor.payload, b"ticket #7");
}

#[test]
fn full_lifecycle_issue_transfer_redeem() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);

    // 1. Bob -> Alice.
    let (outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&alice), &[]);
    let r1 = transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    )
    .unwrap();

    // 2. Alice + Issuer retire the token. The freed value goes wherever
    //    the retiring transaction says — here, back to Alice.
    let retire_outputs = vec![TxOutput::new(100, b"alice spending lock".to_vec())];
    let (owner_sig, redeemer_sig) = sign_redemption(&r1, 100, &retire_outputs, &alice, &issuer);

    // Redemption returns no successor — the lifecycle ends here, and with
    // no record there is nothing left to transfer or redeem against.
    redeem(
        &r1,
        100,
        &owner_sig,
        &alice.public_key(),
        &redeemer_sig,
        &issuer.public_key(),
        &retire_outputs,
    )
    .unwrap();
}

#[test]
fn sequential_transfers_chain() {
    let (bob, alice, issuer) = cast();
    let carol = SigilKeypair::from_seed(&[0xCA; 32]);
    let token = issue(hash_of(&bob), hash_of(&issuer), true, b"deed".to_vec(), 7_500);

    let mut record = token.record.clone();
    let hops: [(&SigilKeypair, &SigilKeypair); 3] =
        [(&bob, &alice), (&alice, &carol), (&carol, &bob)];

    for (from, to) in hops {
        let (outputs, sig) = build_transfer(&record, 7_500, from, hash_of(to), &[]);
        record = transfer(
            &record,
            7_500,
            &sig,
            &from.public_key(),
            hash_of(to),
            &outputs,
            STATE_INDEX,
        )
        .unwrap();
        assert_eq!(record.owner_hash, hash_of(to));
    }

    // Everything but the owner survived three hops untouched.
    assert_eq!(record.payload, b"deed");
    assert_eq!(record.redemption_authority_hash, hash_of(&issuer));
}

#[test]
fn refresh_keeps_the_owner() {
    let (bob, _, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 300);

    let (outputs, sig) = build_transfer(&token.record, 300, &bob, hash_of(&bob), &[]);
    let successor = refresh(
        &token.record,
        300,
        &sig,
        &bob.public_key(),
        &outputs,
        STATE_INDEX,
    )
    .unwrap();

    assert_eq!(successor, token.record);
}

#[test]
fn change_outputs_do_not_affect_the_verdict() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);

    // Bob signs with no change planned...
    let (mut outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&alice), &[]);

    // ...and change gets appended afterwards. The single-output signing
    // scope means the signature still stands.
    outputs.push(TxOutput::new(9_900, b"bob change lock".to_vec()));
    outputs.push(TxOutput::new(50, b"fee sweep".to_vec()));

    assert!(transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    )
    .is_ok());
}

// ---------------------------------------------------------------------------
// Ownership & Signature Gates
// ---------------------------------------------------------------------------

#[test]
fn transfer_by_non_owner_rejected() {
    let (bob, alice, issuer) = cast();
    let carol = SigilKeypair::from_seed(&[0xCA; 32]);
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);

    // Carol attempts Bob's transfer with her own key and signature.
    let (outputs, sig) = build_transfer(&token.record, 100, &carol, hash_of(&alice), &[]);

    match transfer(
        &token.record,
        100,
        &sig,
        &carol.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    ) {
        Err(TokenError::OwnerMismatch { .. }) => {}
        other => panic!("expected OwnerMismatch, got {:?}", other),
    }
}

#[test]
fn signature_over_a_different_transaction_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);

    // Bob signs a transfer to Alice...
    let (_, sig_for_alice) = build_transfer(&token.record, 100, &bob, hash_of(&alice), &[]);

    // ...but the candidate transaction actually sends the token to Carol.
    let carol = SigilKeypair::from_seed(&[0xCA; 32]);
    let (outputs_to_carol, _) = build_transfer(&token.record, 100, &bob, hash_of(&carol), &[]);

    match transfer(
        &token.record,
        100,
        &sig_for_alice,
        &bob.public_key(),
        hash_of(&carol),
        &outputs_to_carol,
        STATE_INDEX,
    ) {
        Err(TokenError::InvalidSignature) => {}
        other => panic!("expected InvalidSignature, got {:?}", other),
    }
}

#[test]
fn signature_not_replayable_against_another_record() {
    let (bob, alice, issuer) = cast();

    // Two tokens, same owner, same value — only the payload differs.
    let t1 = issue(hash_of(&bob), hash_of(&issuer), true, b"unit 1".to_vec(), 100);
    let t2 = issue(hash_of(&bob), hash_of(&issuer), true, b"unit 2".to_vec(), 100);

    let (outputs1, sig1) = build_transfer(&t1.record, 100, &bob, hash_of(&alice), &[]);
    let (outputs2, _) = build_transfer(&t2.record, 100, &bob, hash_of(&alice), &[]);

    // The t1 signature must be worthless for spending t2 — the digest
    // binds the spent record's state.
    match transfer(
        &t2.record,
        100,
        &sig1,
        &bob.public_key(),
        hash_of(&alice),
        &outputs2,
        STATE_INDEX,
    ) {
        Err(TokenError::InvalidSignature) => {}
        other => panic!("expected InvalidSignature, got {:?}", other),
    }

    // Sanity: it still works where it belongs.
    assert!(transfer(
        &t1.record,
        100,
        &sig1,
        &bob.public_key(),
        hash_of(&alice),
        &outputs1,
        STATE_INDEX,
    )
    .is_ok());
}

// ---------------------------------------------------------------------------
// Value & Output Commitment
// ---------------------------------------------------------------------------

#[test]
fn locked_value_must_be_preserved() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);

    // A candidate that tries to skim one unit into change. Bob signs the
    // skimming output set honestly, so the signature itself verifies —
    // the output commitment is what catches the theft.
    let successor = token.record.apply_transfer(hash_of(&alice));
    let outputs = vec![
        TxOutput::new(99, successor.state_bytes()),
        TxOutput::new(1, b"skim".to_vec()),
    ];
    let digest = spend_digest(
        &token.record.state_bytes(),
        100,
        &outputs,
        SigningScope::Single(STATE_INDEX),
    )
    .unwrap();
    let sig = bob.sign(&digest);

    match transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    ) {
        Err(TokenError::OutputCommitmentMismatch { state_index: 0 }) => {}
        other => panic!("expected OutputCommitmentMismatch, got {:?}", other),
    }
}

#[test]
fn tampered_successor_state_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, b"genuine".to_vec(), 100);

    // The declared continuation output swaps the payload. Signed honestly
    // over the tampered output, so only the commitment check can object.
    let mut forged = token.record.apply_transfer(hash_of(&alice));
    forged.payload = b"forged!".to_vec();
    let outputs = vec![TxOutput::new(100, forged.state_bytes())];

    let digest = spend_digest(
        &token.record.state_bytes(),
        100,
        &outputs,
        SigningScope::Single(STATE_INDEX),
    )
    .unwrap();
    let sig = bob.sign(&digest);

    match transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    ) {
        Err(TokenError::OutputCommitmentMismatch { .. }) => {}
        other => panic!("expected OutputCommitmentMismatch, got {:?}", other),
    }
}

#[test]
fn missing_state_output_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);

    // No outputs at all — nothing at the continuation index.
    let digest_input = spend_digest_all(&token.record.state_bytes(), 100, &[]);
    let sig = bob.sign(&digest_input); // any sig; the output set fails first

    match transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &[],
        STATE_INDEX,
    ) {
        Err(TokenError::OutputCommitmentMismatch { state_index: 0 }) => {}
        other => panic!("expected OutputCommitmentMismatch, got {:?}", other),
    }
}

#[test]
fn everything_but_the_owner_is_preserved() {
    let (bob, alice, issuer) = cast();
    let token = issue(
        hash_of(&bob),
        hash_of(&issuer),
        true,
        vec![0x00, 0xFF, 0x10, 0x20],
        42,
    );

    let (outputs, sig) = build_transfer(&token.record, 42, &bob, hash_of(&alice), &[]);
    let successor = transfer(
        &token.record,
        42,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    )
    .unwrap();

    assert_eq!(successor.version, token.record.version);
    assert_eq!(
        successor.redemption_authority_hash,
        token.record.redemption_authority_hash
    );
    assert_eq!(successor.is_transferrable, token.record.is_transferrable);
    assert_eq!(successor.payload, token.record.payload);
    // And the accepted output locked exactly the original value.
    assert_eq!(outputs[STATE_INDEX].value, 42);
}

// ---------------------------------------------------------------------------
// Non-transferability
// ---------------------------------------------------------------------------

#[test]
fn non_transferable_to_third_party_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), false, vec![], 100);

    let (outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&alice), &[]);

    match transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&alice),
        &outputs,
        STATE_INDEX,
    ) {
        Err(TokenError::TransferNotAllowed { .. }) => {}
        other => panic!("expected TransferNotAllowed, got {:?}", other),
    }
}

#[test]
fn non_transferable_back_to_issuer_accepted() {
    let (bob, _, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), false, vec![], 100);

    let (outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&issuer), &[]);

    let successor = transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        hash_of(&issuer),
        &outputs,
        STATE_INDEX,
    )
    .unwrap();

    assert_eq!(successor.owner_hash, hash_of(&issuer));
    assert!(!successor.is_transferrable);
}

#[test]
fn non_transferable_refresh_rejected() {
    // A refresh is a transfer to the current owner, and a non-transferable
    // token's only legal destination is the authority. Surrender or stay put.
    let (bob, _, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), false, vec![], 100);

    let (outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&bob), &[]);

    match refresh(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        &outputs,
        STATE_INDEX,
    ) {
        Err(TokenError::TransferNotAllowed { .. }) => {}
        other => panic!("expected TransferNotAllowed, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Redemption
// ---------------------------------------------------------------------------

#[test]
fn redemption_requires_both_parties() {
    let (bob, _, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 500);
    let outputs = vec![TxOutput::new(500, b"back to bob".to_vec())];

    let (owner_sig, redeemer_sig) = sign_redemption(&token.record, 500, &outputs, &bob, &issuer);

    assert!(redeem(
        &token.record,
        500,
        &owner_sig,
        &bob.public_key(),
        &redeemer_sig,
        &issuer.public_key(),
        &outputs,
    )
    .is_ok());
}

#[test]
fn redeem_with_wrong_redeemer_key_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 500);
    let outputs = vec![TxOutput::new(500, b"out".to_vec())];

    // Alice impersonates the issuer: her own key, her own signature.
    let (owner_sig, fake_redeemer_sig) =
        sign_redemption(&token.record, 500, &outputs, &bob, &alice);

    match redeem(
        &token.record,
        500,
        &owner_sig,
        &bob.public_key(),
        &fake_redeemer_sig,
        &alice.public_key(),
        &outputs,
    ) {
        Err(TokenError::RedeemerMismatch { .. }) => {}
        other => panic!("expected RedeemerMismatch, got {:?}", other),
    }
}

#[test]
fn redeem_with_corrupted_redeemer_signature_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 500);
    let outputs = vec![TxOutput::new(500, b"out".to_vec())];

    // Right redeemer key, but the signature came from Alice's pen.
    let (owner_sig, alice_sig) = sign_redemption(&token.record, 500, &outputs, &bob, &alice);

    match redeem(
        &token.record,
        500,
        &owner_sig,
        &bob.public_key(),
        &alice_sig,
        &issuer.public_key(),
        &outputs,
    ) {
        Err(TokenError::InvalidRedeemerSignature) => {}
        other => panic!("expected InvalidRedeemerSignature, got {:?}", other),
    }
}

#[test]
fn redeem_with_wrong_owner_key_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 500);
    let outputs = vec![TxOutput::new(500, b"out".to_vec())];

    // Alice presents herself as owner of Bob's token.
    let (alice_sig, redeemer_sig) = sign_redemption(&token.record, 500, &outputs, &alice, &issuer);

    match redeem(
        &token.record,
        500,
        &alice_sig,
        &alice.public_key(),
        &redeemer_sig,
        &issuer.public_key(),
        &outputs,
    ) {
        Err(TokenError::OwnerMismatch { .. }) => {}
        other => panic!("expected OwnerMismatch, got {:?}", other),
    }
}

#[test]
fn redeem_with_corrupted_owner_signature_rejected() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 500);
    let outputs = vec![TxOutput::new(500, b"out".to_vec())];

    // Right owner key, wrong pen.
    let (alice_sig, redeemer_sig) = sign_redemption(&token.record, 500, &outputs, &alice, &issuer);

    match redeem(
        &token.record,
        500,
        &alice_sig,
        &bob.public_key(),
        &redeemer_sig,
        &issuer.public_key(),
        &outputs,
    ) {
        Err(TokenError::InvalidOwnerSignature) => {}
        other => panic!("expected InvalidOwnerSignature, got {:?}", other),
    }
}

#[test]
fn redemption_signatures_pin_the_whole_output_set() {
    let (bob, _, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 500);

    let signed_outputs = vec![TxOutput::new(500, b"agreed split".to_vec())];
    let (owner_sig, redeemer_sig) =
        sign_redemption(&token.record, 500, &signed_outputs, &bob, &issuer);

    // Someone bolts an extra output onto the retirement afterwards. Both
    // signatures cover the All scope, so the spend dies.
    let mut padded = signed_outputs.clone();
    padded.push(TxOutput::new(1, b"sneaky".to_vec()));

    match redeem(
        &token.record,
        500,
        &owner_sig,
        &bob.public_key(),
        &redeemer_sig,
        &issuer.public_key(),
        &padded,
    ) {
        Err(TokenError::InvalidRedeemerSignature) => {}
        other => panic!("expected InvalidRedeemerSignature, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn verdicts_are_deterministic() {
    let (bob, alice, issuer) = cast();
    let token = issue(hash_of(&bob), hash_of(&issuer), true, vec![], 100);
    let (outputs, sig) = build_transfer(&token.record, 100, &bob, hash_of(&alice), &[]);

    // Run the same accept twice and the same reject twice; identical
    // inputs must produce identical verdicts.
    for _ in 0..2 {
        assert!(transfer(
            &token.record,
            100,
            &sig,
            &bob.public_key(),
            hash_of(&alice),
            &outputs,
            STATE_INDEX,
        )
        .is_ok());
    }

    let carol = SigilKeypair::from_seed(&[0xCA; 32]);
    for _ in 0..2 {
        assert!(matches!(
            transfer(
                &token.record,
                100,
                &sig,
                &carol.public_key(),
                hash_of(&alice),
                &outputs,
                STATE_INDEX,
            ),
            Err(TokenError::OwnerMismatch { .. })
        ));
    }
}
