//! Interactive CLI demo of the full SIGIL bearer-token lifecycle.
//!
//! Walks through issuance, an owner-to-owner transfer, a gallery of
//! rejected spend attempts, a non-transferable token, and a dual-custody
//! redemption. The output uses ANSI escape codes for colored,
//! storytelling-style terminal rendering.
//!
//! Run with:
//!   cargo run --example demo --release

use anyhow::Result;

use sigil_contracts::bearer_token::{redeem, transfer, TokenRecord};
use sigil_contracts::issuance::issue;
use sigil_protocol::crypto::hash::KeyHash;
use sigil_protocol::crypto::keys::{SigilKeypair, SigilSignature};
use sigil_protocol::transaction::digest::{spend_digest, spend_digest_all, SigningScope};
use sigil_protocol::transaction::outputs::TxOutput;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                        {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    SIGIL  --  Bearer Token Lifecycle Demo              {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    Version 0.1.0  |  Ed25519 + BLAKE3 + dSHA-256       {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                        {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}----------------------------------------------------------{RESET}");
}

fn ok(text: &str) {
    println!("  {GREEN}[accepted]{RESET} {text}");
}

fn rejected(text: &str, err: impl std::fmt::Display) {
    println!("  {RED}[rejected]{RESET} {text}");
    println!("             {DIM}reason: {err}{RESET}");
}

fn note(text: &str) {
    println!("  {DIM}{CYAN}>> {text}{RESET}");
}

// ---------------------------------------------------------------------------
// Spend construction helpers
// ---------------------------------------------------------------------------

/// Builds a correctly formed transfer candidate and signs its digest.
fn build_transfer(
    record: &TokenRecord,
    locked_value: u64,
    signer: &SigilKeypair,
    next_owner: KeyHash,
) -> (Vec<TxOutput>, SigilSignature) {
    let successor = record.apply_transfer(next_owner);
    let outputs = vec![successor.expected_output(locked_value)];
    let digest = spend_digest(
        &record.state_bytes(),
        locked_value,
        &outputs,
        SigningScope::Single(0),
    )
    .expect("output 0 exists");
    (outputs, signer.sign(&digest))
}

fn main() -> Result<()> {
    banner();

    let bob = SigilKeypair::generate();
    let alice = SigilKeypair::generate();
    let issuer = SigilKeypair::generate();

    let bob_hash = KeyHash::of(&bob.public_key());
    let alice_hash = KeyHash::of(&alice.public_key());
    let issuer_hash = KeyHash::of(&issuer.public_key());

    // -- Step 1: Issuance -------------------------------------------------
    section(1, "Issuance: the Issuer mints a token for Bob");
    let token = issue(bob_hash, issuer_hash, true, b"event ticket, row 7".to_vec(), 100);
    note(&format!("token id      : {}", token.token_id));
    note(&format!("owner hash    : {}", token.record.owner_hash));
    note(&format!("authority hash: {}", token.record.redemption_authority_hash));
    note(&format!("locked value  : {} units", token.locked_value));
    let genesis = token.genesis_outputs(&[(b"issuer change".to_vec(), 9_900)]);
    note(&format!("genesis output set: {} outputs, state at index 0", genesis.len()));

    // -- Step 2: Transfer -------------------------------------------------
    section(2, "Transfer: Bob signs the token over to Alice");
    let (outputs, sig) = build_transfer(&token.record, 100, &bob, alice_hash);
    let r1 = transfer(
        &token.record,
        100,
        &sig,
        &bob.public_key(),
        alice_hash,
        &outputs,
        0,
    )?;
    ok("Bob -> Alice, value preserved, payload carried");
    note(&format!("new owner hash: {}", r1.owner_hash));

    // -- Step 3: Rejection gallery ---------------------------------------
    section(3, "Rejection gallery: three spends that go nowhere");

    // 3a. A stranger tries to move Alice's token.
    let mallory = SigilKeypair::generate();
    let (m_outputs, m_sig) = build_transfer(&r1, 100, &mallory, KeyHash::of(&mallory.public_key()));
    match transfer(
        &r1,
        100,
        &m_sig,
        &mallory.public_key(),
        KeyHash::of(&mallory.public_key()),
        &m_outputs,
        0,
    ) {
        Err(e) => rejected("Mallory spends Alice's token with her own key", e),
        Ok(_) => unreachable!("the ownership gate failed"),
    }

    // 3b. Alice signs, but the candidate skims one unit into change.
    let skim_successor = r1.apply_transfer(bob_hash);
    let skim_outputs = vec![
        TxOutput::new(99, skim_successor.state_bytes()),
        TxOutput::new(1, b"skim".to_vec()),
    ];
    let skim_digest = spend_digest(&r1.state_bytes(), 100, &skim_outputs, SigningScope::Single(0))
        .expect("output 0 exists");
    let skim_sig = alice.sign(&skim_digest);
    match transfer(&r1, 100, &skim_sig, &alice.public_key(), bob_hash, &skim_outputs, 0) {
        Err(e) => rejected("Alice's candidate locks 99 instead of 100", e),
        Ok(_) => unreachable!("the output commitment failed"),
    }

    // 3c. A non-transferable token headed anywhere but home.
    let pinned = issue(bob_hash, issuer_hash, false, vec![], 50);
    let (p_outputs, p_sig) = build_transfer(&pinned.record, 50, &bob, alice_hash);
    match transfer(
        &pinned.record,
        50,
        &p_sig,
        &bob.public_key(),
        alice_hash,
        &p_outputs,
        0,
    ) {
        Err(e) => rejected("Bob moves a non-transferable token to Alice", e),
        Ok(_) => unreachable!("the transferability rule failed"),
    }
    let (home_outputs, home_sig) = build_transfer(&pinned.record, 50, &bob, issuer_hash);
    transfer(
        &pinned.record,
        50,
        &home_sig,
        &bob.public_key(),
        issuer_hash,
        &home_outputs,
        0,
    )?;
    ok("...but surrendering it back to the Issuer works");

    // -- Step 4: Redemption -----------------------------------------------
    section(4, "Redemption: Alice and the Issuer retire the token");
    let retire_outputs = vec![TxOutput::new(100, b"value back to alice".to_vec())];
    let digest = spend_digest_all(&r1.state_bytes(), 100, &retire_outputs);
    let owner_sig = alice.sign(&digest);
    let redeemer_sig = issuer.sign(&digest);

    redeem(
        &r1,
        100,
        &owner_sig,
        &alice.public_key(),
        &redeemer_sig,
        &issuer.public_key(),
        &retire_outputs,
    )?;
    ok("dual-custody redemption accepted — no successor, lifecycle over");

    println!();
    println!("{BOLD}{GREEN}Demo complete.{RESET}");
    Ok(())
}
