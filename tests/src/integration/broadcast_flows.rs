//! # Secure Broadcast Flows
//!
//! Peer A asks peer B for data over the loopback network and checks what
//! comes back.
//!
//! ## Flows Tested:
//!
//! 1. **Static path**: no cancellation token, static key + raw signer
//! 2. **Session path**: cancellation token, session cipher + session signer
//! 3. **Rejections**: wrong reply tag, forged signature, unreachable or estranged peer
//! 4. **Sovereign proof**: numeric proof from a seed-ranked peer

use super::fixtures::{
    NetworkOptions, Node, Responder, TwoPeerNetwork, ValuePayload, ID_A, ID_B, IP_A, IP_B,
};
use qc_18_secure_broadcast::{
    BroadcastSettings, PacketRequestType, PacketResponseType, SecureBroadcastApi, SovereignProof,
};
use shared_crypto::Secp256k1KeyPair;
use tokio_util::sync::CancellationToken;

async fn ask(
    node: &Node,
    value: u64,
    cancellation: Option<&CancellationToken>,
) -> Option<ValuePayload> {
    node.send_broadcast_packet(
        IP_B,
        ID_B,
        PacketRequestType::AskBlockData,
        &ValuePayload { value },
        PacketResponseType::SendBlockData,
        cancellation,
    )
    .await
}

// =============================================================================
// HAPPY PATHS
// =============================================================================

#[tokio::test]
async fn test_static_exchange_doubles_value() {
    let network = TwoPeerNetwork::new();

    assert_eq!(ask(&network.a, 42, None).await, Some(ValuePayload { value: 84 }));
}

#[tokio::test]
async fn test_session_exchange_doubles_value() {
    let network = TwoPeerNetwork::with_options(NetworkOptions {
        sessions: true,
        ..Default::default()
    });
    let token = CancellationToken::new();

    assert_eq!(ask(&network.a, 42, Some(&token)).await, Some(ValuePayload { value: 84 }));
}

#[tokio::test]
async fn test_closed_sessions_fall_back_to_static() {
    let network = TwoPeerNetwork::with_options(NetworkOptions {
        sessions: true,
        ..Default::default()
    });
    let token = CancellationToken::new();

    if let (Some(a), Some(b)) = (&network.session_a, &network.session_b) {
        a.close();
        b.close();
    }

    assert_eq!(ask(&network.a, 21, Some(&token)).await, Some(ValuePayload { value: 42 }));
}

#[tokio::test]
async fn test_repeated_exchanges_are_independent() {
    let network = TwoPeerNetwork::new();

    for value in [1u64, 7, 1_000_000] {
        assert_eq!(ask(&network.a, value, None).await, Some(ValuePayload { value: value * 2 }));
    }
}

// =============================================================================
// REJECTIONS
// =============================================================================

#[tokio::test]
async fn test_wrong_reply_tag_yields_none() {
    let network = TwoPeerNetwork::with_options(NetworkOptions {
        responder: Responder::WrongTag(PacketResponseType::SendPeerList),
        ..Default::default()
    });

    assert_eq!(ask(&network.a, 42, None).await, None);
}

#[tokio::test]
async fn test_forged_signature_rejected_unless_whitelisted() {
    let network = TwoPeerNetwork::with_options(NetworkOptions {
        responder: Responder::ForgedSignature,
        ..Default::default()
    });

    assert_eq!(ask(&network.a, 42, None).await, None);

    network.a.registry().set_whitelisted(IP_B, ID_B, true);
    assert_eq!(ask(&network.a, 42, None).await, Some(ValuePayload { value: 84 }));
}

#[tokio::test]
async fn test_paranoid_settings_from_toml() {
    let paranoid = BroadcastSettings::from_toml_str(
        r#"
        paranoid_signature_check = true
        max_packet_content_size = 65536
        "#,
    )
    .unwrap();
    let network = TwoPeerNetwork::with_options(NetworkOptions {
        responder: Responder::ForgedSignature,
        settings_a: paranoid,
        ..Default::default()
    });
    network.a.registry().set_whitelisted(IP_B, ID_B, true);

    assert_eq!(ask(&network.a, 42, None).await, None);
}

#[tokio::test]
async fn test_unreachable_peer_yields_none() {
    let network = TwoPeerNetwork::new();
    network.loopback.unregister(IP_B, ID_B);

    assert_eq!(ask(&network.a, 42, None).await, None);
}

#[tokio::test]
async fn test_responder_forgetting_sender_yields_none() {
    let network = TwoPeerNetwork::new();
    network.b.registry().remove(IP_A, ID_A);

    assert_eq!(ask(&network.a, 42, None).await, None);
}

#[tokio::test]
async fn test_cancelled_token_yields_none() {
    let network = TwoPeerNetwork::with_options(NetworkOptions {
        sessions: true,
        ..Default::default()
    });
    let token = CancellationToken::new();
    token.cancel();

    assert_eq!(ask(&network.a, 42, Some(&token)).await, None);
}

// =============================================================================
// SOVEREIGN PROOF
// =============================================================================

#[tokio::test]
async fn test_sovereign_proof_from_seed_ranked_peer() {
    let network = TwoPeerNetwork::new();
    let numeric = Secp256k1KeyPair::generate();
    let vote = ValuePayload { value: 1200 };
    let proof = SovereignProof::produce(&vote, &numeric).unwrap();

    let verdict = network
        .a
        .verify_sovereign(IP_B, ID_B, &vote, &proof.numeric_hash, &proof.numeric_signature)
        .await;
    assert!(!verdict.valid);
    assert!(verdict.numeric_public_key.is_empty());

    network
        .a
        .registry()
        .grant_seed_rank(IP_B, ID_B, numeric.public_key().to_hex());

    let verdict = network
        .a
        .verify_sovereign(IP_B, ID_B, &vote, &proof.numeric_hash, &proof.numeric_signature)
        .await;
    assert!(verdict.valid);
    assert_eq!(verdict.numeric_public_key, numeric.public_key().to_hex());
}
