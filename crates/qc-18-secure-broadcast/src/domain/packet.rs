//! # Packet Types and Envelope
//!
//! Wire unit exchanged between peers. Request and response kinds live in
//! separate enums so a response tag can never be mistaken for a request.
//!
//! ## Tag String Form
//!
//! The integrity hash covers `content ∥ tag`, where `tag` is the
//! `SCREAMING_SNAKE_CASE` name returned by `as_str`. Content is always base64
//! by the time it is hashed and base64 has no `_`, while every tag name
//! contains one and none is a suffix of another. So no pair of
//! `(content, tag)` values can produce the same hashed byte string.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! packet_kind {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every kind, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Wire name (also the string form fed into the packet hash).
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

packet_kind! {
    /// Packet kinds a node sends when asking a peer for something.
    PacketRequestType {
        /// Ask the peer for its packet auth keys
        AskPeerAuthKeys => "ASK_PEER_AUTH_KEYS",
        /// Ask the peer for the peers it knows
        AskPeerList => "ASK_PEER_LIST",
        /// Ask for the list of sovereign update hashes
        AskListSovereignUpdate => "ASK_LIST_SOVEREIGN_UPDATE",
        /// Ask for one sovereign update by hash
        AskSovereignUpdateFromHash => "ASK_SOVEREIGN_UPDATE_FROM_HASH",
        /// Ask for the peer's current block height
        AskCurrentBlockHeight => "ASK_CURRENT_BLOCK_HEIGHT",
        /// Ask for a block body
        AskBlockData => "ASK_BLOCK_DATA",
        /// Ask for block height information
        AskBlockHeightInformation => "ASK_BLOCK_HEIGHT_INFORMATION",
        /// Ask for a transaction inside a block
        AskBlockTransactionData => "ASK_BLOCK_TRANSACTION_DATA",
        /// Ask which block heights have mem pool transactions
        AskMemPoolBlockHeightList => "ASK_MEM_POOL_BLOCK_HEIGHT_LIST",
        /// Ask the peer to vote on a mem pool transaction
        AskMemPoolTransactionVote => "ASK_MEM_POOL_TRANSACTION_VOTE",
        /// Ask the peer to close the connection
        AskDisconnectRequest => "ASK_DISCONNECT_REQUEST",
        /// Keep the connection alive
        AskKeepAlive => "ASK_KEEP_ALIVE",
    }
}

packet_kind! {
    /// Packet kinds a node sends in reply.
    PacketResponseType {
        /// Packet auth keys
        SendPeerAuthKeys => "SEND_PEER_AUTH_KEYS",
        /// Known peers
        SendPeerList => "SEND_PEER_LIST",
        /// Sovereign update hashes
        SendListSovereignUpdate => "SEND_LIST_SOVEREIGN_UPDATE",
        /// One sovereign update
        SendSovereignUpdate => "SEND_SOVEREIGN_UPDATE",
        /// Current block height
        SendCurrentBlockHeight => "SEND_CURRENT_BLOCK_HEIGHT",
        /// Block body
        SendBlockData => "SEND_BLOCK_DATA",
        /// Block height information
        SendBlockHeightInformation => "SEND_BLOCK_HEIGHT_INFORMATION",
        /// Block transaction
        SendBlockTransactionData => "SEND_BLOCK_TRANSACTION_DATA",
        /// Mem pool block heights
        SendMemPoolBlockHeightList => "SEND_MEM_POOL_BLOCK_HEIGHT_LIST",
        /// Mem pool transaction vote
        SendMemPoolTransactionVote => "SEND_MEM_POOL_TRANSACTION_VOTE",
        /// Disconnect acknowledged
        SendDisconnectConfirmation => "SEND_DISCONNECT_CONFIRMATION",
        /// Keep-alive acknowledged
        SendKeepAliveConfirmation => "SEND_KEEP_ALIVE_CONFIRMATION",
        /// Peer has not finished syncing
        NotYetSynced => "NOT_YET_SYNCED",
        /// Packet could not be parsed
        InvalidPeerPacket => "INVALID_PEER_PACKET",
        /// Packet signature rejected
        InvalidPeerPacketSignature => "INVALID_PEER_PACKET_SIGNATURE",
        /// Packet could not be decrypted
        InvalidPeerPacketEncryption => "INVALID_PEER_PACKET_ENCRYPTION",
        /// Packet timestamp outside the accepted window
        InvalidPeerPacketTimestamp => "INVALID_PEER_PACKET_TIMESTAMP",
    }
}

/// Packet type tag carried by an envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketOrder {
    /// Request namespace
    Request(PacketRequestType),
    /// Response namespace
    Response(PacketResponseType),
}

impl PacketOrder {
    /// Wire name of the inner kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PacketOrder::Request(kind) => kind.as_str(),
            PacketOrder::Response(kind) => kind.as_str(),
        }
    }

    /// Request kind, if this is a request tag.
    pub fn request(&self) -> Option<PacketRequestType> {
        match self {
            PacketOrder::Request(kind) => Some(*kind),
            PacketOrder::Response(_) => None,
        }
    }
}

impl fmt::Display for PacketOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PacketRequestType> for PacketOrder {
    fn from(kind: PacketRequestType) -> Self {
        PacketOrder::Request(kind)
    }
}

impl From<PacketResponseType> for PacketOrder {
    fn from(kind: PacketResponseType) -> Self {
        PacketOrder::Response(kind)
    }
}

/// Packet envelope exchanged with a peer.
///
/// `packet_content` holds the plaintext serialization only while the envelope
/// is being built; once sealed it is base64 ciphertext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketEnvelope {
    /// Packet type tag
    pub packet_order: PacketOrder,
    /// Content (base64 ciphertext once sealed)
    pub packet_content: String,
    /// Hex SHA-256 over `packet_content ∥ packet_order`
    pub packet_hash: String,
    /// Base64 signature over the hash (empty when unsigned)
    pub packet_signature: String,
    /// Sender's unique id
    pub sender_unique_id: String,
    /// Sender's internal public key presented to the receiver
    pub sender_public_key: String,
    /// Sender's last packet-signature watermark for the receiver
    pub sender_last_timestamp_signature: u64,
}

impl PacketEnvelope {
    /// Create an unsealed envelope around plaintext content.
    pub fn new(packet_order: impl Into<PacketOrder>, packet_content: impl Into<String>) -> Self {
        Self {
            packet_order: packet_order.into(),
            packet_content: packet_content.into(),
            packet_hash: String::new(),
            packet_signature: String::new(),
            sender_unique_id: String::new(),
            sender_public_key: String::new(),
            sender_last_timestamp_signature: 0,
        }
    }

    /// Set the sender identity token.
    pub fn with_sender(
        mut self,
        unique_id: impl Into<String>,
        public_key: impl Into<String>,
        last_timestamp_signature: u64,
    ) -> Self {
        self.sender_unique_id = unique_id.into();
        self.sender_public_key = public_key.into();
        self.sender_last_timestamp_signature = last_timestamp_signature;
        self
    }

    /// Whether this envelope answers with `expected`.
    pub fn is_response(&self, expected: PacketResponseType) -> bool {
        self.packet_order == PacketOrder::Response(expected)
    }

    /// Whether the envelope carries a signature.
    pub fn is_signed(&self) -> bool {
        !self.packet_signature.is_empty()
    }
}
