//! # Convoy Peer
//! One participant of a convoy session. A [`Peer`] owns an explicitly
//! constructed instance of every protocol service and drives them all from a
//! single [`Peer::tick`] loop over a [`SessionLink`](convoy_shared::SessionLink).

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod events;
mod peer;
mod peer_config;

pub use error::PeerError;
pub use events::{Events, PeerEvent};
pub use peer::{Peer, TurretAttack};
pub use peer_config::PeerConfig;
