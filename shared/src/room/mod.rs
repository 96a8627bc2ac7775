mod error;
mod keys;
mod property_value;
mod room_properties;
mod socket_codec;

pub use error::RoomPropertyError;
pub use keys::{socket_key, socket_key_index, CHAIN_LEVELS, CHAIN_TYPES, SOCKETS_PREFIX};
pub use property_value::PropertyValue;
pub use room_properties::{PropertyUpdates, RoomProperties};
pub use socket_codec::{decode_sockets, encode_sockets};
