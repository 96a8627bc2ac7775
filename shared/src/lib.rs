//! # Convoy Shared
//! Protocol core of a multiplayer session: entity identity and wire
//! messages, pooled lifecycle, the replication channel and RPC surface,
//! durable room properties, the authority resolver, the train chain
//! topology and optimistic socket prediction. No I/O happens here; a peer
//! drives these services over a [`SessionLink`].

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger,
};

mod messages;
mod room;
mod session;
mod tasks;
mod types;
mod world;
mod wrapping_number;

pub use messages::{
    EntityUpdate, NetMessage, Rpc, RpcDispatcher, RpcError, RpcHandler, RpcTarget, SpawnCommand,
    SpawnPayload,
};
pub use room::{
    decode_sockets, encode_sockets, socket_key, socket_key_index, PropertyUpdates, PropertyValue,
    RoomProperties, RoomPropertyError, CHAIN_LEVELS, CHAIN_TYPES, SOCKETS_PREFIX,
};
pub use session::{SendTarget, SessionEvent, SessionLink};
pub use tasks::{Easing, TaskHandle, TaskScheduler, TimedTask};
pub use types::{EffectKind, EntityOwner, PeerId, ReservationId, Tick};
pub use world::{
    authority::{AuthorityResolver, Damage, Mutation, Resolution, SocketInteract},
    chain::{
        registry_from_properties, registry_to_properties, CargoNode, ChainConfig, ChainError,
        ChainEvent, ChainNode, ChainTopology, EngineNode, LateJoin, LateJoinStep, NodeBehavior,
        NodeKind, NodeState, NodeStats, Pose, RadarNode, RegistryEntry, TurretNode,
    },
    net_entity::NetEntity,
    network_id::{NetworkId, NetworkIdGenerator},
    pool::{DespawnOutcome, EntityPool, PoolError, PoolRegistry, PoolStats, Poolable},
    prediction::{
        Inventory, PendingInteraction, PredictionConfig, PredictionEngine, PredictionError,
        PredictionEvent, SlotInventory, SocketSlot, SocketSlots,
    },
    prefab::Prefab,
    replication::{
        DamageOutcome, DiffMask, Health, MutChannel, MutReceiver, Property, PropertyMutator,
        ReceiveOutcome, Replicate, ReplicationChannel, ReplicationConfig, ReplicationError,
        HEALTH_CURRENT, HEALTH_DEAD, HEALTH_MAX,
    },
};
pub use wrapping_number::{tick_diff, tick_greater_than, tick_less_than};
