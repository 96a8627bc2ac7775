use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use convoy_shared::{
    socket_key, socket_key_index, AuthorityResolver, ChainEvent, ChainTopology, Damage,
    DamageOutcome, DespawnOutcome, Easing, EffectKind, EntityOwner, Health, Inventory, LateJoin,
    LateJoinStep, NetEntity, NetMessage, NetworkId, NetworkIdGenerator, NodeKind, PeerId,
    PoolRegistry, Pose, PredictionEngine, PredictionError, PredictionEvent, Prefab,
    PropertyUpdates, PropertyValue, ReceiveOutcome, RegistryEntry, Replicate, ReplicationChannel,
    Resolution, RoomProperties, Rpc, RpcDispatcher, RpcError, SendTarget, SessionEvent,
    SessionLink, SocketInteract, SpawnCommand, SpawnPayload, TaskHandle, TaskScheduler, Tick,
    TimedTask, CHAIN_LEVELS, CHAIN_TYPES, HEALTH_DEAD,
};

use crate::{
    error::PeerError,
    events::{Events, PeerEvent},
    peer_config::PeerConfig,
};

/// A delayed turret shot, resolved when its timed task completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurretAttack {
    pub turret: NetworkId,
    pub target: NetworkId,
}

/// One participant of a session.
///
/// Every protocol service is owned here and advanced from [`Peer::tick`]:
/// session events are drained and dispatched, timed tasks and late-join
/// reconstruction advance, the chain is aligned, pending predictions are
/// expired, owned entities are broadcast and staged room properties are
/// flushed as one batch.
pub struct Peer<L: SessionLink, I: Inventory> {
    config: PeerConfig,
    link: L,
    inventory: I,
    tick: Tick,
    connected: bool,
    resolver: AuthorityResolver,
    ids: NetworkIdGenerator,
    pools: PoolRegistry<NetEntity>,
    entities: HashMap<NetworkId, NetEntity>,
    replication: ReplicationChannel,
    room: RoomProperties,
    chain: ChainTopology,
    late_join: LateJoin,
    prediction: PredictionEngine,
    tasks: TaskScheduler<TurretAttack>,
    dispatcher: RpcDispatcher<Self>,
    deaths: HashSet<NetworkId>,
    events: Events,
}

impl<L: SessionLink, I: Inventory> Peer<L, I> {
    pub fn new(config: PeerConfig, link: L, inventory: I) -> Self {
        let local = link.local_peer();
        let mut resolver = AuthorityResolver::new(local);
        resolver.set_authority(link.authority());

        let mut pools = PoolRegistry::new();
        let pooled = NodeKind::ALL
            .iter()
            .map(|kind| Prefab::Node(*kind))
            .chain(std::iter::once(Prefab::Enemy));
        for prefab in pooled {
            if let Err(err) = pools.register_pool(prefab, config.pool_prewarm, config.pool_max_idle)
            {
                warn!("Peer: {}", err);
            }
        }

        let mut dispatcher = RpcDispatcher::new();
        let handlers: [(&'static str, fn(&mut Self, PeerId, Rpc)); 4] = [
            (Rpc::REQUEST_DAMAGE, Self::on_request_damage),
            (Rpc::CONFIRM_DEATH, Self::on_confirm_death),
            (Rpc::REQUEST_SOCKET_INTERACT, Self::on_request_socket_interact),
            (Rpc::SPAWN_EFFECT, Self::on_spawn_effect),
        ];
        for (name, handler) in handlers {
            if let Err(err) = dispatcher.register(name, handler) {
                warn!("Peer: {}", err);
            }
        }

        info!(
            "Peer: {:?} joined, authority is {:?}",
            local,
            resolver.authority()
        );

        Self {
            replication: ReplicationChannel::new(config.replication.clone()),
            chain: ChainTopology::new(config.chain.clone()),
            prediction: PredictionEngine::new(config.prediction.clone()),
            config,
            link,
            inventory,
            tick: 0,
            connected: true,
            resolver,
            ids: NetworkIdGenerator::new(local),
            pools,
            entities: HashMap::new(),
            room: RoomProperties::new(),
            late_join: LateJoin::new(),
            tasks: TaskScheduler::new(),
            dispatcher,
            deaths: HashSet::new(),
            events: Events::new(),
        }
    }

    // Accessors

    pub fn local_peer(&self) -> PeerId {
        self.resolver.local_peer()
    }

    pub fn authority(&self) -> Option<PeerId> {
        self.resolver.authority()
    }

    pub fn is_authority(&self) -> bool {
        self.resolver.is_authority()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn entity(&self, entity: &NetworkId) -> Option<&NetEntity> {
        self.entities.get(entity)
    }

    pub fn entity_ids(&self) -> Vec<NetworkId> {
        let mut ids: Vec<NetworkId> = self.entities.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn health(&self, entity: &NetworkId) -> Option<&Health> {
        self.entities.get(entity).map(NetEntity::health)
    }

    pub fn chain(&self) -> &ChainTopology {
        &self.chain
    }

    pub fn room(&self) -> &RoomProperties {
        &self.room
    }

    pub fn prediction(&self) -> &PredictionEngine {
        &self.prediction
    }

    pub fn pools(&self) -> &PoolRegistry<NetEntity> {
        &self.pools
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut I {
        &mut self.inventory
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn late_join_complete(&self) -> bool {
        self.late_join.is_complete()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Everything that happened since the last call.
    pub fn take_events(&mut self) -> Events {
        self.collect_service_events();
        std::mem::replace(&mut self.events, Events::new())
    }

    // Tick loop

    /// Advances the peer by one network tick.
    pub fn tick(&mut self) {
        if !self.connected {
            return;
        }
        self.tick = self.tick.wrapping_add(1);

        self.receive_all_events();
        self.advance_late_join();
        self.advance_tasks();
        self.prediction.expire(self.tick, &mut self.inventory);
        self.chain.align();
        self.send_all_updates();
        self.flush_room_properties();
        self.collect_service_events();
    }

    fn receive_all_events(&mut self) {
        while let Some(event) = self.link.poll() {
            match event {
                SessionEvent::Message { from, bytes } => match NetMessage::from_bytes(&bytes) {
                    Ok(message) => self.process_message(from, message),
                    Err(_) => warn!(
                        "Peer: {}",
                        RpcError::Malformed {
                            from: from.value()
                        }
                    ),
                },
                SessionEvent::RoomPropertiesChanged(updates) => {
                    self.process_room_properties(updates)
                }
                SessionEvent::AuthorityChanged(authority) => self.process_authority_change(authority),
                SessionEvent::PeerLeft(peer) => self.process_peer_left(peer),
            }
        }
    }

    fn process_message(&mut self, from: PeerId, message: NetMessage) {
        match message {
            NetMessage::EntityUpdate(update) => {
                let Some(entity) = self.entities.get_mut(&update.entity) else {
                    debug!(
                        "Peer: update for unknown {:?}, waiting for its spawn",
                        update.entity
                    );
                    return;
                };
                match self
                    .replication
                    .receive_update(&update, entity.health_mut())
                {
                    Ok(ReceiveOutcome::Applied(changed)) => {
                        let dead = entity.health().is_dead();
                        for field in changed {
                            self.events.push(PeerEvent::FieldChanged {
                                entity: update.entity,
                                field,
                            });
                            if field == HEALTH_DEAD && dead {
                                self.note_death(update.entity);
                            }
                        }
                    }
                    Ok(ReceiveOutcome::Stale) | Ok(ReceiveOutcome::Ignored) => {}
                    Err(err) => warn!("Peer: {}", err),
                }
            }
            NetMessage::Rpc(rpc) => {
                let Some(handler) = self.dispatcher.handler(rpc.name()) else {
                    warn!("Peer: no handler for rpc {}", rpc.name());
                    return;
                };
                handler(self, from, rpc);
            }
            NetMessage::Spawn(command) => {
                if let Err(err) = self.spawn_from_command(command) {
                    warn!("Peer: remote spawn failed: {}", err);
                }
            }
            NetMessage::Despawn(entity) => {
                if self.entities.contains_key(&entity) {
                    if let Err(err) = self.despawn_local(&entity) {
                        warn!("Peer: remote despawn failed: {}", err);
                    }
                }
            }
        }
    }

    fn process_room_properties(&mut self, updates: PropertyUpdates) {
        let changed = self.room.apply_remote(updates);
        if changed.is_empty() {
            return;
        }

        if changed
            .iter()
            .any(|key| key == CHAIN_TYPES || key == CHAIN_LEVELS)
        {
            if let Err(err) = self.chain.observe_registry(&self.room) {
                warn!("Peer: could not read chain registry: {}", err);
            }
        }

        for key in &changed {
            if let Some(index) = socket_key_index(key) {
                if let Some(node) = self.chain.entity_at(index) {
                    self.observe_sockets(node, index);
                }
            }
        }

        for key in changed {
            self.events.push(PeerEvent::RoomPropertyChanged { key });
        }
    }

    fn process_authority_change(&mut self, authority: Option<PeerId>) {
        let was_authority = self.resolver.is_authority();
        self.resolver.set_authority(authority);
        let is_authority = self.resolver.is_authority();

        // The next owner stamps updates from its own tick counter.
        self.replication.reset_remote_ticks();

        if is_authority != was_authority {
            for (id, entity) in self.entities.iter_mut() {
                if entity.owner() != EntityOwner::Authority {
                    continue;
                }
                if is_authority {
                    if let Err(err) = self.replication.register_owned(*id, entity.health_mut()) {
                        warn!("Peer: {}", err);
                    }
                } else {
                    self.replication.deregister_owned(id, entity.health_mut());
                }
            }
        }

        self.events.push(PeerEvent::AuthorityChanged { authority });
    }

    fn process_peer_left(&mut self, peer: PeerId) {
        info!("Peer: {:?} left the session", peer);
        self.events.push(PeerEvent::PeerLeft { peer });

        if !self.resolver.is_authority() {
            return;
        }
        let abandoned: Vec<NetworkId> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.owner() == EntityOwner::Peer(peer))
            .map(|(id, _)| *id)
            .collect();
        for entity in abandoned {
            self.despawn_networked(&entity);
        }
    }

    fn advance_late_join(&mut self) {
        match self
            .late_join
            .poll(&self.resolver, &self.room, &self.chain)
        {
            LateJoinStep::SpawnMissing(entries) => {
                for (index, entry) in entries {
                    if let Err(err) = self.spawn_node(index, entry) {
                        warn!("Peer: could not rebuild node {}: {}", index, err);
                    }
                }
            }
            LateJoinStep::Complete { node_count } => {
                self.events.push(PeerEvent::LateJoinComplete { node_count });
            }
            LateJoinStep::Waiting | LateJoinStep::Idle => {}
        }
    }

    fn advance_tasks(&mut self) {
        for attack in self.tasks.advance(self.tick) {
            self.resolve_turret_attack(attack);
        }
    }

    fn send_all_updates(&mut self) {
        let replicas = self
            .entities
            .iter()
            .map(|(id, entity)| (*id, entity.health() as &dyn Replicate));
        match self.replication.collect_updates(self.tick, replicas) {
            Ok(updates) => {
                for update in updates {
                    let bytes = NetMessage::EntityUpdate(update).to_bytes();
                    self.link.send(SendTarget::All, bytes);
                }
            }
            Err(err) => warn!("Peer: {}", err),
        }
    }

    fn flush_room_properties(&mut self) {
        if self.room.has_staged() {
            let batch = self.room.take_staged();
            self.link.set_room_properties(batch);
        }
    }

    fn collect_service_events(&mut self) {
        for event in self.chain.take_events() {
            match event {
                ChainEvent::Attached {
                    entity,
                    index,
                    pose,
                } => self.events.push(PeerEvent::NodeAttached {
                    entity,
                    index,
                    pose,
                }),
                ChainEvent::Severed { entity, index } => {
                    self.events.push(PeerEvent::NodeSevered { entity, index })
                }
                ChainEvent::Registered { .. } => {}
            }
        }
        for event in self.prediction.take_events() {
            match event {
                PredictionEvent::Confirmed {
                    node,
                    socket,
                    committed,
                } => self.events.push(PeerEvent::PredictionConfirmed {
                    node,
                    socket,
                    committed,
                }),
                PredictionEvent::RolledBack {
                    node,
                    socket,
                    restored,
                } => self.events.push(PeerEvent::PredictionRolledBack {
                    node,
                    socket,
                    restored,
                }),
            }
        }
    }

    // Spawning

    /// Spawns a shared enemy. Authority only.
    pub fn spawn_enemy(&mut self, max_health: u32) -> Result<NetworkId, PeerError> {
        self.require_authority("spawn enemies")?;
        let id = self.ids.generate();
        self.spawn_local(Prefab::Enemy, id, EntityOwner::Authority, None)?;
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.health_mut().reset(max_health);
        }
        Ok(id)
    }

    /// Spawns this peer's own character. It is decided and broadcast by this
    /// peer, and destroyed for good when despawned.
    pub fn spawn_player(&mut self) -> Result<NetworkId, PeerError> {
        self.require_connected()?;
        let id = self.ids.generate();
        let owner = EntityOwner::Peer(self.local_peer());
        self.spawn_local(Prefab::Player, id, owner, None)?;
        Ok(id)
    }

    /// Appends a node to the tail of the chain. Authority only.
    pub fn append_node(&mut self, kind: NodeKind, level: u8) -> Result<NetworkId, PeerError> {
        self.require_authority("append chain nodes")?;
        let index = self
            .chain
            .append(&self.resolver, &mut self.room, kind, level)?;
        self.spawn_node(index, RegistryEntry::new(kind, level))
    }

    fn spawn_node(&mut self, index: usize, entry: RegistryEntry) -> Result<NetworkId, PeerError> {
        let id = self.ids.generate();
        let payload = SpawnPayload {
            index: index as u16,
            level: entry.level,
            kind: entry.kind,
        };
        self.spawn_local(
            Prefab::Node(entry.kind),
            id,
            EntityOwner::Authority,
            Some(payload),
        )?;
        Ok(id)
    }

    fn spawn_local(
        &mut self,
        prefab: Prefab,
        id: NetworkId,
        owner: EntityOwner,
        payload: Option<SpawnPayload>,
    ) -> Result<(), PeerError> {
        let command = SpawnCommand {
            entity: id,
            prefab,
            owner,
            payload,
        };
        let bytes = NetMessage::Spawn(command.clone()).to_bytes();
        self.spawn_from_command(command)?;
        self.link.send_buffered(id, bytes);
        Ok(())
    }

    /// Instantiates an entity through the pool, consuming its payload.
    fn spawn_from_command(&mut self, command: SpawnCommand) -> Result<(), PeerError> {
        let SpawnCommand {
            entity: id,
            prefab,
            owner,
            payload,
        } = command;
        if self.entities.contains_key(&id) {
            debug!("Peer: {:?} already spawned", id);
            return Ok(());
        }

        let mut entity = self.pools.spawn(prefab, id, owner, payload)?;
        if self.resolver.has_authority_over(owner) {
            self.replication.register_owned(id, entity.health_mut())?;
        }

        if let Some(kind) = prefab.node_kind() {
            match entity.take_spawn_payload() {
                Some(payload) => {
                    let index = usize::from(payload.index);
                    let sockets = kind.behavior().stats(payload.level).socket_count;
                    self.prediction.register_node(
                        id,
                        usize::from(sockets),
                        self.config.chain.socket_delimiter,
                    );
                    self.entities.insert(id, entity);
                    self.chain.register(id, index, kind, payload.level)?;
                    self.observe_sockets(id, index);
                }
                None => {
                    warn!("Peer: node {:?} spawned without payload", id);
                    self.entities.insert(id, entity);
                    self.chain.track(id)?;
                }
            }
        } else {
            self.entities.insert(id, entity);
        }

        self.events.push(PeerEvent::Spawned {
            entity: id,
            prefab,
            owner,
        });
        Ok(())
    }

    // Despawning

    /// Despawns an entity this peer decides for, announcing it to everyone.
    /// Despawning a chain node cuts the chain there, taking every node
    /// behind it along.
    pub fn despawn(&mut self, entity: &NetworkId) -> Result<(), PeerError> {
        self.require_connected()?;
        let owner = self.owner_of(entity)?;
        if !self.resolver.has_authority_over(owner) {
            return Err(PeerError::NotAuthority {
                operation: "despawn this entity",
            });
        }

        match self.chain.index_of(entity) {
            Some(index) => self.cut_chain_at(index),
            None => {
                self.despawn_networked(entity);
                Ok(())
            }
        }
    }

    fn despawn_networked(&mut self, entity: &NetworkId) {
        self.link
            .send(SendTarget::All, NetMessage::Despawn(*entity).to_bytes());
        self.link.clear_buffered(*entity);
        if let Err(err) = self.despawn_local(entity) {
            warn!("Peer: {}", err);
        }
    }

    fn despawn_local(&mut self, id: &NetworkId) -> Result<DespawnOutcome, PeerError> {
        let mut entity = self
            .entities
            .remove(id)
            .ok_or_else(|| PeerError::UnknownEntity {
                entity_id: format!("{:?}", id),
            })?;

        self.chain.remove_node(id);
        self.prediction.remove_node(id, &mut self.inventory);
        self.replication.deregister_owned(id, entity.health_mut());
        self.replication.forget(id);
        self.deaths.remove(id);
        self.tasks
            .cancel_where(|attack| attack.turret == *id || attack.target == *id);

        let outcome = self.pools.despawn(entity)?;
        self.events.push(PeerEvent::Despawned {
            entity: *id,
            outcome,
        });
        Ok(outcome)
    }

    fn cut_chain_at(&mut self, index: usize) -> Result<(), PeerError> {
        let severed = self
            .chain
            .cut_tail(&self.resolver, &mut self.room, index)?;
        for entity in severed {
            self.despawn_networked(&entity);
        }
        Ok(())
    }

    // Authority-resolved mutations

    /// Damages an entity: applied here when this peer decides for it,
    /// otherwise forwarded to the peer that does.
    pub fn request_damage(
        &mut self,
        entity: NetworkId,
        amount: u32,
    ) -> Result<Resolution<DamageOutcome>, PeerError> {
        self.require_connected()?;
        let target = self
            .entities
            .get_mut(&entity)
            .ok_or_else(|| PeerError::UnknownEntity {
                entity_id: format!("{:?}", entity),
            })?;
        let owner = target.owner();
        let resolution = self.resolver.apply_or_forward(
            owner,
            &Damage { entity, amount },
            target.health_mut(),
        );

        match &resolution {
            Resolution::Applied(outcome) => self.after_damage(entity, *outcome)?,
            Resolution::Forwarded { rpc, to } => {
                self.link.send(*to, NetMessage::Rpc(rpc.clone()).to_bytes())
            }
            Resolution::Dropped => {}
        }
        Ok(resolution)
    }

    fn after_damage(&mut self, entity: NetworkId, outcome: DamageOutcome) -> Result<(), PeerError> {
        if outcome != DamageOutcome::Died {
            return Ok(());
        }

        info!("Peer: {:?} died", entity);
        self.link.send(
            SendTarget::All,
            NetMessage::Rpc(Rpc::ConfirmDeath { entity }).to_bytes(),
        );
        self.note_death(entity);

        if let Some(index) = self.chain.index_of(&entity) {
            if self.resolver.is_authority() {
                self.cut_chain_at(index)?;
            }
        }
        Ok(())
    }

    fn note_death(&mut self, entity: NetworkId) {
        if self.deaths.insert(entity) {
            self.events.push(PeerEvent::DeathConfirmed { entity });
        }
    }

    /// Exchanges the item in `inventory_slot` with the item in `socket` of
    /// `node`. Non-authority peers see the exchange immediately and have it
    /// confirmed or rolled back by the authority's next socket broadcast.
    pub fn interact_socket(
        &mut self,
        node: NetworkId,
        socket: u8,
        inventory_slot: usize,
    ) -> Result<Resolution<Result<bool, PredictionError>>, PeerError> {
        self.require_connected()?;
        let request = self.prediction.predict(
            node,
            socket,
            &mut self.inventory,
            inventory_slot,
            self.tick,
        )?;

        let resolution = self.resolver.apply_or_forward(
            EntityOwner::Authority,
            &request,
            self.prediction.slots_mut(&node)?,
        );

        match &resolution {
            Resolution::Applied(Ok(true)) => {
                self.persist_sockets(node)?;
                self.prediction.observe_committed(
                    node,
                    socket,
                    &request.incoming,
                    &mut self.inventory,
                )?;
            }
            Resolution::Applied(_) => {
                let committed = self.committed_item(node, socket);
                self.prediction
                    .observe_committed(node, socket, &committed, &mut self.inventory)?;
            }
            Resolution::Forwarded { rpc, to } => {
                self.link.send(*to, NetMessage::Rpc(rpc.clone()).to_bytes())
            }
            Resolution::Dropped => {
                warn!(
                    "Peer: socket {} of {:?} stays pending, no authority to confirm it",
                    socket, node
                );
            }
        }
        Ok(resolution)
    }

    fn committed_item(&self, node: NetworkId, socket: u8) -> String {
        self.prediction
            .slots(&node)
            .and_then(|slots| slots.get(socket))
            .map(|slot| slot.committed().to_string())
            .unwrap_or_default()
    }

    fn persist_sockets(&mut self, node: NetworkId) -> Result<(), PeerError> {
        let index = self
            .chain
            .index_of(&node)
            .ok_or_else(|| PeerError::NotANode {
                entity_id: format!("{:?}", node),
            })?;
        let Some(slots) = self.prediction.slots(&node) else {
            return Ok(());
        };
        let encoded = slots.encode();
        self.room.write(
            &self.resolver,
            vec![(socket_key(index), PropertyValue::Text(encoded))],
        )?;
        Ok(())
    }

    fn observe_sockets(&mut self, node: NetworkId, index: usize) {
        let Some(slots) = self.prediction.slots(&node) else {
            return;
        };
        let items = match self.room.text(&socket_key(index)) {
            Ok(Some(encoded)) => slots.decode(encoded),
            Ok(None) => return,
            Err(err) => {
                warn!("Peer: {}", err);
                return;
            }
        };
        if let Err(err) = self
            .prediction
            .observe_node(node, &items, &mut self.inventory)
        {
            warn!("Peer: {}", err);
        }
    }

    // Timed tasks and effects

    /// Fires `turret` at `target` after the turret's attack delay. The shot
    /// resolves through the normal authority path.
    pub fn schedule_turret_attack(
        &mut self,
        turret: NetworkId,
        target: NetworkId,
    ) -> Result<TaskHandle, PeerError> {
        self.require_connected()?;
        if !self.entities.contains_key(&target) {
            return Err(PeerError::UnknownEntity {
                entity_id: format!("{:?}", target),
            });
        }
        let node = self
            .chain
            .node(&turret)
            .filter(|node| node.state().is_registered())
            .ok_or_else(|| PeerError::NotANode {
                entity_id: format!("{:?}", turret),
            })?;
        let behavior = node.behavior().ok_or_else(|| PeerError::NotANode {
            entity_id: format!("{:?}", turret),
        })?;
        if !behavior.can_attack() {
            return Err(PeerError::CannotAttack {
                entity_id: format!("{:?}", turret),
            });
        }

        let delay = behavior.stats(node.level()).attack_delay_ticks;
        let delay = u16::try_from(delay)
            .unwrap_or(u16::MAX)
            .min(TimedTask::<TurretAttack>::MAX_DURATION);
        Ok(self
            .tasks
            .schedule(self.tick, delay, Easing::Step, TurretAttack { turret, target }))
    }

    fn resolve_turret_attack(&mut self, attack: TurretAttack) {
        let Some(node) = self.chain.node(&attack.turret) else {
            return;
        };
        let Some(behavior) = node.behavior() else {
            return;
        };
        let damage = behavior.stats(node.level()).attack_damage;
        let muzzle = node.rear_pose().unwrap_or(node.pose());

        if let Err(err) = self.request_damage(attack.target, damage) {
            warn!("Peer: turret attack failed: {}", err);
            return;
        }
        self.spawn_effect(EffectKind::MuzzleFlash, muzzle);
    }

    /// Announces a cosmetic event to every peer, this one included.
    pub fn spawn_effect(&mut self, effect: EffectKind, pose: Pose) {
        self.link.send(
            SendTarget::All,
            NetMessage::Rpc(Rpc::SpawnEffect { effect, pose }).to_bytes(),
        );
        self.events.push(PeerEvent::EffectSpawned { effect, pose });
    }

    /// Leaves the session. Every pending prediction is rolled back.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        info!("Peer: {:?} disconnecting", self.local_peer());
        self.prediction.cancel_all(&mut self.inventory);
        self.connected = false;
        self.collect_service_events();
    }

    // Rpc handlers

    fn on_request_damage(&mut self, from: PeerId, rpc: Rpc) {
        let Rpc::RequestDamage { entity, amount } = rpc else {
            return;
        };
        let Ok(owner) = self.owner_of(&entity) else {
            debug!("Peer: damage request from {:?} for unknown {:?}", from, entity);
            return;
        };
        if !self.resolver.has_authority_over(owner) {
            warn!(
                "Peer: damage request from {:?} for {:?}, but this peer does not decide it",
                from, entity
            );
            return;
        }
        if let Err(err) = self.request_damage(entity, amount) {
            warn!("Peer: {}", err);
        }
    }

    fn on_confirm_death(&mut self, _from: PeerId, rpc: Rpc) {
        if let Rpc::ConfirmDeath { entity } = rpc {
            if self.entities.contains_key(&entity) {
                self.note_death(entity);
            }
        }
    }

    fn on_request_socket_interact(&mut self, from: PeerId, rpc: Rpc) {
        let Rpc::RequestSocketInteract {
            node,
            socket,
            incoming,
            outgoing,
            reservation,
        } = rpc
        else {
            return;
        };
        if !self.resolver.is_authority() {
            warn!(
                "Peer: socket request from {:?} reached a peer without authority",
                from
            );
            return;
        }

        let request = SocketInteract {
            node,
            socket,
            incoming,
            outgoing,
            reservation,
        };
        let slots = match self.prediction.slots_mut(&node) {
            Ok(slots) => slots,
            Err(err) => {
                warn!("Peer: {}", err);
                return;
            }
        };
        match self
            .resolver
            .apply_or_forward(EntityOwner::Authority, &request, slots)
        {
            Resolution::Applied(Ok(true)) => {
                if let Err(err) = self.persist_sockets(node) {
                    warn!("Peer: {}", err);
                }
            }
            Resolution::Applied(Ok(false)) => {
                info!(
                    "Peer: rejected stale socket request {} from {:?}",
                    reservation, from
                );
            }
            Resolution::Applied(Err(err)) => warn!("Peer: {}", err),
            Resolution::Forwarded { .. } | Resolution::Dropped => {}
        }
    }

    fn on_spawn_effect(&mut self, _from: PeerId, rpc: Rpc) {
        if let Rpc::SpawnEffect { effect, pose } = rpc {
            self.events.push(PeerEvent::EffectSpawned { effect, pose });
        }
    }

    // Helpers

    fn owner_of(&self, entity: &NetworkId) -> Result<EntityOwner, PeerError> {
        self.entities
            .get(entity)
            .map(NetEntity::owner)
            .ok_or_else(|| PeerError::UnknownEntity {
                entity_id: format!("{:?}", entity),
            })
    }

    fn require_connected(&self) -> Result<(), PeerError> {
        if self.connected {
            Ok(())
        } else {
            Err(PeerError::Disconnected)
        }
    }

    fn require_authority(&self, operation: &'static str) -> Result<(), PeerError> {
        self.require_connected()?;
        if self.resolver.is_authority() {
            Ok(())
        } else {
            Err(PeerError::NotAuthority { operation })
        }
    }
}
