use log::{info, warn};

use crate::{world::authority::mutation::Mutation, EntityOwner, PeerId, Rpc, SendTarget};

/// What `apply_or_forward` did with a mutation.
#[derive(Debug, PartialEq)]
pub enum Resolution<O> {
    /// This peer decides for the entity; the mutation ran synchronously.
    Applied(O),
    /// The mutation was serialized as a request for whoever decides.
    Forwarded { rpc: Rpc, to: SendTarget },
    /// Nobody can currently decide (the authority left); the request is lost.
    Dropped,
}

/// Decides, per entity, whether this peer may apply a change directly or
/// must forward a request to the peer that decides.
///
/// Authority is assigned externally by the session layer. There is no
/// election here: the resolver only mirrors what the session reports.
#[derive(Clone, Debug)]
pub struct AuthorityResolver {
    local: PeerId,
    authority: Option<PeerId>,
}

impl AuthorityResolver {
    pub fn new(local: PeerId) -> Self {
        Self {
            local,
            authority: None,
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.local
    }

    pub fn authority(&self) -> Option<PeerId> {
        self.authority
    }

    pub fn set_authority(&mut self, authority: Option<PeerId>) {
        if self.authority != authority {
            info!(
                "AuthorityResolver: peer {:?} sees authority change {:?} -> {:?}",
                self.local, self.authority, authority
            );
        }
        self.authority = authority;
    }

    pub fn is_authority(&self) -> bool {
        self.authority == Some(self.local)
    }

    /// Whether this peer decides outcomes for an entity with the given owner.
    pub fn has_authority_over(&self, owner: EntityOwner) -> bool {
        match owner {
            EntityOwner::Authority => self.is_authority(),
            EntityOwner::Peer(peer) => peer == self.local,
        }
    }

    /// Applies `mutation` to `target` when this peer decides for `owner`,
    /// otherwise returns the request to send. Never touches `target` on the
    /// forwarding path. Forwarding is fire-and-forget: there is no reply.
    pub fn apply_or_forward<M: Mutation>(
        &self,
        owner: EntityOwner,
        mutation: &M,
        target: &mut M::Target,
    ) -> Resolution<M::Outcome> {
        if self.has_authority_over(owner) {
            return Resolution::Applied(mutation.apply(target));
        }

        let rpc = mutation.to_request();
        match owner {
            EntityOwner::Authority => {
                if self.authority.is_some() {
                    Resolution::Forwarded {
                        rpc,
                        to: SendTarget::Authority,
                    }
                } else {
                    warn!(
                        "AuthorityResolver: no authority present, dropping {}",
                        rpc.name()
                    );
                    Resolution::Dropped
                }
            }
            EntityOwner::Peer(peer) => Resolution::Forwarded {
                rpc,
                to: SendTarget::Peer(peer),
            },
        }
    }
}
