mod authority_resolver;
mod mutation;

pub use authority_resolver::{AuthorityResolver, Resolution};
pub use mutation::{Damage, Mutation, SocketInteract};
