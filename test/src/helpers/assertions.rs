/// Assert that every peer in a [`TestSession`](crate::TestSession) holds the
/// same chain: same length, same entity at every index, all attached at the
/// same pose.
#[macro_export]
macro_rules! assert_chains_converged {
    ($session:expr) => {
        let reference = $session.peer(0).chain();
        for index in 1..$session.len() {
            let peer = $session.peer(index);
            if !peer.is_connected() {
                continue;
            }
            let chain = peer.chain();
            assert_eq!(
                chain.len(),
                reference.len(),
                "peer {} disagrees on chain length",
                index
            );
            for position in 0..reference.len() {
                assert_eq!(
                    chain.entity_at(position),
                    reference.entity_at(position),
                    "peer {} disagrees on the node at {}",
                    index,
                    position
                );
                let ours = chain.node_at(position).expect("node present");
                let theirs = reference.node_at(position).expect("node present");
                assert!(ours.is_attached(), "peer {} node {} not attached", index, position);
                assert!(
                    ours.pose().abs_diff_eq(&theirs.pose(), 1e-4),
                    "peer {} node {} at {:?}, expected {:?}",
                    index,
                    position,
                    ours.pose(),
                    theirs.pose()
                );
            }
        }
    };
}

/// Assert that the persisted chain arrays have equal length.
#[macro_export]
macro_rules! assert_registry_consistent {
    ($room:expr) => {
        let types = $room
            .int_array(convoy_shared::CHAIN_TYPES)
            .expect("chain types readable")
            .map(|values| values.len());
        let levels = $room
            .int_array(convoy_shared::CHAIN_LEVELS)
            .expect("chain levels readable")
            .map(|values| values.len());
        assert_eq!(types, levels, "chain arrays differ in length");
    };
}
