//! Unit tests for aoi-core primitives.

#[cfg(test)]
mod helpers {
    use std::sync::{Arc, Mutex};

    use crate::{AoiListener, EventKind, ListenerResult, NodeArena, NodeHandle, NodeSpec, NodeView};

    /// Records every callback as `(observer, kind, sorted handles)`.
    #[derive(Default)]
    pub struct Recorder {
        pub events: Mutex<Vec<(NodeHandle, EventKind, Vec<NodeHandle>)>>,
    }

    impl Recorder {
        fn record(&self, observer: NodeHandle, kind: EventKind, nodes: &[NodeView]) {
            let mut handles: Vec<_> = nodes.iter().map(|v| v.handle).collect();
            handles.sort_unstable();
            self.events.lock().unwrap().push((observer, kind, handles));
        }
    }

    impl AoiListener for Recorder {
        fn on_enter(&self, observer: NodeHandle, nodes: &[NodeView]) -> ListenerResult {
            self.record(observer, EventKind::Enter, nodes);
            Ok(())
        }

        fn on_update(&self, observer: NodeHandle, node: &NodeView) -> ListenerResult {
            self.record(observer, EventKind::Update, std::slice::from_ref(node));
            Ok(())
        }

        fn on_leave(&self, observer: NodeHandle, nodes: &[NodeView]) -> ListenerResult {
            self.record(observer, EventKind::Leave, nodes);
            Ok(())
        }
    }

    /// Arena with `n` nodes on the x axis, all sharing one recorder.
    pub fn arena(n: usize) -> (NodeArena<()>, Arc<Recorder>, Vec<NodeHandle>) {
        let rec = Arc::new(Recorder::default());
        let mut arena = NodeArena::new();
        let handles = (0..n)
            .map(|i| {
                arena
                    .insert(NodeSpec::new(i as f32, 0.0, 1.0).listener(rec.clone()))
                    .unwrap()
            })
            .collect();
        (arena, rec, handles)
    }
}

#[cfg(test)]
mod ids {
    use crate::NodeHandle;

    #[test]
    fn index_roundtrip() {
        let h = NodeHandle(42);
        assert_eq!(h.index(), 42);
        assert_eq!(NodeHandle::try_from(42usize).unwrap(), h);
    }

    #[test]
    fn invalid_is_default() {
        assert_eq!(NodeHandle::default(), NodeHandle::INVALID);
        assert_eq!(NodeHandle::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeHandle(7).to_string(), "NodeHandle(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::Point;

    #[test]
    fn square_is_inclusive_per_axis() {
        let c = Point::new(2.0, 2.0);
        assert!(Point::new(4.0, 4.0).within_square(c, 2.0)); // corner counts
        assert!(!Point::new(4.5, 2.0).within_square(c, 2.0));
        assert!(!Point::new(2.0, -0.5).within_square(c, 2.0));
    }

    #[test]
    fn finiteness() {
        assert!(Point::new(1.0, -1.0).is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod neighbors {
    use crate::{NeighborSet, NodeHandle};

    fn set(ids: &[u32]) -> NeighborSet {
        ids.iter().map(|&i| NodeHandle(i)).collect()
    }

    #[test]
    fn membership_is_unique() {
        let mut s = NeighborSet::new();
        assert!(s.insert(NodeHandle(1)));
        assert!(!s.insert(NodeHandle(1)));
        assert_eq!(s.len(), 1);
        assert!(s.remove(NodeHandle(1)));
        assert!(s.is_empty());
    }

    #[test]
    fn set_algebra() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4]);
        let mut only_a: Vec<_> = a.difference(&b).collect();
        only_a.sort_unstable();
        assert_eq!(only_a, vec![NodeHandle(1)]);
        let both: NeighborSet = a.intersection(&b).collect();
        assert_eq!(both, set(&[2, 3]));
    }

    #[test]
    fn sorted_is_ascending() {
        let s = set(&[9, 3, 5]);
        assert_eq!(s.sorted(), vec![NodeHandle(3), NodeHandle(5), NodeHandle(9)]);
    }
}

#[cfg(test)]
mod arena {
    use std::sync::Arc;

    use crate::{AoiError, NodeArena, NodeHandle, NodeSpec, NoopListener, validate_range};

    #[test]
    fn missing_listener_is_rejected() {
        let mut arena: NodeArena<()> = NodeArena::new();
        let err = arena.insert(NodeSpec::new(0.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, AoiError::MissingListener));
        assert!(err.is_validation());
        assert!(arena.is_empty());
    }

    #[test]
    fn non_finite_spec_is_rejected() {
        let mut arena: NodeArena<()> = NodeArena::new();
        let l = Arc::new(NoopListener);
        assert!(arena.insert(NodeSpec::new(f32::NAN, 0.0, 1.0).listener(l.clone())).is_err());
        assert!(matches!(
            arena.insert(NodeSpec::new(0.0, 0.0, -1.0).listener(l)),
            Err(AoiError::NegativeRange(_))
        ));
    }

    #[test]
    fn range_validation() {
        assert!(validate_range(0.0).is_ok());
        assert!(validate_range(3.5).is_ok());
        assert!(matches!(validate_range(-0.1), Err(AoiError::NegativeRange(_))));
        assert!(matches!(validate_range(f32::NAN), Err(AoiError::Validation(_))));
    }

    #[test]
    fn lifecycle_counts() {
        let (mut arena, _rec, h) = super::helpers::arena(3);
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.registered_count(), 0);

        arena.mark_registered(h[1]);
        assert_eq!(arena.registered_count(), 1);
        assert!(arena.registered(h[1]).is_ok());
        assert!(matches!(arena.unregistered(h[1]), Err(AoiError::AlreadyRegistered(_))));
        assert!(matches!(arena.registered(h[0]), Err(AoiError::NotRegistered(_))));

        let live: Vec<_> = arena.iter_registered().map(|(h, _)| h).collect();
        assert_eq!(live, vec![h[1]]);

        arena.mark_unregistered(h[1]);
        assert_eq!(arena.registered_count(), 0);
    }

    #[test]
    fn release_requires_unregistered_and_retires_handle() {
        let (mut arena, _rec, h) = super::helpers::arena(2);
        arena.mark_registered(h[0]);
        assert!(arena.release(h[0]).unwrap_err().is_invalid_state());

        arena.release(h[1]).unwrap();
        assert_eq!(arena.len(), 1);
        assert!(matches!(arena.get(h[1]), Err(AoiError::UnknownNode(_))));
        assert!(matches!(arena.get(NodeHandle(99)), Err(AoiError::UnknownNode(_))));
    }

    #[test]
    fn set_range_keeps_settled_range_until_settle() {
        let (mut arena, _rec, h) = super::helpers::arena(1);
        arena.mark_registered(h[0]);
        arena.set_range(h[0], 5.0).unwrap();
        assert_eq!(arena[h[0]].range, 5.0);
        assert_eq!(arena[h[0]].settled_range, 1.0);
        arena.settle(h[0]);
        assert_eq!(arena[h[0]].settled_range, 5.0);
    }

    #[test]
    fn payload_passes_through() {
        let mut arena: NodeArena<()> = NodeArena::new();
        let h = arena
            .insert(NodeSpec::new(0.0, 0.0, 1.0).listener(Arc::new(NoopListener)).payload(17u64))
            .unwrap();
        let payload = arena.get(h).unwrap().payload.clone().unwrap();
        assert_eq!(*payload.downcast::<u64>().unwrap(), 17);
    }
}

#[cfg(test)]
mod events {
    use std::sync::Arc;

    use crate::{
        AoiError, AoiListener, DispatchOrder, EventKind, ListenerResult, MoveDiff, NeighborSet,
        NodeArena, NodeHandle, NodeSpec, NodeView, Notifications,
    };

    #[test]
    fn enter_plan_singletons_then_batch() {
        let (arena, rec, h) = super::helpers::arena(3);
        let neighbors: NeighborSet = [h[1], h[2]].into_iter().collect();
        let plan = Notifications::entered(&arena, h[0], &neighbors);
        assert_eq!(plan.len(), 3);
        plan.dispatch().unwrap();

        let mut events = rec.events.lock().unwrap().clone();
        let last = events.pop().unwrap();
        assert_eq!(last, (h[0], EventKind::Enter, vec![h[1], h[2]]));
        events.sort();
        assert_eq!(events, vec![
            (h[1], EventKind::Enter, vec![h[0]]),
            (h[2], EventKind::Enter, vec![h[0]]),
        ]);
    }

    #[test]
    fn leave_with_no_neighbors_still_notifies_actor() {
        let (arena, rec, h) = super::helpers::arena(1);
        Notifications::left(&arena, h[0], &NeighborSet::new()).dispatch().unwrap();
        assert_eq!(*rec.events.lock().unwrap(), vec![(h[0], EventKind::Leave, Vec::<NodeHandle>::new())]);
    }

    #[test]
    fn move_diff_partitions_sets() {
        let old: NeighborSet = [1, 2, 3].map(NodeHandle).into_iter().collect();
        let new: NeighborSet = [2, 3, 4].map(NodeHandle).into_iter().collect();
        let diff = MoveDiff::between(&old, &new);
        assert_eq!(diff.left.sorted(), vec![NodeHandle(1)]);
        assert_eq!(diff.entered.sorted(), vec![NodeHandle(4)]);
        assert_eq!(diff.retained.sorted(), vec![NodeHandle(2), NodeHandle(3)]);
    }

    #[test]
    fn random_diffs_partition_both_sets() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            let old: NeighborSet = (0..rng.gen_range(0..20)).map(|_| NodeHandle(rng.gen_range(0..30))).collect();
            let new: NeighborSet = (0..rng.gen_range(0..20)).map(|_| NodeHandle(rng.gen_range(0..30))).collect();
            let diff = MoveDiff::between(&old, &new);

            assert_eq!(diff.left.len() + diff.retained.len(), old.len());
            assert_eq!(diff.entered.len() + diff.retained.len(), new.len());
            assert!(diff.left.iter().all(|h| !new.contains(h)));
            assert!(diff.entered.iter().all(|h| !old.contains(h)));
            assert!(diff.retained.iter().all(|h| old.contains(h) && new.contains(h)));
        }
    }

    #[test]
    fn move_plan_follows_diff() {
        let (arena, rec, h) = super::helpers::arena(5);
        let old: NeighborSet = [h[1], h[2], h[3]].into_iter().collect();
        let new: NeighborSet = [h[2], h[3], h[4]].into_iter().collect();
        Notifications::moved(&arena, h[0], &old, &new).dispatch().unwrap();

        let events = rec.events.lock().unwrap().clone();
        let of = |kind: EventKind, observer: NodeHandle| -> Vec<Vec<NodeHandle>> {
            events
                .iter()
                .filter(|(o, k, _)| *o == observer && *k == kind)
                .map(|(_, _, n)| n.clone())
                .collect()
        };

        assert_eq!(of(EventKind::Leave, h[1]), vec![vec![h[0]]]);
        assert_eq!(of(EventKind::Enter, h[4]), vec![vec![h[0]]]);
        assert_eq!(of(EventKind::Update, h[2]), vec![vec![h[0]]]);
        assert_eq!(of(EventKind::Update, h[3]), vec![vec![h[0]]]);
        assert_eq!(of(EventKind::Leave, h[0]), vec![vec![h[1]]]);
        assert_eq!(of(EventKind::Enter, h[0]), vec![vec![h[4]]]);
        assert!(of(EventKind::Update, h[0]).is_empty(), "mover gets no updates");
        assert_eq!(events.len(), 6);

        // Leave phase completes before the enter phase starts.
        let first_enter = events.iter().position(|e| e.1 != EventKind::Leave).unwrap();
        assert!(events[first_enter..].iter().all(|e| e.1 != EventKind::Leave));
    }

    struct Failing;

    impl AoiListener for Failing {
        fn on_enter(&self, _observer: NodeHandle, _nodes: &[NodeView]) -> ListenerResult {
            Err("boom".into())
        }
    }

    #[test]
    fn dispatch_stops_at_first_failure() {
        let rec = Arc::new(super::helpers::Recorder::default());
        let mut arena: NodeArena<()> = NodeArena::new();
        let actor = arena.insert(NodeSpec::new(0.0, 0.0, 1.0).listener(rec.clone())).unwrap();
        let bad = arena.insert(NodeSpec::new(1.0, 0.0, 1.0).listener(Arc::new(Failing))).unwrap();

        let neighbors: NeighborSet = [bad].into_iter().collect();
        let err = Notifications::entered(&arena, actor, &neighbors).dispatch().unwrap_err();
        assert!(matches!(err, AoiError::Listener { observer, .. } if observer == bad));
        // The actor's batch was planned after the failing delivery.
        assert!(rec.events.lock().unwrap().is_empty());
    }

    #[test]
    fn plans_dispatch_in_ticket_order() {
        let (arena, rec, h) = super::helpers::arena(1);
        let order = DispatchOrder::new();
        let first = order.ticket();
        let second = order.ticket();
        let enter = Notifications::entered(&arena, h[0], &NeighborSet::new());
        let leave = Notifications::left(&arena, h[0], &NeighborSet::new());

        std::thread::scope(|s| {
            let order = &order;
            s.spawn(move || order.dispatch(second, leave).unwrap());
            std::thread::sleep(std::time::Duration::from_millis(20));
            order.dispatch(first, enter).unwrap();
        });

        let kinds: Vec<_> = rec.events.lock().unwrap().iter().map(|e| e.1).collect();
        assert_eq!(kinds, vec![EventKind::Enter, EventKind::Leave]);
    }

    #[test]
    fn failed_dispatch_passes_the_turn() {
        let rec = Arc::new(super::helpers::Recorder::default());
        let mut arena: NodeArena<()> = NodeArena::new();
        let actor = arena.insert(NodeSpec::new(0.0, 0.0, 1.0).listener(rec.clone())).unwrap();
        let bad = arena.insert(NodeSpec::new(1.0, 0.0, 1.0).listener(Arc::new(Failing))).unwrap();
        let neighbors: NeighborSet = [bad].into_iter().collect();

        let order = DispatchOrder::new();
        let first = order.ticket();
        let second = order.ticket();
        assert!(order.dispatch(first, Notifications::entered(&arena, actor, &neighbors)).is_err());
        order.dispatch(second, Notifications::left(&arena, actor, &NeighborSet::new())).unwrap();
        assert_eq!(*rec.events.lock().unwrap(), vec![(actor, EventKind::Leave, Vec::<NodeHandle>::new())]);
    }
}
