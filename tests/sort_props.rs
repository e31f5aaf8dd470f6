use proptest::prelude::*;
use tournament_sort::*;
use test_helpers::*;

proptest! {
    #[test]
    fn parent_inverts_children(raw in 0usize..1_000_000) {
        let node = NodeId::new(raw);
        prop_assert_eq!(node.left().parent(), Some(node));
        prop_assert_eq!(node.right().parent(), Some(node));
    }

    #[test]
    fn roles_partition_nodes(half in 1usize..200, elements in 0usize..50) {
        let nodes = 2 * half + 1;
        let leaves = half + 1;
        prop_assume!(elements <= leaves);
        let topology = Topology::new(nodes, elements).expect("valid shape");

        for id in topology.nodes() {
            let leaf = topology.is_leaf(id);
            prop_assert!(!(leaf && id.is_root()), "root cannot be a leaf");
            if let Some((left, right)) = topology.children(id) {
                prop_assert!(topology.contains(left) && topology.contains(right));
            }
            prop_assert_eq!(leaf, topology.role(id) == Role::Leaf);
        }
    }

    #[test]
    fn emits_ascending_permutation(input in proptest::collection::vec(any::<i64>(), 0..40)) {
        let report = sort_balanced(&input, RuntimeKind::Lockstep);
        prop_assert_eq!(report.sorted, std_sorted(&input));
        prop_assert!(report.ledger.all_stopped());
    }

    #[test]
    fn output_independent_of_input_order(
        (base, shuffled) in proptest::collection::vec(-20i64..20, 2..24)
            .prop_flat_map(|base| (Just(base.clone()), Just(base).prop_shuffle()))
    ) {
        let first = sort_exact(&base, RuntimeKind::Lockstep);
        let second = sort_exact(&shuffled, RuntimeKind::Lockstep);
        prop_assert_eq!(&first.sorted, &second.sorted);
        prop_assert_eq!(first.sorted, std_sorted(&base));
    }
}
