//! Correctness tests: emitted sequence is the ascending sort of the input

use test_case::test_case;
use tournament_sort::*;
use test_helpers::*;

#[test_case(RuntimeKind::Lockstep ; "lockstep")]
#[test_case(RuntimeKind::Threaded ; "threaded")]
fn test_representative_input(runtime: RuntimeKind) {
    let report = sort_balanced(&[3, 1, 4, 1, 5], runtime);
    assert_eq!(report.sorted, vec![1, 1, 3, 4, 5]);
}

#[test_case(&[] ; "empty")]
#[test_case(&[42] ; "single")]
#[test_case(&[2, 1] ; "pair")]
#[test_case(&[7, 7, 7, 7] ; "all equal")]
#[test_case(&[-1, -2, 0, -1, -2] ; "legacy sentinel values are ordinary numbers")]
#[test_case(&[i64::MAX, i64::MIN, 0] ; "extremes")]
#[test_case(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0] ; "descending")]
fn test_sorts_small_inputs(input: &[i64]) {
    for runtime in [RuntimeKind::Lockstep, RuntimeKind::Threaded] {
        let report = sort_balanced(input, runtime);
        assert_eq!(report.sorted, std_sorted(input), "runtime {}", runtime);
        assert!(report.ledger.all_stopped());
    }
}

#[test]
fn test_non_perfect_tree() {
    // p = 9: internal 0..4, leaves 4..9, node 3 hangs one level deeper
    let input = [50, 20, 40, 10, 30];
    let config = SortConfig::with_nodes(9, input.len());
    let report = Sorter::new(config).run(&input).unwrap();
    assert_eq!(report.sorted, vec![10, 20, 30, 40, 50]);
}

#[test]
fn test_surplus_leaves_start_empty() {
    let input = [5, 3];
    let config = SortConfig::with_nodes(15, input.len());
    let report = Sorter::new(config).run(&input).unwrap();
    assert_eq!(report.sorted, vec![3, 5]);
}

#[test]
fn test_streaming_emitter_sees_values_in_order() {
    let input = [6, 2, 9, 2, 0, 4];
    let mut seen = Vec::new();
    let config = SortConfig::balanced_for(input.len()).with_runtime(RuntimeKind::Threaded);

    let report = Sorter::new(config)
        .run_with(&input, &mut EmitFn(|value: i64| seen.push(value)))
        .unwrap();

    assert!(report.sorted.is_empty());
    assert_eq!(seen, vec![0, 2, 2, 4, 6, 9]);
}

#[test]
fn test_configuration_errors_surface_before_running() {
    let too_small = Sorter::new(SortConfig::with_nodes(7, 5)).run(&[1, 2, 3, 4, 5]);
    assert!(matches!(
        too_small,
        Err(SortError::InsufficientLeaves { leaves: 4, elements: 5 })
    ));

    let even = Sorter::new(SortConfig::with_nodes(8, 2)).run(&[1, 2]);
    assert!(matches!(even, Err(SortError::InvalidConfiguration(_))));
}

#[test]
fn test_sentinel_collision_rejected_at_boundary() {
    let config = SortConfig::balanced_for(3).with_sentinels(SentinelPolicy::Frames(IntegerFrames::default()));
    let result = Sorter::new(config).run(&[4, -2, 8]);
    assert!(matches!(
        result,
        Err(SortError::SentinelCollision { value: -2, index: 1 })
    ));
}
