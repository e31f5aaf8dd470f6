use std::collections::HashSet;

use blake3::hash;
use tournament_sort::*;
use test_helpers::*;

#[test]
fn transcripts_are_identical_across_runtimes() {
    let input = [12, 3, 3, 40, -7, 0, 12, 5, 9];

    let mut fingerprints = HashSet::new();
    for _ in 0..3 {
        for runtime in [RuntimeKind::Lockstep, RuntimeKind::Threaded] {
            let report = sort_balanced(&input, runtime);
            let transcript = report.transcript.expect("trace enabled");
            fingerprints.insert(transcript.fingerprint());
        }
    }

    assert_eq!(fingerprints.len(), 1, "transcripts diverged across runs");
}

#[test]
fn ledgers_match_across_runtimes() {
    let input = [8, 6, 7, 5, 3, 0, 9];
    let lockstep = sort_balanced(&input, RuntimeKind::Lockstep);
    let threaded = sort_balanced(&input, RuntimeKind::Threaded);

    assert_eq!(lockstep.ledger, threaded.ledger);
    assert_eq!(lockstep.root_rounds, threaded.root_rounds);
}

#[test]
fn rendered_output_is_stable() {
    let input = [2, 7, 1, 8, 2, 8];
    let mut digests = HashSet::new();
    for _ in 0..5 {
        let report = sort_balanced(&input, RuntimeKind::Threaded);
        let rendered: String = report.sorted.iter().map(|v| format!("{}\n", v)).collect();
        digests.insert(hash(rendered.as_bytes()));
    }
    assert_eq!(digests.len(), 1, "outputs diverged across runs");
}
