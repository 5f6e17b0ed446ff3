use bmt_deploy::ledger::Ledger;
use bmt_deploy::manifest::{parse_hosts, parse_manifest};
use std::collections::HashSet;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("bmt_{}_{}", name, std::process::id()))
}

/// Ledger fidelity: every host recorded as successful appears exactly once in complete.txt.
#[test]
fn ledger_records_each_success_exactly_once() {
    let path = temp_path("ledger_fidelity.txt");
    let _ = std::fs::remove_file(&path);
    let ledger = Ledger::new(path.clone());
    ledger.clear().unwrap();

    let hosts = parse_hosts("10.0.0.1\n10.0.0.2\n10.0.0.3\n");
    for h in &hosts {
        ledger.append(&h.0).unwrap();
    }
    // Simulate a retry round re-appending an already-successful host.
    ledger.append(&hosts[0].0).unwrap();

    let recorded = ledger.read_all().unwrap();
    assert_eq!(recorded.len(), 3);
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().filter(|l| *l == hosts[0].0).count(), 1);

    let _ = std::fs::remove_file(&path);
}

/// No-partial-success: a host only belongs to `success` once every manifest entry for it
/// has completed; modeling the orchestrator's round bookkeeping directly.
#[test]
fn host_joins_success_only_after_all_entries_done() {
    let (entries, warnings) = parse_manifest("a.bin=/tmp/\nb.bin=/tmp/\n");
    assert!(warnings.is_empty());
    assert_eq!(entries.len(), 2);

    let mut done_for_host: HashSet<&str> = HashSet::new();
    let mut success: HashSet<&str> = HashSet::new();
    let host = "10.0.0.1";

    // First entry completes: host must not yet be in success.
    done_for_host.insert(&entries[0].filename);
    if done_for_host.len() == entries.len() {
        success.insert(host);
    }
    assert!(!success.contains(host));

    // Second entry completes: now the host may join success.
    done_for_host.insert(&entries[1].filename);
    if done_for_host.len() == entries.len() {
        success.insert(host);
    }
    assert!(success.contains(host));
}

/// remaining ∪ success == all_hosts and remaining ∩ success == ∅ invariant.
#[test]
fn remaining_and_success_partition_all_hosts() {
    let hosts = parse_hosts("10.0.0.1\n10.0.0.2\n10.0.0.3\n10.0.0.4\n");
    let all: HashSet<String> = hosts.iter().map(|h| h.0.clone()).collect();
    let mut success: HashSet<String> = HashSet::new();
    success.insert(hosts[0].0.clone());
    success.insert(hosts[2].0.clone());

    let remaining: HashSet<String> = all.difference(&success).cloned().collect();
    let union: HashSet<String> = remaining.union(&success).cloned().collect();
    assert_eq!(union, all);
    assert!(remaining.is_disjoint(&success));
}
