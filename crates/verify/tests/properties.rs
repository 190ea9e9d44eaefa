//! Partition properties of the classifier

use proptest::prelude::*;
use safeprune_remote::{InMemoryRemote, ScriptedFailure};
use safeprune_verify::{Classifier, CleanupReport, Oracle};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Remote {
    Present,
    Absent,
    Fails,
}

fn candidate() -> impl Strategy<Value = (String, Remote)> {
    (
        "[a-e]{1,2}\\.txt",
        prop_oneof![Just(Remote::Present), Just(Remote::Absent), Just(Remote::Fails)],
    )
}

fn run(candidates: &[(String, Remote)]) -> CleanupReport {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let present: Vec<String> = candidates
            .iter()
            .filter(|(_, r)| matches!(r, Remote::Present))
            .map(|(name, _)| name.clone())
            .collect();
        let remote = Arc::new(InMemoryRemote::new().with_repository("repo", present));
        for (name, r) in candidates {
            if matches!(r, Remote::Fails) {
                remote
                    .fail_search(name, ScriptedFailure::Failed("boom".into()))
                    .await;
            }
        }

        let names: Vec<&str> = candidates.iter().map(|(n, _)| n.as_str()).collect();
        let classifier = Classifier::new(Oracle::new(remote, "org"));
        CleanupReport::from(&classifier.classify(&names).await)
    })
}

proptest! {
    #[test]
    fn partition_is_total_and_disjoint(candidates in proptest::collection::vec(candidate(), 0..12)) {
        let report = run(&candidates);

        let input: BTreeSet<&str> = candidates.iter().map(|(n, _)| n.as_str()).collect();
        let safe: BTreeSet<&str> = report.safe_files.iter().map(|(n, _)| n.as_str()).collect();
        let unsafe_: BTreeSet<&str> = report.unsafe_files.iter().map(|(n, _)| n.as_str()).collect();

        prop_assert_eq!(report.safe_to_delete + report.unsafe_to_delete, report.total_files);
        prop_assert_eq!(report.total_files, input.len());
        prop_assert!(safe.is_disjoint(&unsafe_));
        let union: BTreeSet<&str> = safe.union(&unsafe_).copied().collect();
        prop_assert_eq!(union, input);
    }

    #[test]
    fn failed_queries_never_safe(name in "[a-z]{1,8}\\.py") {
        let report = run(&[(name.clone(), Remote::Fails)]);
        prop_assert_eq!(report.safe_to_delete, 0);
        prop_assert_eq!(&report.unsafe_files[0].0, &name);
    }
}
