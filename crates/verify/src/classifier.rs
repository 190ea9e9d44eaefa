//! Verification classifier

use chrono::{DateTime, Utc};
use safeprune_events::{AppEvent, EventEmitter, EventSender, VerificationEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::oracle::{FailureKind, Oracle, OracleAnswer};

/// Classification of one candidate file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub file: String,
    pub safe: bool,
    pub reason: String,
    pub answer: OracleAnswer,
}

impl Verdict {
    fn from_answer(file: String, answer: OracleAnswer) -> Self {
        Self {
            file,
            safe: answer.exists(),
            reason: answer.reason(),
            answer,
        }
    }
}

/// Partition of a candidate list into safe and unsafe files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One verdict per distinct candidate, in input order
    pub verdicts: Vec<Verdict>,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.verdicts.len()
    }

    pub fn safe(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| v.safe)
    }

    pub fn unsafe_files(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.safe)
    }

    #[must_use]
    pub fn safe_count(&self) -> usize {
        self.safe().count()
    }

    #[must_use]
    pub fn unsafe_count(&self) -> usize {
        self.unsafe_files().count()
    }

    #[must_use]
    pub fn verdict(&self, file: &str) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| v.file == file)
    }
}

/// Runs the oracle over candidate files, one at a time
pub struct Classifier {
    oracle: Oracle,
    event_sender: Option<EventSender>,
}

impl EventEmitter for Classifier {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

impl Classifier {
    #[must_use]
    pub fn new(oracle: Oracle) -> Self {
        Self {
            oracle,
            event_sender: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    /// Classify a single file
    pub async fn verify_file(&self, file: &str) -> Verdict {
        self.emit(AppEvent::Verification(VerificationEvent::FileQueried {
            file: file.to_string(),
        }));

        let answer = self.oracle.query(file).await;
        if let OracleAnswer::Failed {
            kind: FailureKind::Malformed,
            detail,
        } = &answer
        {
            self.emit(AppEvent::Verification(VerificationEvent::MalformedResponse {
                file: file.to_string(),
                message: detail.clone(),
            }));
        }

        let verdict = Verdict::from_answer(file.to_string(), answer);
        tracing::debug!(file = %verdict.file, safe = verdict.safe, "classified");
        self.emit(AppEvent::Verification(VerificationEvent::FileClassified {
            file: verdict.file.clone(),
            safe: verdict.safe,
            reason: verdict.reason.clone(),
        }));
        verdict
    }

    /// Classify every candidate.
    ///
    /// Duplicates are queried once and kept at their first position. Queries
    /// run sequentially.
    pub async fn classify<S: AsRef<str>>(&self, filenames: &[S]) -> ClassificationReport {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = filenames
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| seen.insert(*name))
            .collect();

        self.emit(AppEvent::Verification(VerificationEvent::Started {
            total: unique.len(),
            owner: self.oracle.owner().to_string(),
        }));

        let mut verdicts = Vec::with_capacity(unique.len());
        for file in unique {
            verdicts.push(self.verify_file(file).await);
        }

        let report = ClassificationReport {
            verdicts,
            timestamp: Utc::now(),
        };

        self.emit(AppEvent::Verification(VerificationEvent::Completed {
            total: report.total(),
            safe: report.safe_count(),
            unsafe_count: report.unsafe_count(),
        }));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safeprune_remote::InMemoryRemote;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_duplicates_collapse_to_first_occurrence() {
        let remote = Arc::new(InMemoryRemote::new().with_repository("core", ["a"]));
        let classifier = Classifier::new(Oracle::new(remote.clone(), "org"));

        let report = classifier.classify(&["b", "a", "b", "a"]).await;
        let files: Vec<_> = report.verdicts.iter().map(|v| v.file.as_str()).collect();
        assert_eq!(files, vec!["b", "a"]);
        assert_eq!(remote.searches().await, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_emits_events_in_order() {
        let remote = Arc::new(InMemoryRemote::new().with_repository("core", ["a"]));
        let (tx, mut rx) = safeprune_events::channel();
        let classifier = Classifier::new(Oracle::new(remote, "org")).with_event_sender(tx);

        let _ = classifier.classify(&["a"]).await;
        drop(classifier);

        let mut kinds = Vec::new();
        while let Some(message) = rx.recv().await {
            if let AppEvent::Verification(event) = message.event {
                kinds.push(match event {
                    VerificationEvent::Started { .. } => "started",
                    VerificationEvent::FileQueried { .. } => "queried",
                    VerificationEvent::FileClassified { .. } => "classified",
                    VerificationEvent::Completed { .. } => "completed",
                    _ => "other",
                });
            }
        }
        assert_eq!(kinds, vec!["started", "queried", "classified", "completed"]);
    }

    #[test]
    fn test_empty_report_counts() {
        let report = ClassificationReport {
            verdicts: Vec::new(),
            timestamp: Utc::now(),
        };
        assert_eq!(report.total(), 0);
        assert_eq!(report.safe_count() + report.unsafe_count(), 0);
    }
}
