//! Cancel-and-replace handling of repeated submissions
//!
//! Every submit takes a new generation number. A submit still running when
//! a newer one arrives returns `Superseded` and its result is dropped, so
//! only the newest completed analysis is ever stored.

use crate::analyzer::Analyzer;
use crate::error::AnalyzerError;
use dxflow_domain::traits::LlmProvider;
use dxflow_domain::AnalysisResult;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::info;

/// Analyzer plus the latest completed result
pub struct AnalysisSession<L>
where
    L: LlmProvider,
{
    analyzer: Analyzer<L>,
    generation: watch::Sender<u64>,
    latest: Mutex<Option<AnalysisResult>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<L> AnalysisSession<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a session around an analyzer
    pub fn new(analyzer: Analyzer<L>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            analyzer,
            generation,
            latest: Mutex::new(None),
        }
    }

    /// The wrapped analyzer
    pub fn analyzer(&self) -> &Analyzer<L> {
        &self.analyzer
    }

    /// Number of submissions accepted so far
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Latest completed result, if any
    pub fn latest(&self) -> Option<AnalysisResult> {
        lock(&self.latest).clone()
    }

    /// Analyze a note, replacing any analysis still in flight
    ///
    /// Notes rejected by precondition checks do not supersede anything.
    pub async fn submit(&self, note: &str) -> Result<AnalysisResult, AnalyzerError> {
        self.analyzer.check_note(note)?;

        let mut generation = 0;
        self.generation.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        let overtaken = overtaken(self.generation.subscribe(), generation);

        let result = tokio::select! {
            result = self.analyzer.analyze(note) => result?,
            _ = overtaken => {
                info!("Analysis generation {} superseded", generation);
                return Err(AnalyzerError::Superseded);
            }
        };

        let mut latest = lock(&self.latest);
        if *self.generation.borrow() != generation {
            info!("Analysis generation {} finished after being superseded", generation);
            return Err(AnalyzerError::Superseded);
        }
        *latest = Some(result.clone());
        Ok(result)
    }
}

/// Resolves once the generation moves past `generation`
async fn overtaken(mut receiver: watch::Receiver<u64>, generation: u64) {
    loop {
        if *receiver.borrow_and_update() != generation {
            return;
        }
        if receiver.changed().await.is_err() {
            // Sender lives as long as the session
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use dxflow_llm::MockProvider;

    fn session() -> AnalysisSession<MockProvider> {
        AnalysisSession::new(Analyzer::new(None, AnalyzerConfig::default()))
    }

    #[tokio::test]
    async fn test_submit_stores_latest() {
        let session = session();
        assert!(session.latest().is_none());

        let result = session.submit("chest pain").await.unwrap();
        assert_eq!(session.latest(), Some(result));
        assert_eq!(session.generation(), 1);
    }

    #[tokio::test]
    async fn test_rejected_note_does_not_bump_generation() {
        let session = session();
        assert_eq!(session.submit("").await, Err(AnalyzerError::EmptyNote));
        assert_eq!(session.generation(), 0);
        assert!(session.latest().is_none());
    }

    #[tokio::test]
    async fn test_sequential_submits_replace_result() {
        let session = session();
        session.submit("chest pain").await.unwrap();
        let second = session.submit("fever").await.unwrap();
        assert_eq!(session.latest().unwrap().metadata.analysis_id, second.metadata.analysis_id);
        assert_eq!(session.generation(), 2);
    }
}
