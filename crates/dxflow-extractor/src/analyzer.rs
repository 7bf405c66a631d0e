//! Core Analyzer implementation

use crate::assembler::{assemble, ConfidenceScorer};
use crate::concepts::extract;
use crate::config::{AnalyzerConfig, ConfidenceMode, FallbackPolicy};
use crate::differential::synthesize;
use crate::error::AnalyzerError;
use crate::fallback::static_fallback;
use crate::layout::{arrange, forced, select_layout};
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::validate::validate_result;
use dxflow_domain::traits::LlmProvider;
use dxflow_domain::{AnalysisId, AnalysisMetadata, AnalysisResult, AnalysisSource, Concept};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// The Analyzer turns a clinical note into a workflow graph
///
/// Inference is tried first when a provider is configured and enabled.
/// Collaborator failures are retried, then replaced by the configured
/// fallback; they never reach the caller.
pub struct Analyzer<L>
where
    L: LlmProvider,
{
    llm_provider: Option<Arc<L>>,
    config: AnalyzerConfig,
}

impl<L> Analyzer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Analyzer; `None` runs the rule-based pipeline only
    pub fn new(llm_provider: Option<L>, config: AnalyzerConfig) -> Self {
        Self {
            llm_provider: llm_provider.map(Arc::new),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether analyze will consult the provider
    pub fn inference_enabled(&self) -> bool {
        self.config.inference.enabled && self.llm_provider.is_some()
    }

    /// Name of the configured model, if any
    pub fn model_name(&self) -> Option<&str> {
        self.llm_provider.as_deref().map(|llm| llm.model_name())
    }

    /// Reject notes that must not enter the pipeline
    pub fn check_note(&self, note: &str) -> Result<(), AnalyzerError> {
        if note.trim().is_empty() {
            return Err(AnalyzerError::EmptyNote);
        }
        let length = note.chars().count();
        if length > self.config.max_note_length {
            return Err(AnalyzerError::NoteTooLong(length, self.config.max_note_length));
        }
        Ok(())
    }

    /// Analyze a clinical note
    ///
    /// Only precondition failures (`EmptyNote`, `NoteTooLong`) are returned
    /// as errors.
    pub async fn analyze(&self, note: &str) -> Result<AnalysisResult, AnalyzerError> {
        let start_time = Instant::now();
        self.check_note(note)?;

        let note_length = note.chars().count();
        info!("Starting analysis, note length {}", note_length);

        let concepts = extract(note, self.config.match_mode);
        debug!("Extracted {} concepts", concepts.len());

        let mut notes = Vec::new();
        let mut attempts = 0;
        let inferred = match (&self.llm_provider, self.config.inference.enabled) {
            (Some(llm), true) => match self.infer(llm, note, &concepts, &mut attempts).await {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Inference failed after {} attempt(s): {}", attempts, e);
                    notes.push(format!("Inference failed after {} attempt(s): {}", attempts, e));
                    None
                }
            },
            (Some(_), false) => {
                notes.push("Inference disabled".to_string());
                None
            }
            (None, _) => {
                notes.push("No inference provider configured".to_string());
                None
            }
        };

        let mut result = match inferred {
            Some(result) => result,
            None => self.fallback(note, &concepts, &mut notes),
        };

        let mut layout = match self.config.layout {
            Some(algorithm) => forced(algorithm, result.nodes.len()),
            None => select_layout(result.nodes.len(), &result.edge_kinds()),
        };
        arrange(&mut layout, &mut result.nodes, &result.edges);

        result.metadata = AnalysisMetadata {
            analysis_id: AnalysisId::new(),
            source: result.metadata.source,
            generated_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            model_name: (attempts > 0)
                .then(|| self.model_name().map(str::to_string))
                .flatten(),
            note_length,
            inference_attempts: attempts,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            layout,
            notes,
        };

        info!(
            "Analysis complete via {}: {} diagnoses, {} actions, {} problems, {} layout",
            result.metadata.source.as_str(),
            result.diagnoses().count(),
            result.actions().count(),
            result.problem_list.len(),
            result.metadata.layout.algorithm
        );

        Ok(result)
    }

    /// Run the rule-based pipeline without layout or metadata
    pub fn deterministic(&self, note: &str) -> AnalysisResult {
        let concepts = extract(note, self.config.match_mode);
        self.run_pipeline(note, &concepts)
    }

    fn run_pipeline(&self, note: &str, concepts: &[Concept]) -> AnalysisResult {
        let synthesis = synthesize(concepts, note, self.config.match_mode);
        let mut scorer = match self.config.confidence {
            ConfidenceMode::Ranked => ConfidenceScorer::ranked(),
            ConfidenceMode::Seeded { seed } => ConfidenceScorer::seeded(seed),
        };
        let mut result = assemble(concepts, &synthesis, &mut scorer);
        result.metadata.source = AnalysisSource::Deterministic;
        result
    }

    fn fallback(&self, note: &str, concepts: &[Concept], notes: &mut Vec<String>) -> AnalysisResult {
        match self.config.fallback {
            FallbackPolicy::Static => {
                info!("Using static fallback");
                static_fallback()
            }
            FallbackPolicy::Deterministic => {
                let result = self.run_pipeline(note, concepts);
                match validate_result(&result) {
                    Ok(()) => result,
                    Err(e) => {
                        warn!("Deterministic result rejected: {}", e);
                        notes.push(format!("Deterministic result rejected: {}", e));
                        static_fallback()
                    }
                }
            }
        }
    }

    /// Attempt inference with the configured retry policy
    async fn infer(
        &self,
        llm: &Arc<L>,
        note: &str,
        concepts: &[Concept],
        attempts: &mut u32,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let hints = concepts
            .iter()
            .take(self.config.inference.context_concepts_limit)
            .cloned()
            .collect();
        let prompt = PromptBuilder::new(note).with_concept_hints(hints).build();
        debug!("Prompt length: {} chars", prompt.len());

        let max_attempts = self.config.inference.max_retries + 1;
        let mut last_error = AnalyzerError::Llm("No inference attempt made".to_string());

        for attempt in 1..=max_attempts {
            *attempts = attempt;
            match self.attempt(llm, &prompt).await {
                Ok(result) => {
                    info!("Inference succeeded on attempt {}/{}", attempt, max_attempts);
                    return Ok(result);
                }
                Err(e) => {
                    warn!("Inference attempt {}/{} failed: {}", attempt, max_attempts, e);
                    last_error = e;
                }
            }
            if attempt < max_attempts {
                sleep(self.config.inference.retry_delay()).await;
            }
        }

        Err(last_error)
    }

    /// One inference call: reply, parse, validate
    async fn attempt(&self, llm: &Arc<L>, prompt: &str) -> Result<AnalysisResult, AnalyzerError> {
        let reply = timeout(self.config.inference.timeout(), self.call_llm(llm, prompt))
            .await
            .map_err(|_| AnalyzerError::Timeout)??;

        debug!("LLM response length: {} chars", reply.len());

        let graph = parse_llm_response(&reply)?;
        let result = AnalysisResult {
            nodes: graph.nodes,
            edges: graph.edges,
            problem_list: graph.problem_list,
            metadata: AnalysisMetadata {
                source: AnalysisSource::Inference,
                ..AnalysisMetadata::default()
            },
        };
        validate_result(&result)?;
        Ok(result)
    }

    /// Call the LLM provider
    async fn call_llm(&self, llm: &Arc<L>, prompt: &str) -> Result<String, AnalyzerError> {
        let llm = Arc::clone(llm);
        let prompt = prompt.to_string();
        let json_mode = self.config.inference.json_mode;

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            let reply = if json_mode {
                llm.generate_json(&prompt)
            } else {
                llm.generate(&prompt)
            };
            reply.map_err(|e| AnalyzerError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| AnalyzerError::Llm(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxflow_llm::MockProvider;

    fn offline() -> Analyzer<MockProvider> {
        Analyzer::new(None, AnalyzerConfig::default())
    }

    #[tokio::test]
    async fn test_empty_note_is_rejected() {
        let result = offline().analyze("   ").await;
        assert_eq!(result, Err(AnalyzerError::EmptyNote));
    }

    #[tokio::test]
    async fn test_note_too_long() {
        let analyzer = offline();
        let note = "a".repeat(analyzer.config().max_note_length + 1);
        let result = analyzer.analyze(&note).await;
        assert!(matches!(result, Err(AnalyzerError::NoteTooLong(_, _))));
    }

    #[tokio::test]
    async fn test_offline_analysis_records_reason() {
        let result = offline().analyze("fever").await.unwrap();
        assert_eq!(result.metadata.source, AnalysisSource::Deterministic);
        assert_eq!(result.metadata.inference_attempts, 0);
        assert!(result.metadata.model_name.is_none());
        assert_eq!(result.metadata.notes, vec!["No inference provider configured"]);
    }

    #[tokio::test]
    async fn test_disabled_inference_skips_provider() {
        let provider = MockProvider::failing();
        let analyzer = Analyzer::new(Some(provider.clone()), AnalyzerConfig::offline());
        assert!(!analyzer.inference_enabled());

        let result = analyzer.analyze("fever").await.unwrap();
        assert_eq!(provider.call_count(), 0);
        assert_eq!(result.metadata.notes, vec!["Inference disabled"]);
    }

    #[tokio::test]
    async fn test_metadata_is_filled() {
        let result = offline().analyze("chest pain").await.unwrap();
        assert_eq!(result.metadata.note_length, "chest pain".len());
        assert!(result.metadata.generated_at > 0);
        assert_eq!(result.metadata.layout.algorithm, dxflow_domain::LayoutAlgorithm::Hierarchical);
    }

    #[tokio::test]
    async fn test_layout_override() {
        let config = AnalyzerConfig {
            layout: Some(dxflow_domain::LayoutAlgorithm::Grid),
            ..AnalyzerConfig::default()
        };
        let analyzer: Analyzer<MockProvider> = Analyzer::new(None, config);
        let result = analyzer.analyze("chest pain").await.unwrap();
        assert_eq!(result.metadata.layout.algorithm, dxflow_domain::LayoutAlgorithm::Grid);
    }

    #[test]
    fn test_deterministic_matches_pipeline() {
        let analyzer = offline();
        let a = analyzer.deterministic("72-year-old female with fever");
        let b = analyzer.deterministic("72-year-old female with fever");
        assert_eq!(a, b);
        assert!(validate_result(&a).is_ok());
    }
}
