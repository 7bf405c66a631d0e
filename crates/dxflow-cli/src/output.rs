//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use dxflow_domain::{AnalysisResult, GraphNode, NodeDetail, Priority};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis result.
    pub fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => Ok(self.format_analysis_table(result)),
            OutputFormat::Quiet => Ok(self.format_analysis_quiet(result)),
        }
    }

    fn format_analysis_table(&self, result: &AnalysisResult) -> String {
        let mut sections = vec![
            self.colorize("Differential diagnoses", "cyan"),
            diagnosis_table(result),
            self.colorize("Next actions", "cyan"),
            self.action_table(result),
            self.colorize("Problem list", "cyan"),
            problem_table(result),
        ];

        let meta = &result.metadata;
        let mut summary = format!(
            "Source: {} | Layout: {} | {} nodes, {} edges | {} ms",
            meta.source.as_str(),
            meta.layout.algorithm,
            result.nodes.len(),
            result.edges.len(),
            meta.processing_time_ms
        );
        if let Some(model) = &meta.model_name {
            summary.push_str(&format!(" | Model: {}", model));
        }
        sections.push(self.info(&summary));
        for note in &meta.notes {
            sections.push(self.warning(note));
        }

        sections.join("\n")
    }

    /// One line per problem: code, then diagnosis.
    fn format_analysis_quiet(&self, result: &AnalysisResult) -> String {
        result
            .problem_list
            .iter()
            .map(|p| format!("{}\t{}", p.code, p.diagnosis))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn action_table(&self, result: &AnalysisResult) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ID", "Action", "Category", "Priority", "Timing", "For"]);

        for node in result.actions() {
            if let NodeDetail::NextAction {
                priority,
                timing,
                diagnosis_id,
            } = &node.detail
            {
                let target = result
                    .node(diagnosis_id)
                    .map(|dx| dx.label.as_str())
                    .unwrap_or(diagnosis_id.as_str());
                let priority = self.priority(*priority);
                builder.push_record([
                    node.id.as_str(),
                    node.label.as_str(),
                    node.category.as_str(),
                    priority.as_str(),
                    timing.as_str(),
                    target,
                ]);
            }
        }

        render(builder)
    }

    /// Priority label, colored by urgency.
    fn priority(&self, priority: Priority) -> String {
        let color = match priority {
            Priority::Urgent => "red",
            Priority::High => "yellow",
            Priority::Medium => "blue",
            Priority::Low => "",
        };
        self.colorize(priority.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn diagnosis_table(result: &AnalysisResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Diagnosis", "Category", "Likelihood", "Confidence", "Evidence"]);

    for node in result.diagnoses() {
        if let NodeDetail::Diagnosis {
            likelihood,
            confidence,
        } = node.detail
        {
            builder.push_record([
                node.id.clone(),
                node.label.clone(),
                node.category.clone(),
                format!("{:.2}", likelihood),
                format!("{:.2}", confidence),
                evidence_summary(node),
            ]);
        }
    }

    render(builder)
}

fn problem_table(result: &AnalysisResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Code", "Diagnosis", "Category", "Likelihood", "Status"]);

    for item in &result.problem_list {
        builder.push_record([
            item.code.clone(),
            item.diagnosis.clone(),
            item.category.clone(),
            format!("{:.2}", item.likelihood),
            item.status.as_str().to_string(),
        ]);
    }

    render(builder)
}

fn evidence_summary(node: &GraphNode) -> String {
    match node.evidence.as_slice() {
        [] => "-".to_string(),
        [only] => only.clone(),
        [first, rest @ ..] => format!("{} (+{})", first, rest.len()),
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
