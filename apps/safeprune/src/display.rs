//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::Term;
use safeprune_config::ColorChoice;
use safeprune_health::TestReport;
use safeprune_ops::{OperationResult, RecoveryReport, RepositoryContents, VerifyReport};
use safeprune_recovery::{PublishOutcome, RestoreOutcome};
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            Self::render_json(result)
        } else {
            self.render_table(result);
            Ok(())
        }
    }

    fn render_json(result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_table(&self, result: &OperationResult) {
        match result {
            OperationResult::Verification(report) => self.render_verification(report),
            OperationResult::Restore(outcome) => Self::render_restore(outcome),
            OperationResult::Publish(outcome) => Self::render_publish(outcome),
            OperationResult::Recovery(report) => self.render_recovery(report),
            OperationResult::Contents(contents) => Self::render_contents(contents),
            OperationResult::HealthCheck(report) => self.render_health_check(report),
        }
    }

    fn render_verification(&self, verify: &VerifyReport) {
        let report = &verify.report;

        let mut table = self.new_table(&["File", "Status", "Reason"]);
        for (file, reason) in &report.safe_files {
            table.add_row(vec![
                Cell::new(file),
                self.status_cell("SAFE", Color::Green),
                Cell::new(reason),
            ]);
        }
        for (file, reason) in &report.unsafe_files {
            table.add_row(vec![
                Cell::new(file),
                self.status_cell("UNSAFE", Color::Red),
                Cell::new(reason),
            ]);
        }

        println!();
        println!("{table}");
        println!();
        println!(
            "Total: {}  Safe to delete: {}  Unsafe to delete: {}",
            report.total_files, report.safe_to_delete, report.unsafe_to_delete
        );
        println!("Report: {}", verify.report_path.display());
    }

    fn render_restore(outcome: &RestoreOutcome) {
        match (&outcome.source, outcome.restored) {
            (Some(source), true) => println!(
                "[OK] Restored {} from {} -> {}",
                outcome.file,
                source,
                outcome.destination.display()
            ),
            _ => println!("[ERROR] No backup of {} found", outcome.file),
        }
    }

    fn render_publish(outcome: &PublishOutcome) {
        if outcome.published {
            println!(
                "[OK] Published {} to {}",
                outcome.file, outcome.repository
            );
        } else {
            println!(
                "[ERROR] Publishing {} to {} failed at {}: {}",
                outcome.file,
                outcome.repository,
                outcome.failed_step.as_deref().unwrap_or("unknown step"),
                outcome.reason.as_deref().unwrap_or("no reason given")
            );
        }
    }

    fn render_recovery(&self, report: &RecoveryReport) {
        let icon = if report.is_success() { "[OK]" } else { "[ERROR]" };
        println!("{icon} Recovery of {} into {}", report.file, report.repository);
        println!();

        let mut table = self.new_table(&["Step", "Status", "Detail"]);

        let (status, detail) = match &report.restore {
            None => ("skipped", "file present locally".to_string()),
            Some(r) if r.restored => ("ok", r.source.clone().unwrap_or_default()),
            Some(_) => ("failed", "no backup found".to_string()),
        };
        table.add_row(vec![Cell::new("restore"), self.outcome_cell(status), Cell::new(detail)]);

        let (status, detail) = match &report.publish {
            None => ("skipped", String::new()),
            Some(p) if p.published => ("ok", p.repository.clone()),
            Some(p) => (
                "failed",
                format!(
                    "{}: {}",
                    p.failed_step.as_deref().unwrap_or("unknown step"),
                    p.reason.as_deref().unwrap_or_default()
                ),
            ),
        };
        table.add_row(vec![Cell::new("publish"), self.outcome_cell(status), Cell::new(detail)]);

        let (status, detail) = match &report.verdict {
            None => ("skipped", String::new()),
            Some(v) if v.safe => ("ok", v.reason.clone()),
            Some(v) => ("pending", v.reason.clone()),
        };
        table.add_row(vec![Cell::new("verify"), self.outcome_cell(status), Cell::new(detail)]);

        println!("{table}");
    }

    fn render_contents(contents: &RepositoryContents) {
        println!("{}/{}", contents.owner, contents.repository);
        if contents.entries.is_empty() {
            println!("  (no entries)");
        }
        for entry in &contents.entries {
            println!("  {entry}");
        }
    }

    fn render_health_check(&self, report: &TestReport) {
        let overall_icon = if report.is_healthy() { "[OK]" } else { "[ERROR]" };
        println!("{overall_icon} System Health Check");
        println!();

        let mut table = self.new_table(&["Check", "Status", "Message"]);
        for result in &report.test_results {
            let status = if result.passed {
                self.status_cell("PASS", Color::Green)
            } else {
                self.status_cell("FAIL", Color::Red)
            };
            table.add_row(vec![
                Cell::new(&result.name),
                status,
                Cell::new(result.message.as_deref().unwrap_or_default()),
            ]);
        }
        println!("{table}");
        println!();
        println!(
            "Passed {}/{} ({:.1}%)",
            report.passed_tests, report.total_tests, report.success_rate
        );
    }

    fn new_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.supports_color() {
            table.force_no_tty();
        }
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        table
    }

    fn status_cell(&self, text: &str, color: Color) -> Cell {
        if self.supports_color() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn outcome_cell(&self, status: &str) -> Cell {
        match status {
            "ok" => self.status_cell(status, Color::Green),
            "failed" => self.status_cell(status, Color::Red),
            "pending" => self.status_cell(status, Color::Yellow),
            _ => Cell::new(status),
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
