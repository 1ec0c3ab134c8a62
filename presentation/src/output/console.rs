//! Console output formatter for analysis results

use super::messages::user_message;
use captionkit_application::BatchOutcome;
use captionkit_domain::{JobStatus, truncate_at_word_boundary};
use colored::Colorize;
use serde_json::json;
use std::path::Path;

/// Formats per-file batch outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one file's outcomes as text
    pub fn format(file: &Path, batch: &BatchOutcome<String>, max_length: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", Self::file_header(file)));

        let width = batch.outcomes.keys().map(|k| k.len()).max().unwrap_or(0);
        for (key, outcome) in &batch.outcomes {
            let label = format!("{:<width$}", key, width = width);
            match outcome {
                Ok(result) => {
                    let text = Self::display_text(&result.generated_text, max_length);
                    output.push_str(&format!("  {}  {}", label.cyan().bold(), text));
                    if let Some(source) = &result.source_model {
                        output.push_str(&format!(" {}", format!("[{}]", source).dimmed()));
                    }
                    output.push('\n');
                }
                Err(error) => {
                    output.push_str(&format!(
                        "  {}  {} {}\n",
                        label.red().bold(),
                        "x".red(),
                        user_message(error)
                    ));
                }
            }
        }

        if let Some(credits) = batch.remaining_credits() {
            output.push_str(&format!(
                "  {}\n",
                format!("credits remaining: {}", credits).dimmed()
            ));
        }
        output
    }

    /// Format one file's outcomes as a single-line JSON document.
    ///
    /// One line per file, so a multi-file run prints valid JSONL.
    pub fn format_json(file: &Path, batch: &BatchOutcome<String>, max_length: usize) -> String {
        let results: serde_json::Map<String, serde_json::Value> = batch
            .outcomes
            .iter()
            .map(|(key, outcome)| {
                let value = match outcome {
                    Ok(result) => json!({
                        "status": JobStatus::Success,
                        "text": Self::display_text(&result.generated_text, max_length),
                        "source": result.source_model,
                        "credits": result.remaining_credits,
                    }),
                    Err(error) => json!({
                        "status": JobStatus::Error,
                        "kind": error.kind,
                        "message": user_message(error),
                        "detail": error.detail,
                        "credits": error.credits,
                    }),
                };
                (key.clone(), value)
            })
            .collect();

        let document = json!({
            "file": file.display().to_string(),
            "rounds": batch.rounds,
            "credits": batch.remaining_credits(),
            "credits_exhausted": batch.credits_exhausted(),
            "results": results,
        });
        serde_json::to_string(&document).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the account balance answer of `--credits`
    pub fn format_credits(credits: i64, json_output: bool) -> String {
        if json_output {
            json!({ "credits": credits }).to_string()
        } else {
            format!("{} {}", "Credits remaining:".cyan().bold(), credits)
        }
    }

    /// Apply the display length limit; 0 leaves text untouched
    pub fn display_text(text: &str, max_length: usize) -> String {
        if max_length == 0 {
            text.trim().to_string()
        } else {
            truncate_at_word_boundary(text, max_length)
        }
    }

    fn file_header(file: &Path) -> String {
        format!("{} {}", "==".cyan(), file.display().to_string().bold())
    }
}
