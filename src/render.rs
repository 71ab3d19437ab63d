//! Terminal rendering of search results and answers.

use std::io::{self, Write};

use scmd_core::SearchOutcome;
use scmd_protocols::{CommandRecord, EmbeddingStats};

const RULE: &str = "══════════════════════════════════════════════════════════════";

/// Picks the fence tag a stored command is shown with.
pub(crate) trait CommandClassifier: Send + Sync {
    /// Language tag for the snippet, `None` when it reads as a shell command.
    fn language(&self, snippet: &str) -> Option<&'static str>;

    fn fence_tag(&self, snippet: &str) -> &'static str {
        self.language(snippet).unwrap_or("bash")
    }
}

/// A rule fires when the snippet contains every marker.
struct Rule {
    markers: &'static [&'static str],
    tag: &'static str,
}

/// Substring heuristics. Earlier rules win.
const RULES: &[Rule] = &[
    Rule { markers: &["PS>"], tag: "powershell" },
    Rule { markers: &["Get-"], tag: "powershell" },
    Rule { markers: &["<html>", "<body>"], tag: "html" },
    Rule { markers: &["<script>", "</script>"], tag: "html" },
    Rule { markers: &["stdio.h", "scanf"], tag: "c" },
    Rule { markers: &["#!", "/usr/bin/python"], tag: "python" },
    Rule { markers: &["{{end}}"], tag: "gotemplate" },
    Rule { markers: &["func", "{"], tag: "go" },
    Rule { markers: &["public", "{"], tag: "java" },
    Rule { markers: &["class", "{"], tag: "java" },
    Rule { markers: &["println", "{"], tag: "java" },
    Rule { markers: &["import", "{"], tag: "javascript" },
];

/// Default classifier driven by [`RULES`].
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct KeywordClassifier;

impl CommandClassifier for KeywordClassifier {
    fn language(&self, snippet: &str) -> Option<&'static str> {
        RULES
            .iter()
            .find(|rule| rule.markers.iter().all(|m| snippet.contains(m)))
            .map(|rule| rule.tag)
    }
}

pub(crate) struct Renderer<C: CommandClassifier = KeywordClassifier> {
    classifier: C,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        Self::with_classifier(KeywordClassifier)
    }
}

impl<C: CommandClassifier> Renderer<C> {
    pub(crate) fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Answer first (when there is one), then the matching records.
    pub(crate) fn outcome(
        &self,
        out: &mut impl Write,
        query: &str,
        outcome: &SearchOutcome,
    ) -> io::Result<()> {
        if outcome.has_answer() {
            self.answer(out, &outcome.answer, outcome.tokens)?;
        }

        if outcome.records.is_empty() {
            if !outcome.has_answer() {
                writeln!(out, "No results found for: {}", query)?;
            }
            return Ok(());
        }

        writeln!(out, "Found {} result(s) for: {}", outcome.records.len(), query)?;
        writeln!(out, "{}", RULE)?;
        for record in &outcome.records {
            self.record(out, record)?;
        }
        Ok(())
    }

    pub(crate) fn answer(&self, out: &mut impl Write, answer: &str, tokens: u32) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "🤖 AI Assistant:")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "{}", answer.trim_end())?;
        writeln!(out, "{}", RULE)?;
        if tokens > 0 {
            writeln!(out, "({} tokens)", tokens)?;
        }
        writeln!(out)
    }

    /// Description, then the command in a fenced block.
    pub(crate) fn record(&self, out: &mut impl Write, record: &CommandRecord) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "#{} {}", record.id, record.data.trim_end())?;
        writeln!(out, "```{}", self.classifier.fence_tag(&record.key))?;
        writeln!(out, "{}", record.key.trim_end())?;
        writeln!(out, "```")
    }

    /// One line per record: id, command, description.
    pub(crate) fn table(&self, out: &mut impl Write, records: &[CommandRecord]) -> io::Result<()> {
        if records.is_empty() {
            return writeln!(out, "No commands stored.");
        }
        writeln!(out, "{:<6} {:<40} {}", "ID", "COMMAND", "DESCRIPTION")?;
        writeln!(out, "{}", "-".repeat(80))?;
        for record in records {
            writeln!(
                out,
                "{:<6} {:<40} {}",
                record.id,
                truncate(first_line(&record.key), 40),
                truncate(first_line(&record.data), 60)
            )?;
        }
        Ok(())
    }

    pub(crate) fn stats(&self, out: &mut impl Write, stats: &EmbeddingStats) -> io::Result<()> {
        writeln!(out, "Total commands:        {}", stats.total)?;
        writeln!(out, "With embeddings:       {}", stats.with_embedding)?;
        writeln!(out, "Without embeddings:    {}", stats.without_embedding())?;
        writeln!(out, "Coverage:              {:.1}%", stats.percentage())
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
