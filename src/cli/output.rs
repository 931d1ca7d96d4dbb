//! Output formatting for the terminal.

use std::{ops::Range, time::Duration};

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

/// Message and table writer for the terminal.
///
/// Requested data (tables, detail views, bills) goes to stdout so it can be
/// piped; status chatter goes to stderr.
#[derive(Debug, Clone)]
pub struct Output {
    out: Term,
    err: Term,
}

impl Output {
    /// Create a writer over the process terminal.
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        self.err
            .write_line(&format!("{} {msg}", style("ℹ").blue()))
            .ok();
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        self.err
            .write_line(&format!("{} {msg}", style("✓").green()))
            .ok();
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        self.err
            .write_line(&format!("{} {msg}", style("⚠").yellow()))
            .ok();
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        self.err
            .write_line(&format!("{} {}", style("✗").red(), style(msg).red()))
            .ok();
    }

    /// Print a section header.
    pub fn header(&self, msg: &str) {
        self.out
            .write_line(&format!("\n{}", style(msg).bold().underlined()))
            .ok();
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        self.out
            .write_line(&format!("  {}: {value}", style(key).dim()))
            .ok();
    }

    /// Print a preformatted block as-is.
    pub fn write(&self, block: &str) {
        self.out.write_line(block).ok();
    }

    /// Print a bordered table with a bold header row; columns in `numeric`
    /// are right-aligned.
    pub fn table(&self, columns: &[&str], numeric: Range<usize>, rows: Vec<Vec<String>>) {
        let mut builder = Builder::default();

        builder.push_record(columns.iter().copied());

        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(numeric), Alignment::right());

        self.out.write_line(&table.to_string()).ok();
    }

    /// Start a spinner for indeterminate progress.
    #[must_use]
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let template = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_err| ProgressStyle::default_spinner());

        spinner.set_style(template);
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        spinner
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Style a lifecycle or payment status for detail views.
#[must_use]
pub fn status_badge(status: &str) -> String {
    match status.to_uppercase().as_str() {
        "ACTIVE" | "PAID" => style(status).green().to_string(),
        "PARTIAL" | "PENDING" => style(status).yellow().to_string(),
        "CREDIT" | "OUT_OF_STOCK" => style(status).red().to_string(),
        "INACTIVE" => style(status).dim().to_string(),
        _ => status.to_string(),
    }
}
