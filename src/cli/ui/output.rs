use console::style;
use serde::Serialize;
use serde_json::Value;

use crate::dashboard::Dashboard;
use crate::types::{PaddockError, QueryResult, Result, RouteMode, StandingEntry, json_string};

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value).map_err(PaddockError::Json)?);
        Ok(())
    }

    /// Print a raw payload: pretty JSON either way, under a title in text mode
    pub fn payload(&self, title: &str, value: &Value) -> Result<()> {
        if !self.is_json() {
            self.header(title);
        }
        self.json(value)
    }

    pub fn query_result(&self, result: &QueryResult) -> Result<()> {
        if self.is_json() {
            return self.json(result);
        }

        let mode = match result.mode() {
            RouteMode::Agent => style(result.mode().to_string()).green(),
            RouteMode::Fallback(_) => style(result.mode().to_string()).yellow(),
        };
        println!("{} {}", style("Route:").dim(), mode);

        if let Some(reason) = result.agent_error() {
            self.warning(&format!("Analysis service unavailable: {}", reason));
        }
        if let Some(reason) = result.handler_error() {
            self.warning(&format!("Fallback failed: {}", reason));
        }

        match result.data() {
            Some(data) if result.is_success() => {
                // Agent answers carry prose; everything else is shown structurally
                if let Some(text) = json_string(data, "response").or_else(|| json_string(data, "analysis")) {
                    println!("\n{}", text);
                } else {
                    println!("{}", serde_json::to_string_pretty(data).map_err(PaddockError::Json)?);
                }
            }
            _ => self.error(result.error().unwrap_or("query failed")),
        }
        Ok(())
    }

    pub fn standings(&self, title: &str, entries: &[StandingEntry]) -> Result<()> {
        if self.is_json() {
            return self.json(&entries);
        }

        self.section(title);
        if entries.is_empty() {
            self.info("No standings available");
            return Ok(());
        }
        for entry in entries {
            println!(
                "{:>3}  {:<24} {:<20} {:>7} pts  {:>2} wins",
                entry.position,
                style(&entry.name).bold(),
                entry.team,
                entry.points,
                entry.wins
            );
        }
        Ok(())
    }

    pub fn dashboard(&self, dashboard: &Dashboard) -> Result<()> {
        if self.is_json() {
            return self.json(dashboard);
        }

        self.header("Paddock Dashboard");
        if dashboard.agent_online {
            self.success("Analysis service online");
        } else {
            self.warning("Analysis service offline, queries use direct data");
        }

        if let Some(race) = &dashboard.next_race {
            let name = json_string(race, "raceName").unwrap_or_else(|| "Unknown race".to_string());
            let date = json_string(race, "date").unwrap_or_default();
            self.info(&format!("Next race: {} {}", name, style(date).dim()));
        }

        let top: Vec<StandingEntry> = dashboard.standings.iter().take(10).cloned().collect();
        self.standings("Drivers' Championship", &top)?;

        for failure in &dashboard.errors {
            self.warning(&format!("{} unavailable: {}", failure.panel, failure.error));
        }
        Ok(())
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(OutputFormat::Text)
    }
}
