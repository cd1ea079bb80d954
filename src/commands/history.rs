use crate::config::settings::Settings;
use crate::error::Result;
use crate::history::{Event, EventKind, History};
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: usize,
    pub errors: bool,
    pub kind: Option<EventKind>,
}

pub fn fetch(history: &History, query: &HistoryQuery) -> Result<Vec<Event>> {
    match (query.errors, query.kind) {
        (true, _) => history.recent_errors(query.limit),
        (false, Some(kind)) => history.recent_by_kind(kind, query.limit),
        (false, None) => history.recent(query.limit),
    }
}

pub fn run(settings: &Settings, query: HistoryQuery, format: OutputFormat) -> Result<()> {
    let history = History::open(&settings.database)?;
    let events = fetch(&history, &query)?;

    if format.is_machine() {
        return machine_output::emit_v1("history", &events, vec![], vec![], format);
    }

    if events.is_empty() {
        output::info("No recorded operations");
        return Ok(());
    }

    output::header("History");
    for event in &events {
        let status = if event.succeeded() {
            "ok".green().to_string()
        } else {
            format!("failed ({})", event.status).red().to_string()
        };
        println!(
            "  {}  {:<10}  {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            event.kind.to_string(),
            status
        );
    }

    Ok(())
}
