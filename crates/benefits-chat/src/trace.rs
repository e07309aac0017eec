//! Read-only view of the agent trace from the most recent reply.
//!
//! The controller owns the trace and the viewer's visibility; this module
//! only projects entries into display cards.

use std::fmt::Write as _;

use benefits_core::models::trace::DebugEntry;

pub const PLACEHOLDER: &str =
    "No debug information available. Send a message to see agent interactions.";

/// Optional text fields of a trace entry, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceField {
    Thought,
    Reasoning,
    Action,
    Result,
}

impl TraceField {
    pub const ORDER: [TraceField; 4] = [
        TraceField::Thought,
        TraceField::Reasoning,
        TraceField::Action,
        TraceField::Result,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TraceField::Thought => "Thought",
            TraceField::Reasoning => "Reasoning",
            TraceField::Action => "Action",
            TraceField::Result => "Result",
        }
    }

    fn get(self, entry: &DebugEntry) -> Option<&str> {
        let value = match self {
            TraceField::Thought => entry.thought.as_deref(),
            TraceField::Reasoning => entry.reasoning.as_deref(),
            TraceField::Action => entry.action.as_deref(),
            TraceField::Result => entry.result.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// One rendered trace entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceCard {
    pub agent: String,
    pub time: String,
    pub fields: Vec<(TraceField, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceView {
    Placeholder,
    Entries(Vec<TraceCard>),
}

impl TraceView {
    pub fn cards(&self) -> &[TraceCard] {
        match self {
            TraceView::Placeholder => &[],
            TraceView::Entries(cards) => cards,
        }
    }

    /// Plain-text rendering, one block per card.
    pub fn render(&self) -> String {
        let cards = match self {
            TraceView::Placeholder => return PLACEHOLDER.to_string(),
            TraceView::Entries(cards) => cards,
        };

        let mut out = String::new();
        for (i, card) in cards.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}] {}", card.time, card.agent);
            for (field, text) in &card.fields {
                let _ = writeln!(out, "  {}: {}", field.label(), text);
            }
        }
        out
    }
}

pub fn project(trace: &[DebugEntry]) -> TraceView {
    if trace.is_empty() {
        return TraceView::Placeholder;
    }

    let cards = trace
        .iter()
        .map(|entry| TraceCard {
            agent: entry.agent.clone(),
            time: format_time(&entry.timestamp),
            fields: TraceField::ORDER
                .iter()
                .filter_map(|field| field.get(entry).map(|text| (*field, text.to_string())))
                .collect(),
        })
        .collect();

    TraceView::Entries(cards)
}

/// `HH:MM:SS` for RFC 3339 (shown in UTC) or naive ISO datetimes; anything
/// else is returned unchanged.
pub fn format_time(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
        return ts.strftime("%H:%M:%S").to_string();
    }
    if let Ok(dt) = raw.parse::<jiff::civil::DateTime>() {
        return dt.strftime("%H:%M:%S").to_string();
    }
    raw.to_string()
}

/// Visibility of the trace panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceViewer {
    visible: bool,
}

impl TraceViewer {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}
