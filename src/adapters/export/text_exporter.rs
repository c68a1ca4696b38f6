//! CSV and Markdown rendering of a planning view.

use std::fmt::Write as _;

use crate::domain::foundation::Timestamp;
use crate::domain::planning::{PlanningView, SlotView};
use crate::ports::{ExportError, ExportFormat, ExportedDocument, PlanningExporter};

const CSV_HEADER: &[&str] = &[
    "position",
    "location",
    "start",
    "end",
    "required_people",
    "assigned_count",
    "member_id",
    "member_name",
    "member_role",
    "notification",
];

/// Renders plannings as text documents. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPlanningExporter;

impl TextPlanningExporter {
    pub fn new() -> Self {
        Self
    }

    fn render_csv(view: &PlanningView) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER).map_err(rendering)?;

        for slot_view in &view.slots {
            let slot = &slot_view.slot;
            let fixed = [
                slot.position().to_string(),
                slot.location().to_string(),
                format_time(slot.start()),
                format_time(slot.end()),
                slot.required_people().to_string(),
                slot_view.stats.assigned_count.to_string(),
            ];

            for assignment in &slot_view.assignments {
                let member = assignment.member();
                let mut record = fixed.to_vec();
                record.push(member.id.to_string());
                record.push(member.display_name.clone());
                record.push(member.role.clone().unwrap_or_default());
                record.push(assignment.notification().as_str().to_string());
                writer.write_record(&record).map_err(rendering)?;
            }

            // One empty row per open place
            for _ in 0..slot_view.stats.remaining {
                let mut record = fixed.to_vec();
                record.extend(std::iter::repeat(String::new()).take(4));
                writer.write_record(&record).map_err(rendering)?;
            }
        }

        let bytes = writer.into_inner().map_err(|e| ExportError::Rendering(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::Rendering(e.to_string()))
    }

    fn render_markdown(view: &PlanningView) -> Result<String, ExportError> {
        let planning = &view.planning;
        let mut out = String::new();

        writeln!(out, "# {}", escape_markdown(planning.name())).map_err(rendering)?;
        writeln!(out).map_err(rendering)?;
        writeln!(out, "- Date: {}", planning.reference_date()).map_err(rendering)?;
        writeln!(out, "- Status: {}", planning.status()).map_err(rendering)?;
        if let Some(event) = planning.event() {
            writeln!(out, "- Event: {}", escape_markdown(&event.name)).map_err(rendering)?;
        }
        writeln!(
            out,
            "- Filled: {}/{} ({})",
            view.stats.total_assigned, view.stats.total_required, view.stats.fill_rate
        )
        .map_err(rendering)?;
        if let Some(description) = planning.description() {
            writeln!(out).map_err(rendering)?;
            writeln!(out, "{}", escape_markdown(description)).map_err(rendering)?;
        }

        for slot_view in &view.slots {
            Self::render_markdown_slot(&mut out, slot_view).map_err(rendering)?;
        }

        Ok(out)
    }

    fn render_markdown_slot(out: &mut String, slot_view: &SlotView) -> std::fmt::Result {
        let slot = &slot_view.slot;
        let stats = &slot_view.stats;

        writeln!(out)?;
        writeln!(
            out,
            "## {} ({} - {})",
            escape_markdown(slot.location()),
            format_time(slot.start()),
            format_time(slot.end())
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "{}/{} assigned{}",
            stats.assigned_count,
            stats.required_people,
            if stats.is_full { ", full" } else { "" }
        )?;
        if let Some(notes) = slot.notes() {
            writeln!(out)?;
            writeln!(out, "> {}", escape_markdown(notes))?;
        }
        writeln!(out)?;
        writeln!(out, "| # | Member | Role | Notified |")?;
        writeln!(out, "|---|--------|------|----------|")?;

        let mut row = 1;
        for assignment in &slot_view.assignments {
            let member = assignment.member();
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                row,
                escape_markdown(&member.display_name),
                escape_markdown(member.role.as_deref().unwrap_or("")),
                if assignment.notification_sent() { "yes" } else { "no" }
            )?;
            row += 1;
        }
        for _ in 0..stats.remaining {
            writeln!(out, "| {} | _open_ | | |", row)?;
            row += 1;
        }
        Ok(())
    }
}

impl PlanningExporter for TextPlanningExporter {
    fn export(
        &self,
        view: &PlanningView,
        format: ExportFormat,
    ) -> Result<ExportedDocument, ExportError> {
        let content = match format {
            ExportFormat::Csv => Self::render_csv(view)?,
            ExportFormat::Markdown => Self::render_markdown(view)?,
        };

        Ok(ExportedDocument {
            format,
            file_name: file_name(view, format),
            content,
        })
    }
}

fn rendering(e: impl std::fmt::Display) -> ExportError {
    ExportError::Rendering(e.to_string())
}

fn format_time(ts: Timestamp) -> String {
    ts.as_datetime().format("%Y-%m-%d %H:%M").to_string()
}

/// Escapes characters that would break a Markdown table or heading.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '|' | '*' | '_' | '`' | '#' | '[' | ']' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' | '\r' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `<slug>-<date>.<ext>`; the slug keeps ASCII alphanumerics only.
fn file_name(view: &PlanningView, format: ExportFormat) -> String {
    let mut slug = String::new();
    for c in view.planning.name().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "planning" } else { slug };

    format!(
        "{}-{}.{}",
        slug,
        view.planning.reference_date(),
        format.extension()
    )
}
