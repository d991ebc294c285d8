use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use folio_catalog::parse_filename;
use folio_lib::util::file_name_string;

/// Show how each name would be interpreted by an import.
pub(crate) fn run_parse(names: Vec<String>) -> Result<(), crate::CliError> {
    for raw in &names {
        // Accept paths too; only the final component is parsed.
        let name = file_name_string(Path::new(raw)).unwrap_or_else(|| raw.clone());
        let parsed = parse_filename(&name);

        match (parsed.record_id, parsed.rule) {
            (Some(id), Some(rule)) => {
                let slot = parsed
                    .slot_suffix
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "primary".to_string());
                let title = if parsed.title_hint.is_empty() {
                    String::new()
                } else {
                    format!("  \"{}\"", parsed.title_hint)
                };
                log::info!(
                    "{} {} record {}, slot {}{} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    name,
                    id.if_supports_color(Stdout, |t| t.bold()),
                    slot,
                    title,
                    format!("(rule {})", rule.number()).if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            _ => {
                log::info!(
                    "{} {} {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    name,
                    "unrecognized".if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
    Ok(())
}
