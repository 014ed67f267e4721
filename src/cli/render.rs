//! Text rendering for the menu, per-action outcome lines and the run summary.

use crate::actions::Registry;
use crate::config::RuntimeConfig;
use crate::error::AppError;
use crate::models::{ActionReport, Outcome, SkipReason};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

/// The numbered menu, with missing tools flagged and the exit row last.
pub fn menu_table(registry: &Registry, config: &RuntimeConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Action", "Needs"]);

    for action in registry.all() {
        let label = if config.is_destructive(action) {
            format!("{} (asks first)", action.label)
        } else {
            action.label.to_string()
        };
        let needs: Vec<String> = action
            .required_tools
            .iter()
            .map(|tool| {
                if config.tool_available(tool) {
                    tool.to_string()
                } else {
                    format!("{} (missing)", tool)
                }
            })
            .collect();
        table.add_row(vec![action.id.to_string(), label, needs.join(", ")]);
    }
    table.add_row(vec!["0".to_string(), "Exit".to_string(), String::new()]);
    table
}

/// The single tagged line reported for an action.
pub fn outcome_line(label: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success => format!("[ OK ] {} completed successfully.", label)
            .green()
            .to_string(),
        Outcome::Notice(notice) => format!("[INFO] {}: {}", label, notice).cyan().to_string(),
        Outcome::Skipped(SkipReason::MissingTool(tools)) => {
            let err = AppError::MissingTool(tools.clone());
            format!("[SKIP] {}: {}", label, err).yellow().to_string()
        },
        Outcome::Skipped(SkipReason::Declined) => {
            format!("[SKIP] {}: skipped, not confirmed.", label)
                .yellow()
                .to_string()
        },
        Outcome::Failed(err) => format!("[FAIL] {}: {}", label, err).red().to_string(),
    }
}

/// Per-action results of a full run, in execution order.
pub fn summary_table(reports: &[ActionReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Action", "Result"]);
    for report in reports {
        table.add_row(vec![
            report.id.to_string(),
            report.label.to_string(),
            report.outcome.tag().to_string(),
        ]);
    }
    table
}

/// `1m 05s` style rendering of an elapsed time.
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    if seconds >= 60 {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notice;

    #[test]
    fn test_menu_lists_every_action_and_exit() {
        let registry = Registry::new();
        let config = RuntimeConfig::for_tests().with_missing(&["reflector"]);
        let rendered = menu_table(&registry, &config).to_string();

        for action in registry.all() {
            assert!(rendered.contains(action.label), "{} missing", action.label);
        }
        assert!(rendered.contains("Exit"));
        assert!(rendered.contains("reflector (missing)"));
        assert!(rendered.contains("Remove orphaned packages (asks first)"));
    }

    #[test]
    fn test_outcome_lines_are_tagged() {
        colored::control::set_override(false);
        let label = "Remove orphaned packages";

        assert_eq!(
            outcome_line(label, &Outcome::Success),
            "[ OK ] Remove orphaned packages completed successfully."
        );
        assert_eq!(
            outcome_line(label, &Outcome::Notice(Notice::NoOrphans)),
            "[INFO] Remove orphaned packages: No orphaned packages to remove."
        );
        assert_eq!(
            outcome_line(label, &Outcome::Skipped(SkipReason::Declined)),
            "[SKIP] Remove orphaned packages: skipped, not confirmed."
        );
        assert_eq!(
            outcome_line(
                label,
                &Outcome::Skipped(SkipReason::MissingTool(vec!["pacman".into()]))
            ),
            "[SKIP] Remove orphaned packages: Missing Tool: pacman"
        );
        let failed = outcome_line(
            label,
            &Outcome::Failed(AppError::ActionFailure {
                command: "sudo pacman -Rns --noconfirm foo".into(),
                status: "exited with code 1".into(),
            }),
        );
        assert!(failed.starts_with("[FAIL] Remove orphaned packages"));
        assert!(failed.contains("exited with code 1"));
    }

    #[test]
    fn test_summary_table_rows() {
        let reports = vec![
            ActionReport {
                id: 3,
                label: "Refresh pacman mirror list",
                outcome: Outcome::Success,
            },
            ActionReport {
                id: 7,
                label: "Remove orphaned packages",
                outcome: Outcome::Notice(Notice::NoOrphans),
            },
        ];
        let rendered = summary_table(&reports).to_string();
        assert!(rendered.contains("Refresh pacman mirror list"));
        assert!(rendered.contains("nothing to do"));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(chrono::Duration::seconds(9)), "9s");
        assert_eq!(format_elapsed(chrono::Duration::seconds(65)), "1m 05s");
        assert_eq!(format_elapsed(chrono::Duration::seconds(-3)), "0s");
    }
}
