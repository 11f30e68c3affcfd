use crate::models::Cycle;
use crate::stats::{calculate_stats, cycle_duration};
use crate::utils::format_duration;
use chrono::Local;
use std::fmt::Write;

/// Plain-text summary of a session's cycles, printed after the UI closes.
pub fn render(cycles: &[Cycle]) -> String {
    let mut out = String::new();
    if cycles.is_empty() {
        out.push_str("No cycles recorded this session.\n");
        return out;
    }

    let _ = writeln!(out, "Pomo Session Report");
    let _ = writeln!(out, "===================");

    for cycle in cycles {
        let ran = match cycle_duration(cycle) {
            Some(d) => format_duration(d.num_seconds()),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "\n{}  {}",
            cycle.start_date.with_timezone(&Local).format("%H:%M"),
            cycle.task
        );
        let _ = writeln!(out, "  Planned:  {} min", cycle.minutes_amount);
        let _ = writeln!(out, "  Ran for:  {}", ran);
        let _ = writeln!(out, "  Status:   {}", cycle.status().label());
    }

    let stats = calculate_stats(cycles);
    let _ = writeln!(out, "\nTotals");
    let _ = writeln!(out, "------");
    let _ = writeln!(out, "Cycles:        {}", stats.total);
    let _ = writeln!(out, "Finished:      {}", stats.finished);
    let _ = writeln!(out, "Interrupted:   {}", stats.interrupted);
    let _ = writeln!(
        out,
        "Focused time:  {}",
        format_duration(stats.focused.num_seconds())
    );
    if let Some(longest) = stats.longest_finished {
        let _ = writeln!(
            out,
            "Longest cycle: {}",
            format_duration(longest.num_seconds())
        );
    }
    if stats.active > 0 {
        let _ = writeln!(out, "Still running: {}", stats.active);
    }

    out
}
