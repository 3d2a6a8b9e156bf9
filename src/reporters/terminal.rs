use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use crate::stats::SummaryStats;
use crate::types::{Band, MemberScore, ScoreReport, SimulationReport};

pub fn report_terminal(report: &ScoreReport) {
    println!(
        "{} — {} ({} members)",
        "📊 blame-metric".cyan().bold(),
        report.meta.source.bright_black(),
        report.meta.member_count.to_string().bright_black(),
    );
    println!();

    if report.members.is_empty() {
        println!("{}", "  No members to score.".yellow());
        println!();
        return;
    }

    println!("{}", member_table(&report.members));

    let notes = build_notes(&report.members);
    if !notes.is_empty() {
        println!();
        println!("{}", "💡 Notes:".cyan());
        for note in &notes {
            println!("    {} {}", "•".white(), note);
        }
    }

    println!();
}

pub fn report_simulation_terminal(report: &SimulationReport) {
    let meta = &report.meta;
    println!(
        "{} — {} trials of {} members (seed {}{})",
        "🎲 blame-metric simulate".cyan().bold(),
        meta.trials.to_string().bright_black(),
        meta.group_size.to_string().bright_black(),
        meta.seed.to_string().bright_black(),
        if meta.parallel { ", parallel" } else { "" },
    );
    println!();

    println!("{}", summary_table(&report.summary));

    if meta.group_size == 1 {
        println!();
        println!("{}", "⚠️  Groups of one have no spread; every score is NaN.".yellow());
    }
    println!();
}

// ─── Tables ───────────────────────────────────────────────────────────────────

// Cells carry comfy-table's own colors so column widths are measured from the
// plain text, never from ANSI escape bytes.
fn member_table(members: &[MemberScore]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "MEMBER", "SHARE", "", "BLAME", "BAND"]);

    for (i, m) in members.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{:2}", i + 1)),
            Cell::new(truncate_name(&m.name, 32)),
            Cell::new(format!("{:5.1}%", m.share * 100.0)),
            bar_cell(m.share),
            blame_cell(m.blame),
            band_cell(Band::of(m.blame)),
        ]);
    }
    table
}

fn summary_table(s: &SummaryStats) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["STATISTIC", "|BLAME|"]);
    table.add_row(vec![Cell::new("Arithmetic mean"), stat_cell(s.mean)]);
    table.add_row(vec![
        Cell::new("Geometric mean"),
        s.geometric_mean.map_or_else(|| Cell::new("undefined").fg(Color::Yellow), stat_cell),
    ]);
    table.add_row(vec![Cell::new("Standard deviation"), stat_cell(s.std_dev)]);
    table.add_row(vec![Cell::new("Sample size"), Cell::new(s.count)]);
    table
}

// ─── Cell builders ────────────────────────────────────────────────────────────

fn stat_cell(v: f64) -> Cell {
    if v.is_finite() { Cell::new(format!("{v:.4}")) } else { Cell::new(v).fg(Color::Yellow) }
}

/// Share bar, one block per 10%, in eighths.
fn bar_cell(share: f64) -> Cell {
    let eighths = (share.clamp(0.0, 1.0) * 80.0).round() as usize;
    let parts = ["", "▏", "▎", "▍", "▌", "▋", "▊", "▉"];
    let bar = "█".repeat(eighths / 8) + parts[eighths % 8];
    Cell::new(format!("{bar:<10}")).fg(Color::Cyan)
}

fn blame_cell(blame: f64) -> Cell {
    let text = format!("{blame:+.4}");
    match Band::of(blame) {
        Band::Outlier   => Cell::new(text).fg(Color::Red).add_attribute(Attribute::Bold),
        Band::Elevated  => Cell::new(text).fg(Color::Yellow),
        Band::Typical   => Cell::new(text).fg(Color::Green),
        Band::Undefined => Cell::new(text).fg(Color::DarkGrey),
    }
}

fn band_cell(band: Band) -> Cell {
    match band {
        Band::Outlier   => Cell::new("🔴 OUTLIER").fg(Color::Red),
        Band::Elevated  => Cell::new("🟠 ELEVATED").fg(Color::Yellow),
        Band::Typical   => Cell::new("🟢 TYPICAL").fg(Color::Green),
        Band::Undefined => Cell::new("⚪ UNDEFINED").fg(Color::DarkGrey),
    }
}

// ─── Other helpers ────────────────────────────────────────────────────────────

fn truncate_name(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    let head: String = s.chars().take(max - 1).collect();
    format!("{head}…")
}

fn build_notes(members: &[MemberScore]) -> Vec<String> {
    let mut notes = Vec::new();
    for m in members {
        let name = if m.name.is_empty() { "(unnamed)" } else { m.name.as_str() };
        match Band::of(m.blame) {
            Band::Outlier if m.blame > 0.0 => notes.push(format!(
                "{} holds {:.0}% of the lines — well above the group mean",
                name.yellow(), m.share * 100.0
            )),
            Band::Outlier => notes.push(format!(
                "{} holds {:.0}% of the lines — well below the group mean; worth a check-in",
                name.yellow(), m.share * 100.0
            )),
            Band::Undefined => notes.push(format!(
                "{} has no peers to compare against, so no score is defined",
                name.yellow()
            )),
            _ => {}
        }
    }
    notes
}
