use std::fs;
use std::io::Write;
use std::path::Path;
use crate::stats::SummaryStats;
use crate::types::MemberScore;

/// One `name,score` line per member, score to four decimal places.
pub fn format_scores(scores: &[MemberScore]) -> String {
    scores.iter()
        .map(|s| format!("{},{:.4}\n", s.name, s.blame))
        .collect()
}

/// The four-line simulation summary.
pub fn format_summary(stats: &SummaryStats) -> String {
    let geometric = stats.geometric_mean.unwrap_or(f64::NAN);
    format!(
        "Arithmetic Mean: {}\nGeometric mean: {}\nStandard deviation: {}\nSample size: {}\n",
        stats.mean, geometric, stats.std_dev, stats.count,
    )
}

/// Writes `text` to a file if given, otherwise stdout.
pub fn emit(text: &str, output_file: Option<&Path>) -> Result<(), String> {
    match output_file {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            eprintln!("✓ Report written to {}", path.display());
        }
        None => {
            std::io::stdout().write_all(text.as_bytes())
                .map_err(|e| format!("Failed to write stdout: {e}"))?;
        }
    }
    Ok(())
}
