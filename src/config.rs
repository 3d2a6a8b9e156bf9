use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when `--config` is not given.
pub const LOCAL_CONFIG: &str = ".blame-metric.yml";

/// All settings that can be placed in a .blame-metric.yml config file.
/// Every field is optional — omitted fields fall back to built-in defaults.
/// Command-line values always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    // Simulation defaults (overridden by the positional arguments / flags)
    pub trials: Option<usize>,
    pub group_size: Option<usize>,
    pub seed: Option<u64>,
    pub parallel: Option<bool>,

    // Output defaults
    pub score_format: Option<String>,
    pub simulate_format: Option<String>,
}

pub const SCORE_FORMATS:    &[&str] = &["csv", "terminal", "json"];
pub const SIMULATE_FORMATS: &[&str] = &["terminal", "plain", "json"];

impl MetricConfig {
    /// Validates semantic constraints that serde cannot enforce.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.trials {
            return Err("Invalid 'trials' value: 0. Must be 1 or greater".to_string());
        }
        if let Some(0) = self.group_size {
            return Err("Invalid 'group_size' value: 0. Must be 1 or greater".to_string());
        }
        check_format("score_format", self.score_format.as_deref(), SCORE_FORMATS)?;
        check_format("simulate_format", self.simulate_format.as_deref(), SIMULATE_FORMATS)?;
        Ok(())
    }
}

fn check_format(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), String> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(format!(
            "Invalid '{field}' value: \"{v}\". Expected one of: {}",
            allowed.iter().map(|a| format!("\"{a}\"")).collect::<Vec<_>>().join(", ")
        )),
        _ => Ok(()),
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<MetricConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config file '{}': {e}", path.display()))?;
    let cfg: MetricConfig = serde_yaml::from_str(&content)
        .map_err(|e| format!("Invalid config file '{}': {e}", path.display()))?;
    cfg.validate()
        .map_err(|e| format!("Config file '{}': {e}", path.display()))?;
    Ok(cfg)
}

/// Config file to use when none was passed explicitly: `.blame-metric.yml` in
/// `cwd`, else `<config dir>/blame-metric/config.yml`, else nothing.
pub fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let local = cwd.join(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|d| d.join("blame-metric").join("config.yml"))
        .filter(|p| p.is_file())
}

/// Annotated YAML template — printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# blame-metric configuration file
# Generated by: blame-metric --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# Command-line values always take precedence over values in this file.
# Save this file as .blame-metric.yml in your working directory, or pass it
# explicitly:
#
#   blame-metric --config .blame-metric.yml simulate

# ── Simulation ─────────────────────────────────────────────────────────────────

# Number of random groups to generate.
# trials: 1024

# Members per generated group.
# group_size: 4

# Seed for the trial generator. Omit for a fresh seed on every run
# (the seed used is always printed so a run can be repeated).
# seed: 42

# Run trials on all cores. Results are identical to a sequential run.
# parallel: false

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format for `score`: csv, terminal, json
# score_format: "csv"

# Output format for `simulate`: terminal, plain, json
# simulate_format: "terminal"
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(path, TEMPLATE)
            .map_err(|e| format!("Cannot write config template to '{}': {e}", path.display())),
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
