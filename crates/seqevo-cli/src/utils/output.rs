use crate::error::{CliError, Result};
use seqevo::core::models::design::DesignInput;
use seqevo::core::models::network::Network;
use seqevo::core::scoring::profile::ProfileReport;
use seqevo::core::scoring::score::ScoreCard;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A designed network as written to disk. The `[variable-domains]` table can be pasted
/// back into a design file.
#[derive(Serialize, Debug)]
struct DesignOutput {
    #[serde(rename = "delta-w")]
    delta_w: String,
    #[serde(rename = "variable-domains")]
    variable_domains: BTreeMap<String, String>,
    oligomers: BTreeMap<String, String>,
}

/// `best.toml` stays as is for a single solution; otherwise `best-1.toml`, `best-2.toml`...
pub fn solution_path(template: &Path, index: usize, total: usize) -> PathBuf {
    if total <= 1 {
        return template.to_path_buf();
    }
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match template.extension() {
        Some(ext) => format!("{}-{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}-{}", stem, index),
    };
    template.with_file_name(file_name)
}

pub fn render_design(design: &DesignInput, network: &Network) -> Result<String> {
    let delta_w = network
        .score()
        .map(|card| card.delta_w().to_string())
        .ok_or_else(|| CliError::Argument("network has not been scored".to_string()))?;

    let sequences = network
        .decode_variable_domains()
        .map_err(|e| CliError::Other(e.into()))?;
    let variable_domains = design
        .variable_domains
        .iter()
        .map(|d| d.name.clone())
        .zip(sequences)
        .collect();

    let strands = network
        .decode_oligomers()
        .map_err(|e| CliError::Other(e.into()))?;
    let oligomers = design
        .oligomers
        .iter()
        .map(|o| o.name.clone())
        .zip(strands)
        .collect();

    let output = DesignOutput {
        delta_w,
        variable_domains,
        oligomers,
    };
    toml::to_string(&output).map_err(|e| CliError::Other(e.into()))
}

pub fn write_design(path: &Path, design: &DesignInput, network: &Network) -> Result<()> {
    let content = render_design(design, network)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn format_score(card: &ScoreCard) -> String {
    format!(
        "deltaW = {}\n  O = {}\n  N = {}\n  W = {}",
        card.delta_w(),
        card.intra_points(),
        card.inter_points(),
        card.weighted()
    )
}

pub fn format_profiles(report: &ProfileReport) -> String {
    let mut out = String::new();
    for (name, table) in report.tables() {
        let _ = writeln!(out, "[{}]", name);
        if table.is_empty() {
            let _ = writeln!(out, "(none)");
        } else {
            out.push_str(&table.to_string());
        }
    }
    out
}
