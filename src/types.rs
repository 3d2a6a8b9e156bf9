use serde::Serialize;
use crate::stats::SummaryStats;

// ─── Scoring ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MemberScore {
    pub name: String,
    pub share: f64,
    pub blame: f64,
}

/// How far from the group mean a member sits, by absolute z-score.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum Band {
    Outlier,
    Elevated,
    Typical,
    Undefined,
}

const BAND_OUTLIER:  f64 = 1.5;
const BAND_ELEVATED: f64 = 1.0;

impl Band {
    pub fn of(blame: f64) -> Band {
        let z = blame.abs();
        if z.is_nan() { Band::Undefined }
        else if z >= BAND_OUTLIER { Band::Outlier }
        else if z >= BAND_ELEVATED { Band::Elevated }
        else { Band::Typical }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Outlier   => write!(f, "OUTLIER"),
            Band::Elevated  => write!(f, "ELEVATED"),
            Band::Typical   => write!(f, "TYPICAL"),
            Band::Undefined => write!(f, "UNDEFINED"),
        }
    }
}

// ─── Reports ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScoreMeta {
    pub source: String,
    pub member_count: usize,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub meta: ScoreMeta,
    pub members: Vec<MemberScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationMeta {
    pub trials: usize,
    pub group_size: usize,
    pub seed: u64,
    pub parallel: bool,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub meta: SimulationMeta,
    pub summary: SummaryStats,
}
