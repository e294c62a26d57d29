//! The ordered list of library calls for one prediction.
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use strum::IntoStaticStr;

pub const RAW_CSV: &str = "raw_output.csv";
pub const MAJORITY_VOTE_DIR: &str = "mjv_voting";
pub const VARIABLE_THRESHOLD_DIR: &str = "var_thresh";
pub const SCORE_PLOTS_DIR: &str = "bp3_score_bplots";
pub const LINSCORE_PLOTS_DIR: &str = "bp3_linscore_bplots";

pub const DEFAULT_TOP_PERCENTS: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];
pub const DEFAULT_VARIABLE_THRESHOLD: f64 = 0.2;
pub const DEFAULT_INTERACTIVE_FIGURES: usize = 50;

/// `top10` for `0.1`.
pub fn top_percent_dir(fraction: f64) -> String {
    format!("top{}", (fraction * 100.0).round() as u32)
}

/// One call into the prediction library.
#[derive(Clone, Debug, PartialEq, Serialize, IntoStaticStr)]
#[serde(tag = "step", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PipelineStep {
    /// Load sequences and their ESM-2 encodings (computed into `esm_cache` if absent).
    EncodeAntigens {
        fasta: PathBuf,
        esm_cache: PathBuf,
        add_seq_len: bool,
    },
    RunEnsemble,
    /// Per-residue scores, written as `raw_output.csv`.
    RawCsv { out_dir: PathBuf },
    /// Epitopes among the top `fraction` of scored residues.
    TopPercent { fraction: f64, out_dir: PathBuf },
    MajorityVote { out_dir: PathBuf },
    VariableThreshold { threshold: f64, out_dir: PathBuf },
    Plots {
        out_dir: PathBuf,
        num_interactive_figs: usize,
        rolling_mean: bool,
    },
}

impl PipelineStep {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Directory the step writes into, if it writes anything.
    pub fn out_dir(&self) -> Option<&Path> {
        match self {
            PipelineStep::EncodeAntigens { .. } | PipelineStep::RunEnsemble => None,
            PipelineStep::RawCsv { out_dir }
            | PipelineStep::TopPercent { out_dir, .. }
            | PipelineStep::MajorityVote { out_dir }
            | PipelineStep::VariableThreshold { out_dir, .. }
            | PipelineStep::Plots { out_dir, .. } => Some(out_dir),
        }
    }
}

/// Tunables of the standard plan.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    pub top_percents: Vec<f64>,
    pub variable_threshold: f64,
    pub interactive_figures: usize,
    pub add_seq_len: bool,
}

impl Default for PlanSettings {
    fn default() -> Self {
        PlanSettings {
            top_percents: DEFAULT_TOP_PERCENTS.to_vec(),
            variable_threshold: DEFAULT_VARIABLE_THRESHOLD,
            interactive_figures: DEFAULT_INTERACTIVE_FIGURES,
            add_seq_len: true,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PredictionPlan {
    out_dir: PathBuf,
    steps: Vec<PipelineStep>,
}

impl PredictionPlan {
    pub fn new(out_dir: &Path, steps: Vec<PipelineStep>) -> Self {
        PredictionPlan {
            out_dir: out_dir.to_path_buf(),
            steps,
        }
    }

    /// Encode, ensemble, raw CSV, percentile subsets, majority vote,
    /// variable threshold, then raw-score and rolling-mean plots.
    pub fn standard(
        fasta: &Path,
        esm_cache: &Path,
        out_dir: &Path,
        settings: &PlanSettings,
    ) -> Self {
        let mut steps = vec![
            PipelineStep::EncodeAntigens {
                fasta: fasta.to_path_buf(),
                esm_cache: esm_cache.to_path_buf(),
                add_seq_len: settings.add_seq_len,
            },
            PipelineStep::RunEnsemble,
            PipelineStep::RawCsv {
                out_dir: out_dir.to_path_buf(),
            },
        ];
        steps.extend(settings.top_percents.iter().map(|&fraction| {
            PipelineStep::TopPercent {
                fraction,
                out_dir: out_dir.join(top_percent_dir(fraction)),
            }
        }));
        steps.push(PipelineStep::MajorityVote {
            out_dir: out_dir.join(MAJORITY_VOTE_DIR),
        });
        steps.push(PipelineStep::VariableThreshold {
            threshold: settings.variable_threshold,
            out_dir: out_dir.join(VARIABLE_THRESHOLD_DIR),
        });
        for (dir, rolling_mean) in [(SCORE_PLOTS_DIR, false), (LINSCORE_PLOTS_DIR, true)] {
            steps.push(PipelineStep::Plots {
                out_dir: out_dir.join(dir),
                num_interactive_figs: settings.interactive_figures,
                rolling_mean,
            });
        }
        PredictionPlan::new(out_dir, steps)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn raw_csv(&self) -> PathBuf {
        self.out_dir.join(RAW_CSV)
    }

    /// Checks step order and parameter ranges.
    ///
    /// The library needs antigens encoded and the ensemble run before any
    /// output step, and two steps may not share an output directory other
    /// than the plan root.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::InvalidPlan(msg));
        match self.steps.as_slice() {
            [PipelineStep::EncodeAntigens { .. }, PipelineStep::RunEnsemble, rest @ ..] => {
                let mut seen = HashSet::new();
                for step in rest {
                    match step {
                        PipelineStep::EncodeAntigens { .. } | PipelineStep::RunEnsemble => {
                            return invalid(format!("`{}` may only appear once, first", step.name()));
                        }
                        PipelineStep::TopPercent { fraction, .. }
                            if !(*fraction > 0.0 && *fraction <= 1.0) =>
                        {
                            return invalid(format!("top fraction {fraction} outside (0, 1]"));
                        }
                        PipelineStep::VariableThreshold { threshold, .. }
                            if !(0.0..=1.0).contains(threshold) =>
                        {
                            return invalid(format!("threshold {threshold} outside [0, 1]"));
                        }
                        _ => {}
                    }
                    if let Some(dir) = step.out_dir().filter(|dir| *dir != self.out_dir) {
                        if !seen.insert(dir) {
                            return invalid(format!("output directory {} used twice", dir.display()));
                        }
                    }
                }
                Ok(())
            }
            _ => invalid("plan must start with encode_antigens then run_ensemble".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> PredictionPlan {
        PredictionPlan::standard(
            Path::new("/stage/in.fasta"),
            Path::new("/cache/esm2_encodings"),
            Path::new("/out/run-1"),
            &PlanSettings::default(),
        )
    }

    #[test]
    fn test_standard_plan_order() {
        let names: Vec<&str> = standard().steps().iter().map(PipelineStep::name).collect();
        assert_eq!(
            names,
            vec![
                "encode_antigens",
                "run_ensemble",
                "raw_csv",
                "top_percent",
                "top_percent",
                "top_percent",
                "top_percent",
                "top_percent",
                "majority_vote",
                "variable_threshold",
                "plots",
                "plots",
            ]
        );
        assert!(standard().validate().is_ok());
    }

    #[test]
    fn test_each_percentile_carries_its_fraction() {
        let plan = standard();
        let tops: Vec<(f64, PathBuf)> = plan
            .steps()
            .iter()
            .filter_map(|step| match step {
                PipelineStep::TopPercent { fraction, out_dir } => Some((*fraction, out_dir.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(tops.len(), 5);
        assert_eq!(tops[0], (0.1, PathBuf::from("/out/run-1/top10")));
        assert_eq!(tops[4], (0.9, PathBuf::from("/out/run-1/top90")));
    }

    #[test]
    fn test_plots_and_threshold_parameters() {
        let plan = standard();
        assert!(plan.steps().contains(&PipelineStep::VariableThreshold {
            threshold: 0.2,
            out_dir: PathBuf::from("/out/run-1/var_thresh"),
        }));
        assert!(plan.steps().contains(&PipelineStep::Plots {
            out_dir: PathBuf::from("/out/run-1/bp3_linscore_bplots"),
            num_interactive_figs: 50,
            rolling_mean: true,
        }));
        assert_eq!(plan.raw_csv(), PathBuf::from("/out/run-1/raw_output.csv"));
    }

    #[test]
    fn test_top_percent_dir_rounds() {
        assert_eq!(top_percent_dir(0.1), "top10");
        assert_eq!(top_percent_dir(0.7), "top70");
        assert_eq!(top_percent_dir(0.333), "top33");
    }

    #[test]
    fn test_validate_rejects_bad_plans() {
        let out = Path::new("/out");
        let missing_ensemble = PredictionPlan::new(
            out,
            vec![PipelineStep::RawCsv { out_dir: out.to_path_buf() }],
        );
        assert!(matches!(missing_ensemble.validate(), Err(PipelineError::InvalidPlan(_))));

        let settings = PlanSettings {
            top_percents: vec![0.0],
            ..PlanSettings::default()
        };
        let zero = PredictionPlan::standard(Path::new("a.fasta"), Path::new("c"), out, &settings);
        assert!(zero.validate().is_err());

        let settings = PlanSettings {
            top_percents: vec![0.5, 0.5],
            ..PlanSettings::default()
        };
        let duplicate = PredictionPlan::standard(Path::new("a.fasta"), Path::new("c"), out, &settings);
        assert!(duplicate.validate().is_err());
    }

    #[test]
    fn test_plan_json_shape() {
        let json = serde_json::to_value(standard()).unwrap();
        assert_eq!(json["out_dir"], "/out/run-1");
        assert_eq!(json["steps"][1], serde_json::json!({"step": "run_ensemble"}));
        assert_eq!(json["steps"][3]["step"], "top_percent");
        assert_eq!(json["steps"][3]["fraction"], 0.1);
        assert_eq!(json["steps"][0]["add_seq_len"], true);
    }
}
