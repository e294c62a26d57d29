//! Tool descriptors read by the workflow platform.
use bp3_pipeline::{
    top_percent_dir, PlanSettings, LINSCORE_PLOTS_DIR, MAJORITY_VOTE_DIR, RAW_CSV,
    SCORE_PLOTS_DIR, VARIABLE_THRESHOLD_DIR,
};
use serde::Serialize;
use serde_json::{json, Value};

pub const TOOL_NAME: &str = "bepipred30_predictor";
pub const PREDICT_PATH: &str = "/bepipred30-predictor";
pub const SWAGGER_PATH: &str = "/swagger.json";

const INTERACTIVE_FIGURES: &str = "output_interactive_figures.html";
const EPITOPE_PREDS: &str = "Bcell_epitope_preds.fasta";

#[derive(Clone, Debug, Serialize)]
pub struct Manifest {
    pub schema_version: &'static str,
    pub display_name: &'static str,
    pub namespace: &'static str,
    pub auth: ManifestAuth,
    pub api: ManifestApi,
    pub contact_email: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ManifestAuth {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ManifestApi {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: &'static str,
}

impl Default for Manifest {
    fn default() -> Self {
        Manifest {
            schema_version: "v1",
            display_name: "BepiPred-3.0 Predictor",
            namespace: TOOL_NAME,
            auth: ManifestAuth { kind: "none" },
            api: ManifestApi {
                kind: "openapi",
                url: SWAGGER_PATH,
            },
            contact_email: "dev@inf-monkeys.com",
        }
    }
}

fn string_output(name: &str) -> Value {
    json!({"name": name, "displayName": name, "type": "string"})
}

fn directory_output(name: &str, files: &[String]) -> Value {
    let properties: Vec<Value> = files.iter().map(|file| string_output(file)).collect();
    json!({
        "name": name,
        "displayName": name,
        "type": "jsonObject",
        "properties": properties,
    })
}

/// Outputs of the predictor in response order, derived from the plan settings.
fn tool_outputs(settings: &PlanSettings) -> Vec<Value> {
    let mut outputs = vec![
        json!({"name": RAW_CSV, "displayName": "原始 CSV 文件", "type": "string"}),
        json!({"name": "json", "displayName": "JSON 结果", "type": "jsonObject"}),
    ];
    for dir in [LINSCORE_PLOTS_DIR, SCORE_PLOTS_DIR] {
        outputs.push(directory_output(dir, &[INTERACTIVE_FIGURES.to_string()]));
    }
    outputs.push(directory_output(
        MAJORITY_VOTE_DIR,
        &[EPITOPE_PREDS.to_string()],
    ));
    for &fraction in &settings.top_percents {
        let percent = (fraction * 100.0).round() as u32;
        outputs.push(directory_output(
            &top_percent_dir(fraction),
            &[
                format!("Bcell_epitope_top_{percent}pct_preds.fasta"),
                format!("Bcell_linepitope_top_{percent}pct_preds.fasta"),
            ],
        ));
    }
    outputs.push(directory_output(
        VARIABLE_THRESHOLD_DIR,
        &[EPITOPE_PREDS.to_string()],
    ));
    outputs
}

/// Swagger 2.0 description of the predict operation, with the
/// `x-monkey-tool-*` extension the platform builds its form from.
pub fn openapi_document(settings: &PlanSettings) -> Value {
    let inputs = json!([
        {
            "displayName": "文件类型",
            "name": "file_type",
            "type": "options",
            "default": "pdb",
            "options": [
                {"name": "PDB", "value": "pdb"},
                {"name": "FASTA", "value": "fasta"},
            ],
            "required": true,
        },
        {
            "displayName": "文件链接",
            "name": "file_url",
            "type": "file",
            "required": true,
            "typeOptions": {"multipleValues": false, "max": 1},
        },
    ]);

    json!({
        "swagger": "2.0",
        "basePath": "/",
        "info": {
            "title": "Monkey Tool BepiPred3.0 Predictor API",
            "version": "1.0",
            "description": "BepiPred-3.0 B-cell epitope prediction for protein structures and sequences",
        },
        "consumes": ["application/json"],
        "produces": ["application/json"],
        "paths": {
            PREDICT_PATH: {
                "post": {
                    "operationId": TOOL_NAME,
                    "parameters": [{
                        "name": "payload",
                        "in": "body",
                        "required": true,
                        "schema": {
                            "type": "object",
                            "required": ["file_type", "file_url"],
                            "properties": {
                                "file_type": {"type": "string", "enum": ["pdb", "fasta"]},
                                "file_url": {"type": "string"},
                            },
                        },
                    }],
                    "responses": {"200": {"description": "Success"}},
                    "x-monkey-tool-name": TOOL_NAME,
                    "x-monkey-tool-categories": ["bio"],
                    "x-monkey-tool-display-name": "免疫原性预测",
                    "x-monkey-tool-description": "蛋白质的免疫原性预测",
                    "x-monkey-tool-icon": "emoji:🧬:#f2c1be",
                    "x-monkey-tool-input": inputs,
                    "x-monkey-tool-output": tool_outputs(settings),
                    "x-monkey-tool-extra": {"estimateTime": 30},
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_shape() {
        let value = serde_json::to_value(Manifest::default()).unwrap();
        assert_eq!(value["schema_version"], "v1");
        assert_eq!(value["namespace"], "bepipred30_predictor");
        assert_eq!(value["auth"], json!({"type": "none"}));
        assert_eq!(value["api"], json!({"type": "openapi", "url": "/swagger.json"}));
    }

    #[test]
    fn test_outputs_follow_settings() {
        let doc = openapi_document(&PlanSettings::default());
        let outputs = doc["paths"][PREDICT_PATH]["post"]["x-monkey-tool-output"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = outputs.iter().filter_map(|o| o["name"].as_str()).collect();
        assert_eq!(
            names,
            vec![
                "raw_output.csv",
                "json",
                "bp3_linscore_bplots",
                "bp3_score_bplots",
                "mjv_voting",
                "top10",
                "top30",
                "top50",
                "top70",
                "top90",
                "var_thresh",
            ]
        );
        assert_eq!(
            outputs[5]["properties"][1]["name"],
            "Bcell_linepitope_top_10pct_preds.fasta"
        );

        let settings = PlanSettings {
            top_percents: vec![0.25],
            ..PlanSettings::default()
        };
        let doc = openapi_document(&settings);
        let outputs = doc["paths"][PREDICT_PATH]["post"]["x-monkey-tool-output"]
            .as_array()
            .unwrap();
        assert!(outputs.iter().any(|o| o["name"] == "top25"));
        assert!(!outputs.iter().any(|o| o["name"] == "top10"));
    }
}
