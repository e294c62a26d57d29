//! Request handlers.
use crate::context::RequestContext;
use crate::error::ServiceError;
use crate::manifest::{openapi_document, Manifest};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bp3_pipeline::{read_scores, Orchestrator, PredictionPlan};
use bp3_storage::{upload_directory, ArtifactTree, UploadOptions};
use bp3_structure::{convert_pdb_to_fasta, fasta_path_for, EchoMode};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use strum::Display;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    Pdb,
    Fasta,
}

/// A single URL, or a list of which only the first is used.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum FileUrl {
    One(String),
    Many(Vec<String>),
}

impl FileUrl {
    pub fn first(&self) -> Option<&str> {
        let url = match self {
            FileUrl::One(url) => Some(url.as_str()),
            FileUrl::Many(urls) => urls.first().map(String::as_str),
        };
        url.filter(|url| !url.trim().is_empty())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PredictRequest {
    pub file_type: FileType,
    pub file_url: FileUrl,
}

/// Top-level entries of the uploaded output tree, plus the raw scores.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub artifacts: BTreeMap<String, ArtifactTree>,
    pub json: Vec<f64>,
}

pub async fn manifest() -> Json<Manifest> {
    Json(Manifest::default())
}

pub async fn swagger(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(openapi_document(&state.config.predictor.plan))
}

/// `POST /bepipred30-predictor`
///
/// Downloads the input, converts a PDB to FASTA, runs the prediction plan,
/// uploads the output directory and returns its URL tree with the scores.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ServiceError> {
    let context = RequestContext::from_headers(&headers);
    let Json(request) = payload.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;
    let url = request
        .file_url
        .first()
        .ok_or_else(|| ServiceError::InvalidRequest("file_url is empty".into()))?
        .to_string();

    let request_id = Uuid::new_v4();
    info!(
        "[{request_id}] start bepipred3.0 prediction: file_type={}, file_url={url} ({context})",
        request.file_type
    );
    let config = &state.config;

    if config.limits.enforce_max_content_length {
        let within_limit = state
            .downloader
            .check_file_size(&url)
            .await
            .map_err(ServiceError::download)?;
        if !within_limit {
            return Err(ServiceError::InputTooLarge {
                url,
                limit: state.downloader.max_content_length(),
            });
        }
    }

    let staging_dir = config.paths.staging_dir.join(request_id.to_string());
    let input = state
        .downloader
        .download(&url, &staging_dir)
        .await
        .map_err(ServiceError::download)?;

    let fasta = match request.file_type {
        FileType::Fasta => input,
        FileType::Pdb => {
            info!("[{request_id}] input is pdb, converting to fasta");
            let echo = if config.structure.echo_fasta {
                EchoMode::Stdout
            } else {
                EchoMode::Silent
            };
            tokio::task::spawn_blocking(move || pdb_to_fasta(input, echo)).await??
        }
    };

    let out_dir = config.paths.output_dir.join(request_id.to_string());
    let plan = PredictionPlan::standard(
        &fasta,
        &config.paths.esm_cache_dir,
        &out_dir,
        &config.predictor.plan,
    );
    let predictor = Arc::clone(&state.predictor);
    let output =
        tokio::task::spawn_blocking(move || Orchestrator::new(predictor.as_ref()).run(&plan))
            .await??;

    let report = upload_directory(&state.store, &output.out_dir, &UploadOptions::default())
        .await
        .map_err(ServiceError::upload)?;
    if !report.is_complete() {
        warn!(
            "[{request_id}] {} file(s) failed to upload: {}",
            report.failures.len(),
            report.failed_keys().join(", ")
        );
        return Err(ServiceError::PartialUpload(report.failures));
    }

    let raw_csv = output.raw_csv;
    let scores = tokio::task::spawn_blocking(move || read_scores(&raw_csv)).await??;
    info!(
        "[{request_id}] prediction done: {} residues scored, {} entries uploaded",
        scores.len(),
        report.tree.len()
    );

    Ok(Json(PredictResponse {
        artifacts: report.tree,
        json: scores,
    }))
}

fn pdb_to_fasta(pdb: PathBuf, echo: EchoMode) -> Result<PathBuf, ServiceError> {
    let fasta = fasta_path_for(&pdb);
    let chains = convert_pdb_to_fasta(&pdb, &fasta, echo)?;
    if chains.is_empty() {
        warn!("{} has no alpha-carbon records", pdb.display());
        return Err(ServiceError::Parse(format!(
            "no protein chains found in {}",
            pdb.display()
        )));
    }
    Ok(fasta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_url_or_list() {
        let one: PredictRequest =
            serde_json::from_str(r#"{"file_type": "pdb", "file_url": "http://h/a.pdb"}"#).unwrap();
        assert_eq!(one.file_type, FileType::Pdb);
        assert_eq!(one.file_url.first(), Some("http://h/a.pdb"));

        let many: PredictRequest = serde_json::from_str(
            r#"{"file_type": "fasta", "file_url": ["http://h/a.fasta", "http://h/b.fasta"]}"#,
        )
        .unwrap();
        assert_eq!(many.file_url.first(), Some("http://h/a.fasta"));
    }

    #[test]
    fn test_empty_urls() {
        let empty: PredictRequest =
            serde_json::from_str(r#"{"file_type": "pdb", "file_url": []}"#).unwrap();
        assert_eq!(empty.file_url.first(), None);
        let blank: PredictRequest =
            serde_json::from_str(r#"{"file_type": "pdb", "file_url": " "}"#).unwrap();
        assert_eq!(blank.file_url.first(), None);
    }

    #[test]
    fn test_unknown_file_type() {
        let parsed = serde_json::from_str::<PredictRequest>(
            r#"{"file_type": "cif", "file_url": "http://h/a.cif"}"#,
        );
        assert!(parsed.is_err());
        assert_eq!(FileType::Fasta.to_string(), "fasta");
    }

    #[test]
    fn test_response_flattens_tree() {
        let mut artifacts = BTreeMap::new();
        artifacts.insert(
            "raw_output.csv".to_string(),
            ArtifactTree::File("https://cdn/run/raw_output.csv".into()),
        );
        let response = PredictResponse {
            artifacts,
            json: vec![0.5, 0.25],
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["raw_output.csv"], "https://cdn/run/raw_output.csv");
        assert_eq!(value["json"], serde_json::json!([0.5, 0.25]));
    }
}
