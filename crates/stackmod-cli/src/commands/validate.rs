use super::{colorize_status, json_pretty, load_document, EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use serde::Serialize;
use stackmod_schema::ClusterDocument;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ClusterReport {
    cluster: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn check_all(document: &ClusterDocument) -> Vec<ClusterReport> {
    document
        .names()
        .zip(document.build_each())
        .map(|(name, outcome)| ClusterReport {
            cluster: name.to_string(),
            ok: outcome.is_ok(),
            error: outcome.err().map(|e| e.to_string()),
        })
        .collect()
}

pub fn run(config: &Path, json: bool) -> Result<u8, String> {
    let document = load_document(config)?;
    let reports = check_all(&document);
    let failed = reports.iter().filter(|r| !r.ok).count();

    if json {
        let payload = serde_json::json!({
            "clusters": reports,
            "failed": failed,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        for report in &reports {
            match &report.error {
                Some(e) => println!("{:<16} {}: {e}", report.cluster, colorize_status(false)),
                None => println!("{:<16} {}", report.cluster, colorize_status(true)),
            }
        }
        println!("{} cluster(s), {failed} failed", reports.len());
    }

    if failed > 0 {
        Ok(EXIT_CONFIG_ERROR)
    } else {
        Ok(EXIT_SUCCESS)
    }
}
