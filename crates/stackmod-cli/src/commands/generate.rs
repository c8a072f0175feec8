use super::{json_pretty, load_document, write_atomic, EXIT_SUCCESS};
use stackmod_schema::{render_modulefile, ClusterConfig, RenderOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

const MODULE_SUBDIR: &str = "cluster";

/// Recreate `<outdir>/cluster` empty.
fn prepare_module_dir(outdir: &Path) -> Result<PathBuf, String> {
    let dir = outdir.join(MODULE_SUBDIR);
    match std::fs::remove_dir_all(&dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(format!("output error: remove {}: {e}", dir.display())),
    }
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("output error: create {}: {e}", dir.display()))?;
    Ok(dir)
}

/// Module file names are lowercased, so `Falcon` and `FALCON` would share one.
fn check_unique_stems(clusters: &[ClusterConfig]) -> Result<(), String> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for cluster in clusters {
        if let Some(first) = seen.insert(cluster.name.file_stem(), cluster.name.as_str()) {
            return Err(format!(
                "config error: clusters '{first}' and '{}' would both write {}.lua",
                cluster.name,
                cluster.name.file_stem()
            ));
        }
    }
    Ok(())
}

pub fn run(config: &Path, outdir: &Path, prefix: &Path, json: bool) -> Result<u8, String> {
    let document = load_document(config)?;
    // Nothing is written unless every cluster normalizes.
    let clusters = document
        .build_all()
        .map_err(|e| format!("config error: {e}"))?;
    check_unique_stems(&clusters)?;

    let dir = prepare_module_dir(outdir)?;
    if !json {
        println!("writing module files to {}/", dir.display());
    }

    let options = RenderOptions {
        install_prefix: prefix.to_path_buf(),
    };
    let mut written = Vec::with_capacity(clusters.len());
    for cluster in &clusters {
        let path = dir.join(format!("{}.lua", cluster.name.file_stem()));
        write_atomic(&path, &render_modulefile(cluster, &options))?;
        info!("wrote module file for {} to {}", cluster.name, path.display());
        if !json {
            println!("wrote {}", path.display());
        }
        written.push(serde_json::json!({
            "cluster": cluster.name,
            "path": path,
            "fab": cluster.fab_id,
            "mpi": cluster.mpi_id,
        }));
    }

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "module_dir": dir,
            "clusters": written,
        });
        println!("{}", json_pretty(&payload)?);
    }
    Ok(EXIT_SUCCESS)
}
