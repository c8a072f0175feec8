use super::{json_pretty, load_document, EXIT_SUCCESS};
use stackmod_schema::ClusterConfig;
use std::path::Path;

fn print_cluster(cluster: &ClusterConfig) {
    println!("{}", cluster.help());
    println!("  {:<8} {:<10} {:<10} URL", "PACKAGE", "FLAVOR", "VERSION");
    for (pkg, record) in &cluster.packages {
        println!(
            "  {:<8} {:<10} {:<10} {}",
            pkg, record.flavor, record.version, record.url
        );
    }
}

pub fn run(config: &Path, only: Option<&str>, json: bool) -> Result<u8, String> {
    let document = load_document(config)?;
    let clusters = match only {
        Some(name) => {
            let cluster = document
                .build(name)
                .ok_or_else(|| format!("config error: no cluster named '{name}'"))?
                .map_err(|e| format!("config error: {e}"))?;
            vec![cluster]
        }
        None => document
            .build_all()
            .map_err(|e| format!("config error: {e}"))?,
    };

    if json {
        println!("{}", json_pretty(&clusters)?);
    } else if clusters.is_empty() {
        println!("no clusters configured");
    } else {
        for (i, cluster) in clusters.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print_cluster(cluster);
        }
    }
    Ok(EXIT_SUCCESS)
}
