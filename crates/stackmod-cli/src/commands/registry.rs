use super::{json_pretty, EXIT_SUCCESS};
use stackmod_schema::{list_packages, DEFAULT_BASE_URL};

pub fn run(json: bool) -> Result<u8, String> {
    let packages = list_packages();
    if json {
        let entries: Vec<_> = packages
            .iter()
            .map(|p| {
                serde_json::json!({
                    "flavor": p.flavor,
                    "versions": p.versions,
                    "default_url": p.url_for(p.default_version()),
                })
            })
            .collect();
        let payload = serde_json::json!({
            "base_url": DEFAULT_BASE_URL,
            "packages": entries,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("base url: {DEFAULT_BASE_URL}");
        println!("{:<10} VERSIONS (first is default)", "FLAVOR");
        for p in packages {
            println!("{:<10} {}", p.flavor, p.versions.join(", "));
        }
    }
    Ok(EXIT_SUCCESS)
}
