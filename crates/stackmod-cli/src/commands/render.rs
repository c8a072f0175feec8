use super::{load_document, EXIT_SUCCESS};
use stackmod_schema::{render_modulefile, RenderOptions};
use std::path::Path;

pub fn run(config: &Path, name: &str, prefix: &Path) -> Result<u8, String> {
    let document = load_document(config)?;
    let cluster = document
        .build(name)
        .ok_or_else(|| format!("config error: no cluster named '{name}'"))?
        .map_err(|e| format!("config error: {e}"))?;
    let options = RenderOptions {
        install_prefix: prefix.to_path_buf(),
    };
    print!("{}", render_modulefile(&cluster, &options));
    Ok(EXIT_SUCCESS)
}
