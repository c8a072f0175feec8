//! Lmod (Lua) module files for normalized clusters.

use crate::cluster::ClusterConfig;
use std::path::PathBuf;

pub const DEFAULT_INSTALL_PREFIX: &str = "/opt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directory the `<fab_id>/<mpi_id>` installation tree lives under.
    pub install_prefix: PathBuf,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            install_prefix: PathBuf::from(DEFAULT_INSTALL_PREFIX),
        }
    }
}

fn lua_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text safe to place after `--` on a single line.
fn comment_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

pub fn render_modulefile(cluster: &ClusterConfig, options: &RenderOptions) -> String {
    let help = lua_str(&cluster.help());
    let prefix = options.install_prefix.to_string_lossy();
    let mut out = String::new();

    out.push_str(&format!(
        r#"-- {name} module configuration
help({help})
whatis({help})

-- Ensures only one cluster stack is active
family("cluster")

-- Root for library installation
local root = pathJoin({prefix}, {fab}, {mpi})

setenv("CLUSTER_NAME", {name_str})
"#,
        name = comment_text(&cluster.name),
        prefix = lua_str(&prefix),
        fab = lua_str(&cluster.fab_id),
        mpi = lua_str(&cluster.mpi_id),
        name_str = lua_str(&cluster.name),
    ));

    for (pkg, record) in &cluster.packages {
        let var = pkg.env_prefix();
        out.push_str(&format!(
            r#"
-- Environment variables for package {comment}
setenv({flavor_var}, {flavor})
setenv({version_var}, {version})
setenv({url_var}, {url})
setenv({filename_var}, {filename})
"#,
            comment = comment_text(pkg),
            flavor_var = lua_str(&format!("{var}_FLAVOR")),
            version_var = lua_str(&format!("{var}_VERSION")),
            url_var = lua_str(&format!("{var}_URL")),
            filename_var = lua_str(&format!("{var}_FILENAME")),
            flavor = lua_str(&record.flavor),
            version = lua_str(&record.version),
            url = lua_str(&record.url),
            filename = lua_str(&record.filename),
        ));
    }

    out.push_str(
        r#"
-- Standardized directories and paths
setenv("LIBS_ROOT", root)
setenv("LIBS_INC", pathJoin(root, "include"))
setenv("LIBS_LIB", pathJoin(root, "lib"))
setenv("LIBS_BIN", pathJoin(root, "bin"))
setenv("HOME_LORENE", pathJoin(root, "Lorene"))

-- Paths
prepend_path("PATH", pathJoin(root, "bin"))
prepend_path("LD_LIBRARY_PATH", pathJoin(root, "lib"))
prepend_path("LIBRARY_PATH", pathJoin(root, "lib"))
prepend_path("CPATH", pathJoin(root, "include"))
prepend_path("PKG_CONFIG_PATH", pathJoin(root, "lib/pkgconfig"))
prepend_path("PKG_CONFIG_PATH", pathJoin(root, "share/pkgconfig"))
prepend_path("MANPATH", pathJoin(root, "share/man"))
"#,
    );
    out
}
