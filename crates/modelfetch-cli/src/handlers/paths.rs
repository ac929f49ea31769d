//! Paths command handler.
//!
//! Displays the resolved download locations for diagnostics.

use anyhow::Result;
use modelfetch_core::{DownloadRootResolution, FetchConfig, resolve_download_root};

use crate::error::CliError;

/// Render the resolved locations in `key = value` format.
pub fn render(root: &DownloadRootResolution, config: &FetchConfig) -> String {
    [
        format!("download_root = {}", root.path.display()),
        format!("download_root_source = {}", root.source),
        format!(
            "default_folder = {}",
            config
                .download_root()
                .join(config.default_subfolder())
                .display()
        ),
        format!("credential_variable = {}", config.token_env_var()),
    ]
    .join("\n")
}

/// Execute the paths command.
pub fn execute(download_root: Option<&str>) -> Result<()> {
    let root = resolve_download_root(download_root).map_err(CliError::from)?;
    let config = FetchConfig::new(root.path.clone());
    println!("{}", render(&root, &config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelfetch_core::DownloadRootSource;
    use std::path::PathBuf;

    #[test]
    fn test_render_lists_every_key() {
        let root = DownloadRootResolution {
            path: PathBuf::from("/data/models"),
            source: DownloadRootSource::Explicit,
        };
        let config = FetchConfig::new("/data/models");

        let output = render(&root, &config);
        assert_eq!(
            output,
            "download_root = /data/models\n\
             download_root_source = explicit\n\
             default_folder = /data/models/IF_AI\n\
             credential_variable = HF_TOKEN"
        );
    }
}
