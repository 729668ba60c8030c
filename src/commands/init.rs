use crate::commands::Out;
use crate::{Config, Result};
use std::path::{Path, PathBuf};

/// Creates the wallet home directory and writes an initial `config.json`
/// pointing at `api_base_url`.
pub async fn init(home: &Path, api_base_url: &str) -> Result<Out<PathBuf>> {
    let config = Config::create(home, api_base_url).await?;
    Ok(Out::new(
        format!("Initialized wallet home at {}", config.root().display()),
        config.root().to_path_buf(),
    ))
}
