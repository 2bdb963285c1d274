//! Dataset upload: send the file, then refresh the metadata section.

use std::path::Path;

use anyhow::{bail, Result};

use crate::api::ApiClient;
use crate::config::Config;
use crate::printer;
use crate::views::SessionView;

pub async fn run(cfg: &Config, file: &str) -> Result<()> {
    let path = Path::new(file);
    if !path.is_file() {
        bail!("Please select a file to upload: {} does not exist", file);
    }

    let api = ApiClient::from_config(cfg)?;
    let mut view = SessionView::load(cfg)?;

    printer::info("Uploading...");
    let metadata = api.upload_data(path).await?;
    let applied = view.metadata_mut().update(&metadata);
    view.save()?;

    printer::success("File uploaded successfully.");
    if applied {
        let cols = metadata.dtypes.len();
        printer::info(&format!("{} columns described in the session report.", cols));
    } else {
        printer::info("Backend sent no sample rows; metadata section unchanged.");
    }
    Ok(())
}
