use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::print_json;
use crate::infrastructure::client::ScranbookClient;
use crate::infrastructure::client::images::guess_content_type;

#[derive(Debug, Args)]
pub struct ImageFileCommand {
    /// Path to the photo
    pub file: PathBuf,
}

struct LocalImage {
    filename: String,
    content_type: Option<&'static str>,
    bytes: Vec<u8>,
}

fn read_local_image(command: &ImageFileCommand) -> Result<LocalImage> {
    let bytes = std::fs::read(&command.file)
        .with_context(|| format!("failed to read {}", command.file.display()))?;
    let filename = command
        .file
        .file_name()
        .map_or_else(|| "image.jpg".to_string(), |name| name.to_string_lossy().into_owned());
    let content_type = guess_content_type(&filename);

    Ok(LocalImage {
        filename,
        content_type,
        bytes,
    })
}

pub async fn parse_image(client: &ScranbookClient, command: ImageFileCommand) -> Result<()> {
    let image = read_local_image(&command)?;
    let recipe = client
        .images()
        .parse(&image.filename, image.content_type, image.bytes)
        .await?;
    print_json(&recipe)
}

pub async fn upload_image(client: &ScranbookClient, command: ImageFileCommand) -> Result<()> {
    let image = read_local_image(&command)?;
    let uploaded = client
        .images()
        .upload(&image.filename, image.content_type, image.bytes)
        .await?;
    print_json(&uploaded)
}
