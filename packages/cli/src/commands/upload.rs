use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use console::style;

use client::session::UploadState;
use client::{MediaApi, Session, Uploader};

use super::print_notifications;

#[derive(Args)]
pub struct UploadArgs {
    /// Image files to upload
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Category for the uploaded images (repeatable). Defaults to Uncategorized.
    #[arg(long = "category")]
    categories: Vec<i32>,
    /// Widest output after optimization, in pixels
    #[arg(long, default_value_t = client::optimize::MAX_WIDTH)]
    max_width: u32,
}

pub async fn run(api: MediaApi, args: UploadArgs) -> anyhow::Result<()> {
    let uploader = Uploader::new(Arc::new(api), Session::new()).with_max_width(args.max_width);

    if !args.categories.is_empty() {
        uploader
            .refresh_categories()
            .await
            .context("Failed to fetch categories")?;
        let known = uploader.session().categories();
        for id in &args.categories {
            if !known.iter().any(|c| c.id == *id) {
                anyhow::bail!("Unknown category id {id}");
            }
            uploader.session().select_category(*id, true);
        }
    }

    uploader
        .upload_paths(&args.files)
        .await
        .context("Failed to read selected files")?;

    let session = uploader.session();
    print_notifications(&session.drain_notifications());

    let mut failed = 0;
    for entry in session.entries() {
        let status = match entry.state {
            UploadState::Uploaded => style(entry.state.to_string()).green(),
            UploadState::Error => {
                failed += 1;
                style(entry.state.to_string()).red()
            }
            _ => style(entry.state.to_string()).yellow(),
        };
        println!(
            "{:<12} {} -> {}",
            status,
            entry.original_name,
            entry.key.as_deref().unwrap_or("-")
        );
    }

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to upload");
    }
    Ok(())
}
