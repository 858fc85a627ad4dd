use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;

use client::models::{Image, ImageUpdate};
use client::{Library, MediaApi};

#[derive(Subcommand)]
pub enum ImagesCommand {
    /// List images, newest first
    List(ListArgs),
    /// Change an image's title and/or categories
    Edit(EditArgs),
    /// Delete an image and its stored object
    Delete {
        /// Storage key of the image
        key: String,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Only images in this category
    #[arg(long)]
    category: Option<i32>,
    /// Number of pages to fetch
    #[arg(long, default_value_t = 1)]
    pages: usize,
}

#[derive(Args)]
pub struct EditArgs {
    id: i32,
    #[arg(long)]
    title: Option<String>,
    /// Replace the category set (repeatable)
    #[arg(long = "category")]
    categories: Vec<i32>,
    /// Remove every category from the image
    #[arg(long, conflicts_with = "categories")]
    clear_categories: bool,
}

fn print_image(image: &Image) {
    let categories: Vec<&str> = image.categories.iter().map(|c| c.name.as_str()).collect();
    println!(
        "{:>6}  {}  {}",
        style(image.id).dim(),
        style(&image.title).bold(),
        style(format!("[{}]", categories.join(", "))).cyan()
    );
    println!("        {}", style(&image.storage_key).dim());
}

pub async fn run(api: MediaApi, command: ImagesCommand) -> anyhow::Result<()> {
    let mut library = Library::new(Arc::new(api));

    match command {
        ImagesCommand::List(args) => {
            library
                .set_category_filter(args.category)
                .await
                .context("Failed to fetch images")?;
            for _ in 1..args.pages.max(1) {
                if !library.has_more() {
                    break;
                }
                library.load_more().await.context("Failed to fetch images")?;
            }

            if library.images().is_empty() {
                println!("No images found.");
            }
            for image in library.images() {
                print_image(image);
            }
            if library.has_more() {
                println!(
                    "{}",
                    style(format!("More available; use --pages {}", args.pages + 1)).dim()
                );
            }
        }
        ImagesCommand::Edit(args) => {
            let category_ids = if args.clear_categories {
                Some(Vec::new())
            } else if args.categories.is_empty() {
                None
            } else {
                Some(args.categories)
            };
            let update = ImageUpdate {
                title: args.title,
                category_ids,
            };
            let updated = library
                .update(args.id, &update)
                .await
                .context("Failed to update image")?;
            println!("{} Image updated", style("✓").green());
            print_image(&updated);
        }
        ImagesCommand::Delete { key } => {
            let message = library.delete(&key).await.context("Failed to delete image")?;
            println!("{} {}", style("✓").green(), message);
        }
    }
    Ok(())
}
