use anyhow::Context;
use clap::Subcommand;
use console::style;

use client::{MediaApi, MediaBackend};

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List all categories
    List,
    /// Create a category
    Add { name: String },
    /// Delete a category; its images are kept
    Delete { id: i32 },
}

pub async fn run(api: &MediaApi, command: CategoriesCommand) -> anyhow::Result<()> {
    match command {
        CategoriesCommand::List => {
            let categories = api
                .list_categories()
                .await
                .context("Failed to fetch categories")?;
            for c in categories {
                println!("{:>6}  {}", style(c.id).dim(), c.name);
            }
        }
        CategoriesCommand::Add { name } => {
            let created = api
                .create_category(&name)
                .await
                .context("Failed to add category")?;
            println!(
                "{} Category '{}' added (id {})",
                style("✓").green(),
                created.name,
                created.id
            );
        }
        CategoriesCommand::Delete { id } => {
            let message = api
                .delete_category(id)
                .await
                .context("Failed to delete category")?;
            println!("{} {}", style("✓").green(), message);
        }
    }
    Ok(())
}
