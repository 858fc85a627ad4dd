mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mediashelf")]
#[command(about = "Upload, browse and organize images in a mediashelf library")]
struct Cli {
    /// Server origin.
    #[arg(
        long,
        global = true,
        env = "MEDIASHELF_SERVER",
        default_value = "http://127.0.0.1:3000"
    )]
    server: String,

    /// Log pipeline activity to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage categories
    Categories {
        #[command(subcommand)]
        command: commands::categories::CategoriesCommand,
    },
    /// Browse, edit and delete images
    Images {
        #[command(subcommand)]
        command: commands::images::ImagesCommand,
    },
    /// Optimize and upload image files (at most 5 per run)
    Upload(commands::upload::UploadArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let api = client::MediaApi::new(cli.server);

    match cli.command {
        Command::Categories { command } => commands::categories::run(&api, command).await,
        Command::Images { command } => commands::images::run(api, command).await,
        Command::Upload(args) => commands::upload::run(api, args).await,
    }
}
