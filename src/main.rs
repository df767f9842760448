use authority_engine::cli::{self, Args, Commands};
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let Args { data_dir, provider, model, command } = args;

    let outcome = match command {
        Commands::Generate(generate) => cli::handle_generate(generate, data_dir, provider, model).await,
        Commands::Reply { inquiry } => cli::handle_reply(inquiry, data_dir, provider, model).await,
        Commands::Inbox => cli::handle_inbox(data_dir, provider, model).await,
        Commands::Calendar { command } => cli::handle_calendar(command, data_dir, provider, model).await,
        Commands::Knowledge { command } => cli::handle_knowledge(command, data_dir),
        Commands::Train { command } => cli::handle_train(command, data_dir),
        Commands::Drafts { command } => cli::handle_drafts(command, data_dir),
        Commands::Emoji { command } => cli::handle_emoji(command, data_dir),
        Commands::Copy { text } => cli::handle_copy(text, data_dir),
        Commands::Categories => cli::handle_categories(data_dir),
        Commands::Status => cli::handle_status(data_dir, provider),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "❌".red(), e);
        std::process::exit(1);
    }
}
