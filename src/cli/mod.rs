use std::io::{self, Write};
use std::path::{Path, PathBuf};
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use serde::{Deserialize, Serialize};

use crate::ai_provider::AIProviderClient;
use crate::config::Config;
use crate::core::{
    emoji_set, resolve_category, search_knowledge, Action, AppState, ContentFormat,
    ContentLength, EngineError, ExportOptions, GenerationResult, Intent, Language,
    RelevancePolicy, RequestCompiler, StateStore, Tone,
};
use crate::dashboard::Dashboard;
use crate::synthesizer::Synthesizer;
use crate::view;

pub use commands::{CalendarCommands, DraftCommands, EmojiCommands, KnowledgeCommands, TrainCommands};

mod commands;

#[derive(Parser)]
#[command(name = "authority", version, about = "Content generation console for Myanmar-market visa services")]
pub struct Args {
    /// Directory holding config.json and the state snapshot
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Completion provider (gemini, openai, ollama)
    #[arg(long, global = true)]
    pub provider: Option<String>,
    /// Model id for every request kind
    #[arg(long, global = true)]
    pub model: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate patterns, drafts and variants for a service category
    Generate(GenerateArgs),
    /// Draft a fact-grounded reply to one customer inquiry
    Reply {
        inquiry: String,
    },
    /// Interactive Smart Inbox
    Inbox,
    /// Content calendar planning
    Calendar {
        #[command(subcommand)]
        command: CalendarCommands,
    },
    /// Manage the knowledge bank
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommands,
    },
    /// Manage per-category style samples
    Train {
        #[command(subcommand)]
        command: TrainCommands,
    },
    /// Manage saved drafts
    Drafts {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Choose the emoji set used in generated copy
    Emoji {
        #[command(subcommand)]
        command: EmojiCommands,
    },
    /// Print text for pasting and log it as a style preference
    Copy {
        text: String,
    },
    /// List service categories
    Categories,
    /// Show brand, provider and stored data counts
    Status,
}

#[derive(clap::Args)]
pub struct FormArgs {
    /// Service category
    #[arg(long)]
    pub topic: Option<String>,
    /// facebook, tiktok, carousel, reply, dm, ad, article, whitepaper, press
    #[arg(long)]
    pub format: Option<String>,
    /// calm, luxury, friendly, professional, urgent, serious, legal
    #[arg(long)]
    pub tone: Option<String>,
    /// awareness, lead, trust, faq, authority
    #[arg(long)]
    pub intent: Option<String>,
    /// short, medium, long
    #[arg(long)]
    pub length: Option<String>,
    /// english, burmese, thai
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    /// Competitor copy to learn patterns from
    #[arg(long)]
    pub competitors: Option<String>,
    #[arg(long, conflicts_with = "competitors")]
    pub competitors_file: Option<PathBuf>,
    /// Emoji set name or literal emojis, for this run only
    #[arg(long)]
    pub emoji: Option<String>,
    /// Fact isolation: advisory or strict
    #[arg(long)]
    pub policy: Option<String>,
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub form: FormArgs,
    /// Save draft N (1-based) to the matrix; repeatable
    #[arg(long)]
    pub save: Vec<usize>,
    /// Copy draft N (1-based)
    #[arg(long)]
    pub copy: Option<usize>,
    /// Write the result to a file for `calendar export`
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// A generation result plus the form it was produced from.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResult {
    pub topic: String,
    pub format: ContentFormat,
    pub intent: Intent,
    pub result: GenerationResult,
}

struct Session {
    config: Config,
    store: StateStore,
}

fn open_session(data_dir: Option<PathBuf>) -> Result<Session> {
    let config = Config::new(data_dir)?;
    let mut defaults = AppState::default();
    if let Some(brand) = &config.brand {
        defaults.brand = brand.clone();
    }
    let store = StateStore::open(config.data_dir(), defaults)
        .context("Failed to open state snapshot")?;
    Ok(Session { config, store })
}

fn build_synthesizer(
    config: &Config,
    provider: Option<&str>,
    model: Option<String>,
    policy: Option<RelevancePolicy>,
) -> Result<Synthesizer<AIProviderClient>> {
    let ai_config = config.get_ai_config(provider)?;
    let models = config.get_models(provider, model)?;
    let compiler = RequestCompiler::new(policy.unwrap_or(config.relevance_policy), models);
    Ok(Synthesizer::new(compiler, AIProviderClient::new(ai_config)))
}

fn category_arg(input: &str) -> Result<&'static str> {
    resolve_category(input).ok_or_else(|| EngineError::UnknownCategory(input.to_string()).into())
}

fn form_actions(form: &FormArgs) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    if let Some(topic) = &form.topic {
        let topic = match resolve_category(topic) {
            Some(category) => category.to_string(),
            None => {
                tracing::warn!(topic = %topic, "topic is not a known category, using it as given");
                topic.clone()
            }
        };
        actions.push(Action::SelectTopic(topic));
    }
    if let Some(format) = &form.format {
        actions.push(Action::SetFormat(format.parse::<ContentFormat>()?));
    }
    if let Some(tone) = &form.tone {
        actions.push(Action::SetTone(tone.parse::<Tone>()?));
    }
    if let Some(intent) = &form.intent {
        actions.push(Action::SetIntent(intent.parse::<Intent>()?));
    }
    if let Some(length) = &form.length {
        actions.push(Action::SetLength(length.parse::<ContentLength>()?));
    }
    if let Some(language) = &form.language {
        actions.push(Action::SetLanguage(language.parse::<Language>()?));
    }
    if let Some(brand) = &form.brand {
        actions.push(Action::SetBrand(brand.clone()));
    }
    if let Some(text) = &form.competitors {
        actions.push(Action::SetCompetitors(text.clone()));
    }
    if let Some(path) = &form.competitors_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        actions.push(Action::SetCompetitors(text));
    }
    if let Some(emoji) = &form.emoji {
        let set = emoji_set(emoji).map(str::to_string).unwrap_or_else(|| emoji.clone());
        actions.push(Action::SelectEmojiSet(set));
    }
    Ok(actions)
}

/// Print `text` for pasting and log the copy as a preference signal.
fn copy_text(store: &mut StateStore, dashboard: &mut Dashboard, text: String) -> Result<()> {
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", text);
    println!("{}", "─".repeat(40).dimmed());
    store.dispatch(Action::RecordCopy(text))?;
    dashboard.notify("✓ Asset Copied • Feedback Logged");
    Ok(())
}

pub async fn handle_generate(
    args: GenerateArgs,
    data_dir: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let Session { config, mut store } = open_session(data_dir)?;
    let policy = args
        .form
        .policy
        .as_deref()
        .map(str::parse::<RelevancePolicy>)
        .transpose()?;
    store.apply_transient(form_actions(&args.form)?);
    let synth = build_synthesizer(&config, provider.as_deref(), model, policy)?;

    let state = store.state().clone();
    println!(
        "{} {} · {} · {}",
        "Synthesizing".cyan().bold(),
        state.topic,
        state.format,
        state.tone
    );

    let mut dashboard = Dashboard::new();
    dashboard.run_generation(&synth, &state).await;
    view::render_dashboard(&mut dashboard);

    let Some(result) = dashboard.result.clone() else {
        return Ok(());
    };

    for n in &args.save {
        match n.checked_sub(1).and_then(|i| result.original_posts.get(i)) {
            Some(post) => {
                store.dispatch(Action::SaveDraft(post.clone()))?;
                dashboard.notify("✓ Draft Saved to Matrix");
            }
            None => println!("{}", format!("No draft #{}", n).yellow()),
        }
    }
    if let Some(n) = args.copy {
        match n.checked_sub(1).and_then(|i| result.original_posts.get(i)) {
            Some(post) => copy_text(&mut store, &mut dashboard, post.full_text())?,
            None => println!("{}", format!("No draft #{}", n).yellow()),
        }
    }
    if let Some(out) = &args.out {
        let saved = SavedResult {
            topic: state.topic.clone(),
            format: state.format,
            intent: state.intent,
            result,
        };
        let json = serde_json::to_string_pretty(&saved)?;
        std::fs::write(out, json).with_context(|| format!("Failed to write {}", out.display()))?;
        println!("{} {}", "Result written to".dimmed(), out.display());
    }

    view::render_notifications(&mut dashboard);
    Ok(())
}

pub async fn handle_reply(
    inquiry: String,
    data_dir: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    if inquiry.trim().is_empty() {
        println!("{}", "Nothing to answer.".yellow());
        return Ok(());
    }
    let Session { config, store } = open_session(data_dir)?;
    let synth = build_synthesizer(&config, provider.as_deref(), model, None)?;

    let mut dashboard = Dashboard::new();
    dashboard.run_reply(&synth, store.state(), &inquiry).await;
    view::render_dashboard(&mut dashboard);
    Ok(())
}

pub async fn handle_inbox(
    data_dir: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let Session { config, mut store } = open_session(data_dir)?;
    let synth = build_synthesizer(&config, provider.as_deref(), model, None)?;
    let mut dashboard = Dashboard::new();

    println!("{}", "Smart Inbox".cyan().bold());
    println!("{}", "Paste a customer inquiry and press Enter.".yellow());
    println!("{}", "Type /copy to copy the last reply, or 'exit' to leave.".yellow());
    println!("{}", "---".dimmed());

    loop {
        print!("{} ", "Inquiry:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            println!("{}", "Goodbye! 👋".green());
            break;
        }
        if input.is_empty() {
            continue;
        }
        if input == "/copy" {
            match dashboard.reply.clone() {
                Some(reply) => copy_text(&mut store, &mut dashboard, reply)?,
                None => println!("{}", "No reply to copy yet.".yellow()),
            }
            view::render_notifications(&mut dashboard);
            continue;
        }

        println!("{}", "Analyzing intent...".dimmed());
        dashboard.run_reply(&synth, store.state(), input).await;
        view::render_dashboard(&mut dashboard);
        println!();
    }

    Ok(())
}

pub async fn handle_calendar(
    command: CalendarCommands,
    data_dir: Option<PathBuf>,
    provider: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let Session { config, store } = open_session(data_dir)?;
    let mut dashboard = Dashboard::new();

    match command {
        CalendarCommands::Plan => {
            let synth = build_synthesizer(&config, provider.as_deref(), model, None)?;
            println!("{}", "Planning 30 days of content...".cyan());
            dashboard.run_calendar(&synth, store.state()).await;
        }
        CalendarCommands::Export { from, start, every } => {
            let saved = read_saved_result(&from)?;
            let start = NaiveDate::parse_from_str(&start, "%Y-%m-%d")
                .with_context(|| format!("Invalid start date: {}", start))?;
            let options = ExportOptions {
                start,
                increment: every,
                topic: saved.topic,
                format: saved.format.to_string(),
                goal: saved.intent.to_string(),
            };
            dashboard.result = Some(saved.result);
            dashboard.export_calendar(&options);
            dashboard.result = None;
        }
    }

    view::render_dashboard(&mut dashboard);
    Ok(())
}

fn read_saved_result(path: &Path) -> Result<SavedResult> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a saved result", path.display()))
}

pub fn handle_knowledge(command: KnowledgeCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let Session { mut store, .. } = open_session(data_dir)?;

    match command {
        KnowledgeCommands::List { search } => {
            let term = search.unwrap_or_default();
            view::render_knowledge(&search_knowledge(&store.state().knowledge_base, &term));
        }
        KnowledgeCommands::Add { keyword, fact } => {
            if keyword.trim().is_empty() || fact.trim().is_empty() {
                println!("{}", "Keyword and fact are both required.".yellow());
                return Ok(());
            }
            let state = store.dispatch(Action::AddKnowledge { keyword, fact })?;
            if let Some(entry) = state.knowledge_base.last() {
                println!("{} {} ({})", "✓ Fact stored:".green(), entry.keyword, entry.id.dimmed());
            }
        }
        KnowledgeCommands::Remove { id } => {
            if !store.state().knowledge_base.iter().any(|k| k.id == id) {
                return Err(EngineError::NotFound(id).into());
            }
            store.dispatch(Action::RemoveKnowledge(id))?;
            println!("{}", "✓ Fact removed".green());
        }
    }
    Ok(())
}

pub fn handle_train(command: TrainCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let Session { mut store, .. } = open_session(data_dir)?;
    let mut dashboard = Dashboard::new();

    match command {
        TrainCommands::Add { category, text, file } => {
            let category = category_arg(&category)?;
            let sample = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => return Err(anyhow!("Provide sample text or --file")),
            };
            if sample.trim().is_empty() {
                println!("{}", "Sample is empty, nothing stored.".yellow());
                return Ok(());
            }
            store.dispatch(Action::AddTrainingSample {
                category: category.to_string(),
                sample,
            })?;
            dashboard.notify(format!("DNA Pattern Synced for {}", category));
        }
        TrainCommands::List { category } => {
            let category = category.as_deref().map(category_arg).transpose()?;
            view::render_training(store.state(), category);
        }
        TrainCommands::Remove { category, index } => {
            let category = category_arg(&category)?;
            if index >= store.state().training_for(category).len() {
                return Err(EngineError::NotFound(format!("{} sample #{}", category, index)).into());
            }
            store.dispatch(Action::RemoveTrainingSample {
                category: category.to_string(),
                index,
            })?;
            println!("{}", "✓ Sample removed".green());
        }
    }

    view::render_notifications(&mut dashboard);
    Ok(())
}

pub fn handle_drafts(command: DraftCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let Session { mut store, .. } = open_session(data_dir)?;
    let mut dashboard = Dashboard::new();

    match command {
        DraftCommands::List => view::render_drafts(&store.state().saved_drafts),
        DraftCommands::Remove { id } => {
            if !store.state().saved_drafts.iter().any(|d| d.id == id) {
                return Err(EngineError::NotFound(id).into());
            }
            store.dispatch(Action::DeleteDraft(id))?;
            println!("{}", "✓ Draft deleted".green());
        }
        DraftCommands::Share { id } => {
            let post = store
                .state()
                .saved_drafts
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or(EngineError::NotFound(id))?;
            copy_text(&mut store, &mut dashboard, post.share_text())?;
        }
    }

    view::render_notifications(&mut dashboard);
    Ok(())
}

pub fn handle_emoji(command: EmojiCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let Session { mut store, .. } = open_session(data_dir)?;

    match command {
        EmojiCommands::List => view::render_emoji_sets(store.state()),
        EmojiCommands::Set { name } => {
            let set = emoji_set(&name)
                .ok_or_else(|| anyhow!("Unknown emoji set: {}", name))?;
            store.dispatch(Action::SelectEmojiSet(set.to_string()))?;
            println!("{} {}", "✓ Emoji set:".green(), set);
        }
    }
    Ok(())
}

pub fn handle_copy(text: String, data_dir: Option<PathBuf>) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let Session { mut store, .. } = open_session(data_dir)?;
    let mut dashboard = Dashboard::new();
    copy_text(&mut store, &mut dashboard, text)?;
    view::render_notifications(&mut dashboard);
    Ok(())
}

pub fn handle_categories(data_dir: Option<PathBuf>) -> Result<()> {
    let Session { store, .. } = open_session(data_dir)?;
    view::render_categories(store.state());
    Ok(())
}

pub fn handle_status(data_dir: Option<PathBuf>, provider: Option<String>) -> Result<()> {
    let Session { config, store } = open_session(data_dir)?;
    let provider = provider.unwrap_or_else(|| config.default_provider.clone());
    view::render_status(store.state(), &provider, &config.relevance_policy.to_string());
    println!("Data directory:  {}", config.data_dir().display());
    Ok(())
}
