use chrono::Utc;
use colored::*;

use crate::core::{AppState, CalendarResult, GeneratedPost, GenerationResult, KnowledgeEntry, CATEGORIES, EMOJI_SETS};
use crate::dashboard::Dashboard;

pub fn render_dashboard(dashboard: &mut Dashboard) {
    if let Some(error) = &dashboard.error {
        println!("{} {}", "✗".red().bold(), error.red());
    }
    if let Some(result) = &dashboard.result {
        render_result(result);
    }
    if let Some(calendar) = &dashboard.calendar {
        render_calendar(calendar);
    }
    if let Some(reply) = &dashboard.reply {
        println!("\n{}", "Polished Draft".green().bold());
        println!("{}", reply);
    }
    render_notifications(dashboard);
}

pub fn render_notifications(dashboard: &mut Dashboard) {
    let now = Utc::now();
    for notice in dashboard.notifications.active(now) {
        println!("{}", notice.message.black().on_white());
    }
    dashboard.notifications.expire(now);
}

pub fn render_result(result: &GenerationResult) {
    println!("\n{}", "Structural DNA".cyan().bold());
    for pattern in &result.patterns {
        println!("  {} {}", "◆".blue(), pattern.name.bold());
        println!("    {}", pattern.description);
        println!("    {}", format!("\"{}\"", pattern.example).dimmed().italic());
    }

    println!("\n{}", "Deployment Ready Drafts".cyan().bold());
    for (i, post) in result.original_posts.iter().enumerate() {
        render_post(i + 1, post);
    }

    if !result.tone_variants.is_empty() {
        println!("\n{}", "Tone Variants".cyan().bold());
        for variant in &result.tone_variants {
            println!("  {} {}", variant.tone.yellow().bold(), variant.content);
        }
    }
    if !result.style_variants.is_empty() {
        println!("\n{}", "Style Variants".cyan().bold());
        for variant in &result.style_variants {
            println!("  {} {}", variant.style.magenta().bold(), variant.content);
        }
    }
}

pub fn render_post(number: usize, post: &GeneratedPost) {
    println!();
    println!("{} {}", format!("[{}]", number).blue().bold(), post.id.dimmed());
    if let Some(title) = post.title.as_deref().filter(|t| !t.trim().is_empty()) {
        println!("{}", title.bold().underline());
    }
    println!("{} {}", post.emojis, post.hook.bold());
    println!("{}", post.body);
    println!("{}", post.cta.green());
    println!("{}", post.hashtags.blue());
}

pub fn render_calendar(calendar: &CalendarResult) {
    println!("\n{} {}", "Content Calendar".cyan().bold(), calendar.month_name.yellow());
    for entry in &calendar.entries {
        let date = entry.date.as_deref().unwrap_or("");
        println!(
            "{:>3} {:<10} {:<22} {:<20} {}",
            entry.day,
            date.dimmed(),
            entry.topic,
            entry.format.dimmed(),
            entry.hook
        );
        println!("    {} {}", "goal:".dimmed(), entry.goal);
    }
}

pub fn render_knowledge(entries: &[&KnowledgeEntry]) {
    if entries.is_empty() {
        println!("{}", "No facts match.".yellow());
        return;
    }
    println!("{}", format!("Knowledge Bank ({})", entries.len()).cyan().bold());
    for entry in entries {
        println!("  {} {}", entry.keyword.bold(), entry.id.dimmed());
        println!("    {}", entry.fact);
    }
}

pub fn render_training(state: &AppState, category: Option<&str>) {
    let categories: Vec<&str> = match category {
        Some(c) => vec![c],
        None => CATEGORIES.to_vec(),
    };
    for name in categories {
        let samples = state.training_for(name);
        if category.is_none() {
            println!("  {:<22} {} patterns", name, samples.len());
            continue;
        }
        println!("{}", format!("Memory for {} ({} patterns)", name, samples.len()).cyan().bold());
        for (i, sample) in samples.iter().enumerate() {
            println!("  {} {}", format!("#{}", i).dimmed(), sample);
        }
        if samples.is_empty() {
            println!("{}", "Upload stylistic samples to teach the generator this category's voice.".yellow());
        }
    }
}

pub fn render_drafts(drafts: &[GeneratedPost]) {
    if drafts.is_empty() {
        println!("{}", "No saved drafts yet.".yellow());
        return;
    }
    println!("{}", format!("Matrix Drafts ({})", drafts.len()).cyan().bold());
    for (i, post) in drafts.iter().enumerate() {
        render_post(i + 1, post);
    }
}

pub fn render_categories(state: &AppState) {
    println!("{}", "Service Categories".cyan().bold());
    for category in CATEGORIES {
        let marker = if category == state.topic { "●".green() } else { "○".dimmed() };
        let trained = if state.training_for(category).is_empty() { "" } else { " (trained)" };
        println!("  {} {}{}", marker, category, trained.magenta());
    }
}

pub fn render_emoji_sets(state: &AppState) {
    for (name, set) in EMOJI_SETS {
        let marker = if set == state.selected_emoji_set { "●".green() } else { "○".dimmed() };
        println!("  {} {:<10} {}", marker, name, set);
    }
}

pub fn render_status(state: &AppState, provider: &str, policy: &str) {
    println!("{}", "Authority Engine".cyan().bold());
    println!("Brand:           {}", state.brand);
    println!("Provider:        {}", provider);
    println!("Fact isolation:  {}", policy);
    println!("Knowledge facts: {}", state.knowledge_base.len());
    println!("Saved drafts:    {}", state.saved_drafts.len());
    println!("Copies logged:   {}", state.copy_count);
    println!("Emoji set:       {}", state.selected_emoji_set);
}
