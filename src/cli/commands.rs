use clap::Subcommand;
use std::path::PathBuf;

/// Largest gap, in days, accepted between exported posts.
pub const MAX_EXPORT_INCREMENT: i64 = 3650;

#[derive(Subcommand)]
pub enum KnowledgeCommands {
    /// List facts in the knowledge bank
    List {
        /// Only show facts whose keyword or text contains this term
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a verified fact
    Add {
        /// Short label, e.g. "TM30 Service"
        keyword: String,
        /// The fact itself
        fact: String,
    },
    /// Remove a fact by id
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TrainCommands {
    /// Store a successful post as a style sample for a category
    Add {
        /// Service category
        category: String,
        /// Sample text (omit to use --file)
        text: Option<String>,
        /// Read the sample from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show stored samples
    List {
        /// Category to show; all categories when omitted
        category: Option<String>,
    },
    /// Forget one sample
    Remove {
        category: String,
        /// Sample index as shown by `train list`
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Show saved drafts
    List,
    /// Delete a saved draft
    Remove {
        id: String,
    },
    /// Print the full post and log it as copied
    Share {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CalendarCommands {
    /// Ask the completion service for a 30-day plan
    Plan,
    /// Lay out the drafts of a saved generation result on a calendar
    Export {
        /// Result file written by `generate --out`
        #[arg(long)]
        from: PathBuf,
        /// First publishing day (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Days between posts; values below 1 count as 1
        #[arg(
            long,
            default_value = "1",
            allow_hyphen_values = true,
            value_parser = clap::value_parser!(i64).range(..=MAX_EXPORT_INCREMENT)
        )]
        every: i64,
    },
}

#[derive(Subcommand)]
pub enum EmojiCommands {
    /// Show the available emoji sets
    List,
    /// Select an emoji set by name
    Set {
        name: String,
    },
}
