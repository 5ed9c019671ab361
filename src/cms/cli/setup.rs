use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cms", bin_name = "cms", version)]
#[command(about = "Manage blog posts from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL (e.g. sqlite://./blog.db or a plain path)
    #[arg(short, long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage blog posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (database-url, editor, auto-slug, default-limit)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

/// Exactly one of `--id` / `--slug`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// ID of the post
    #[arg(short, long)]
    pub id: Option<i64>,

    /// Slug of the post
    #[arg(short, long)]
    pub slug: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// Create a new post (prompts for fields when no title is given)
    #[command(alias = "add")]
    Create {
        /// Title of the post
        #[arg(short, long)]
        title: Option<String>,

        /// Content of the post (ignored if --editor is used)
        #[arg(short, long)]
        content: Option<String>,

        /// Author of the post
        #[arg(short, long)]
        author: Option<String>,

        /// URL slug (derived from the title when omitted)
        #[arg(short, long)]
        slug: Option<String>,

        /// Write the content in $EDITOR
        #[arg(short, long)]
        editor: bool,

        /// Don't derive a slug from the title
        #[arg(long)]
        no_slug: bool,
    },

    /// Show a single post
    Get {
        #[command(flatten)]
        target: Target,

        /// Print the post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of a post
    #[command(alias = "edit")]
    Update {
        #[command(flatten)]
        target: Target,

        /// New title for the post
        #[arg(short, long)]
        title: Option<String>,

        /// New content for the post (ignored if --editor is used)
        #[arg(short, long)]
        content: Option<String>,

        /// New author for the post
        #[arg(short, long)]
        author: Option<String>,

        /// Open editor for content editing
        #[arg(short, long)]
        editor: bool,

        /// Rename the slug (an empty value clears it)
        #[arg(long)]
        new_slug: Option<String>,
    },

    /// Delete a post
    #[command(alias = "remove")]
    Delete {
        #[command(flatten)]
        target: Target,

        /// Force delete without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// List posts
    #[command(alias = "ls")]
    List {
        /// Maximum number of posts, newest first (0 lists all in id order)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of posts to skip (only with a positive limit)
        #[arg(short, long, default_value_t = 0)]
        offset: i64,

        /// Print the posts as JSON
        #[arg(long)]
        json: bool,
    },
}
