//! # CLI Layer
//!
//! One possible UI client for cms. This is the only place that parses
//! arguments, writes to stdout/stderr, installs the log subscriber and
//! decides exit codes.
//!
//! - `run()`: parses arguments and dispatches
//! - `init_context()`: loads config, opens the store, builds `CmsApi`
//! - `handle_*()`: per-command handlers that call the API and print

use super::print::{print_config, print_json, print_messages, print_post, print_posts};
use super::setup::{Cli, Commands, PostCommands, Target};
use clap::Parser;
use cms::api::{CmsApi, ConfigAction, CreateOptions, PostUpdate};
use cms::config::CmsConfig;
use cms::context::OpContext;
use cms::editor::SystemEditor;
use cms::error::{CmsError, Result};
use cms::form::DialoguerForm;
use cms::model::{FieldOverrides, PostInput, PostSelector};
use cms::store::sqlite::SqliteStore;
use colored::Colorize;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CMS_LOG";
const HOME_ENV: &str = "CMS_HOME";

struct AppContext {
    api: CmsApi<SqliteStore>,
    op: OpContext,
    auto_slug: bool,
    default_limit: i64,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_dir = config_dir()?;

    // Config doesn't need a store
    let command = match cli.command {
        Commands::Config { key, value } => return handle_config(&config_dir, key, value),
        Commands::Posts { command } => command,
    };

    let ctx = init_context(&config_dir, cli.database_url.as_deref())?;

    match command {
        PostCommands::Create {
            title,
            content,
            author,
            slug,
            editor,
            no_slug,
        } => {
            let input = PostInput {
                title: title.clone().unwrap_or_default(),
                content: content.unwrap_or_default(),
                author: author.unwrap_or_default(),
                slug: slug.unwrap_or_default(),
            };
            handle_create(&ctx, input, title.is_none(), editor, no_slug)
        }
        PostCommands::Get { target, json } => handle_get(&ctx, target, json),
        PostCommands::Update {
            target,
            title,
            content,
            author,
            editor,
            new_slug,
        } => {
            let update = PostUpdate {
                overrides: FieldOverrides {
                    title,
                    content,
                    author,
                },
                use_editor: editor,
                new_slug,
            };
            handle_update(&ctx, target, &update)
        }
        PostCommands::Delete { target, force } => handle_delete(&ctx, target, force),
        PostCommands::List {
            limit,
            offset,
            json,
        } => handle_list(&ctx, limit, offset, json),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "cms", "cms")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CmsError::Config("could not determine config directory".to_string()))
}

fn init_context(config_dir: &Path, database_url: Option<&str>) -> Result<AppContext> {
    let config = CmsConfig::load(config_dir)?;
    let url = config.resolve_database_url(database_url);
    debug!(config_dir = %config_dir.display(), database_url = %url, "initializing");

    let store = SqliteStore::open(&url)?;
    debug!(location = store.location(), "store opened");
    let editor = SystemEditor::detect(config.editor.as_deref());
    let api = CmsApi::new(store, Box::new(editor));

    Ok(AppContext {
        api,
        op: OpContext::background(),
        auto_slug: config.auto_slug,
        default_limit: config.default_limit,
    })
}

fn handle_create(
    ctx: &AppContext,
    input: PostInput,
    interactive: bool,
    use_editor: bool,
    no_slug: bool,
) -> Result<()> {
    let opts = CreateOptions {
        use_editor,
        auto_slug: ctx.auto_slug && !no_slug,
    };

    let result = if interactive {
        ctx.api
            .create_post_interactive(&ctx.op, &DialoguerForm::new(), &input, opts)?
    } else {
        ctx.api.create_post(&ctx.op, &input, opts)?
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_get(ctx: &AppContext, target: Target, json: bool) -> Result<()> {
    let result = ctx.api.get_post(&ctx.op, target.id, target.slug)?;
    if json {
        if let Some(post) = result.listed_posts.first() {
            print_json(post)?;
        }
    } else {
        for post in &result.listed_posts {
            print_post(post);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(ctx: &AppContext, target: Target, update: &PostUpdate) -> Result<()> {
    let result = ctx
        .api
        .update_post(&ctx.op, target.id, target.slug, update)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, target: Target, force: bool) -> Result<()> {
    if !force {
        let selector = PostSelector::from_parts(target.id, target.slug)?;
        println!(
            "{}",
            format!(
                "Are you sure you want to delete the post with {}? Use --force to skip this confirmation.",
                selector
            )
            .yellow()
        );
        return Ok(());
    }

    let result = ctx.api.delete_post(&ctx.op, target.id, target.slug)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, limit: Option<i64>, offset: i64, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(ctx.default_limit);
    let result = ctx.api.list_posts(&ctx.op, limit, offset)?;
    if json {
        print_json(&result.listed_posts)?;
    } else {
        print_posts(&result.listed_posts);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(config_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = cms::commands::config::run(config_dir, action.clone())?;
    if let (ConfigAction::ShowAll, Some(config)) = (&action, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}
