//! postql demo
//!
//! Builds an engine (optionally seeded), subscribes to the posts topic and
//! one comment topic, runs a short mutation script and prints every
//! delivered notification as JSON.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use postql::{
    CommentPatch, CreateComment, CreatePost, CreateUser, EngineConfig, PostPatch, PostqlEngine,
    StoreResult, Subscription,
};

/// Demo configuration
struct Args {
    /// Optional JSON engine configuration
    config: Option<PathBuf>,
    /// Load the demo data set
    seed: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: None,
        seed: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("error: --config requires a value");
                    std::process::exit(1);
                }
            }
            "--seed" | "-s" => {
                parsed.seed = true;
                i += 1;
            }
            "--help" | "-h" => {
                println!("postql-demo - postql notification walkthrough");
                println!();
                println!("USAGE:");
                println!("    postql-demo [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -c, --config <FILE>       JSON engine configuration");
                println!("    -s, --seed                Load the demo data set");
                println!("    -h, --help                Print help information");
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    parsed
}

fn load_config(args: &Args) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    config.seed_demo_data |= args.seed;
    Ok(config)
}

fn print_pending(label: &str, sub: &Subscription) -> StoreResult<()> {
    for notification in sub.drain() {
        let json = serde_json::to_string(&notification)
            .map_err(|e| postql::StoreError::internal(format!("serialize notification: {e}")))?;
        println!("[{label}] {json}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();
    let config = load_config(&args)?;
    let engine = PostqlEngine::with_config(config)?;
    info!(
        users = engine.users(None)?.len(),
        posts = engine.posts(None)?.len(),
        "engine ready"
    );

    let posts = engine.subscribe_posts()?;

    let author = engine.create_user(CreateUser::new("Demo Author", "demo@example.com"))?;
    let draft = engine.create_post(CreatePost::new(
        "Hello",
        "Drafts are invisible to subscribers",
        false,
        author.id,
    ))?;
    print_pending("posts", &posts)?;

    let comments = engine.subscribe_comments(draft.id)?;

    engine.update_post(draft.id, PostPatch::published(true))?;
    let comment = engine.create_comment(CreateComment::new("First!", author.id, draft.id))?;
    engine.update_comment(comment.id, CommentPatch::text("First! (edited)"))?;
    engine.update_post(draft.id, PostPatch::title("Hello, world"))?;
    engine.update_post(draft.id, PostPatch::published(false))?;
    engine.delete_user(author.id)?;

    print_pending("posts", &posts)?;
    print_pending("comments", &comments)?;

    info!(
        users = engine.users(None)?.len(),
        posts = engine.posts(None)?.len(),
        "demo finished"
    );
    Ok(())
}
