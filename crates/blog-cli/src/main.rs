//! Inkwell — command-line client for the blog platform.
//!
//! A thin presentation layer: each subcommand invokes a store operation (or
//! a direct API call for reads outside the stores) and renders the result.

use std::path::PathBuf;

use blog_api::{BlogApiClient, Post, PostPayload};
use clap::{Parser, Subcommand};
use client_config::{init_logging, Config, Paths};
use client_engine::{
    ContentStore, EngineError, LoginForm, RegistrationForm, SessionStore, SlotPersistence,
};
use client_storage::FileStorage;

/// Inkwell command-line interface.
#[derive(Parser)]
#[command(name = "inkwell")]
#[command(about = "Command-line client for the Inkwell blog platform")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "INKWELL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Base directory for client files (config, session). Defaults to ~/.inkwell
    #[arg(long, global = true, env = "INKWELL_BASE_DIR")]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account and log in
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List all posts
    List,
    /// List your own posts
    Mine,
    /// Show a single post
    Show { id: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Edit a post; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a post
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    paths.ensure_dirs()?;
    let config = Config::load(&paths)?;
    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));
    tracing::debug!(api_url = %config.api_url, "Client starting");

    let client = BlogApiClient::new(config.api_url.clone());
    let persistence = SlotPersistence::new(Box::new(FileStorage::new(paths.slots_file())));
    let session = SessionStore::new(client.clone(), Box::new(persistence));
    let content = ContentStore::new(client.clone());

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let form = RegistrationForm {
                username,
                email,
                password,
                confirm_password,
            };
            let identity = session.register(&form).await.map_err(report)?;
            println!("Registered and logged in as {}", identity.username);
        }
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            let identity = session.login(&form).await.map_err(report)?;
            println!("Logged in as {}", identity.username);
        }
        Commands::Logout => {
            session.logout();
            println!("Logged out");
        }
        Commands::Whoami => match session.credential() {
            Some(token) => {
                let profile = client.current_user(&token).await?;
                match profile.email {
                    Some(email) => println!("{} <{}>", profile.username, email),
                    None => println!("{}", profile.username),
                }
            }
            None => println!("Not logged in"),
        },
        Commands::List => {
            let posts = content.list_all().await.map_err(report)?;
            print_posts(&posts);
        }
        Commands::Mine => {
            let posts = content
                .list_mine(session.credential().as_deref())
                .await
                .map_err(report)?;
            print_posts(&posts);
        }
        Commands::Show { id } => {
            let post = client.get_post(&id).await?;
            print_post(&post);
        }
        Commands::Create { title, content: body } => {
            let payload = PostPayload {
                title,
                content: body,
            };
            let post = content
                .create(&payload, session.credential().as_deref())
                .await
                .map_err(report)?;
            println!("Created post {}", post.id);
        }
        Commands::Edit { id, title, content: body } => {
            let payload = match (title, body) {
                (Some(title), Some(content)) => PostPayload { title, content },
                (title, body) => {
                    // Pull the current post so omitted fields keep their value.
                    let existing = client.get_post(&id).await?;
                    PostPayload {
                        title: title.unwrap_or(existing.title),
                        content: body.unwrap_or(existing.content),
                    }
                }
            };
            let post = content
                .edit(&id, &payload, session.credential().as_deref())
                .await
                .map_err(report)?;
            println!("Updated post {}", post.id);
        }
        Commands::Delete { id } => {
            let Some(token) = session.credential() else {
                anyhow::bail!("not logged in");
            };
            client.delete_post(&id, &token).await?;
            println!("Deleted post {}", id);
        }
    }

    Ok(())
}

/// Surface field-level validation messages before handing the error up.
fn report(err: EngineError) -> anyhow::Error {
    if let EngineError::Validation(errors) = &err {
        for e in errors.iter() {
            eprintln!("{}: {}", e.field, e.message);
        }
    }
    anyhow::Error::new(err)
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts.");
        return;
    }
    for post in posts {
        println!(
            "{}  {}  by {}  ({} views)",
            post.id,
            post.title,
            post.author.username().unwrap_or(post.author.id()),
            post.views
        );
    }
}

fn print_post(post: &Post) {
    println!("{}", post.title);
    println!(
        "by {}  ({} views)",
        post.author.username().unwrap_or(post.author.id()),
        post.views
    );
    if let Some(created_at) = post.created_at {
        println!("created {}", created_at.to_rfc3339());
    }
    println!();
    println!("{}", post.content);
}
