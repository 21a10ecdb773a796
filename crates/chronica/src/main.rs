//! chronica-admin CLI entry point.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronica::cli::{auth::AuthAction, categories::CategoriesAction, events::EventsAction,
    people::PeopleAction, resources::ResourcesAction, users::UsersAction, Cli, Commands,
    OutputFormat};
use chronica::config::Config;
use chronica::output::{format_json, pretty};
use chronica::stores::{LoginOutcome, StoreStatus};
use chronica::AppContext;
use chronica_client::BackendClient;
use chronica_core::backend::Blob;
use chronica_core::content::{
    CategoryDraft, CategoryPatch, EventDraft, NewUser, PersonDraft, ResourceDraft,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronica=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend = Arc::new(BackendClient::from_env());
    let ctx = AppContext::new(backend);

    match cli.command {
        Commands::Categories(cmd) => match cmd.action {
            CategoriesAction::List => {
                let categories = ctx.categories.list().await;
                check(&ctx.categories.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&categories)),
                    OutputFormat::Pretty => println!("{}", pretty::format_categories(&categories)),
                }
            }
            CategoriesAction::Search { query } => {
                let categories = ctx.categories.search(&query).await;
                check(&ctx.categories.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&categories)),
                    OutputFormat::Pretty => println!("{}", pretty::format_categories(&categories)),
                }
            }
            CategoriesAction::Create {
                name,
                description,
                image,
            } => {
                let media = load_media(image.as_deref()).await?;
                let draft = CategoryDraft {
                    name,
                    description,
                    ..Default::default()
                };
                let created = ctx.categories.create(draft, media).await;
                let created = require(created, &ctx.categories.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&created)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_category(&created))
                    }
                }
            }
            CategoriesAction::Get { id } => {
                let category = require(ctx.categories.get(id).await, &ctx.categories.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&category)),
                    OutputFormat::Pretty => println!("{}", pretty::format_category(&category)),
                }
            }
            CategoriesAction::Update {
                id,
                name,
                description,
                image,
            } => {
                let media = load_media(image.as_deref()).await?;
                let patch = CategoryPatch {
                    name,
                    description,
                    ..Default::default()
                };
                let updated = ctx.categories.update(id, patch, media).await;
                let updated = require(updated, &ctx.categories.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&updated)),
                    OutputFormat::Pretty => {
                        println!("Updated:\n{}", pretty::format_category(&updated))
                    }
                }
            }
            CategoriesAction::Delete { id } => {
                require_done(ctx.categories.remove(id).await, &ctx.categories.status())?;
                if !cli.quiet {
                    println!("Deleted category {}", id);
                }
            }
        },
        Commands::Events(cmd) => match cmd.action {
            EventsAction::List => {
                let events = ctx.events.list().await;
                check(&ctx.events.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&events)),
                    OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
                }
            }
            EventsAction::Search { query } => {
                let events = ctx.events.search(&query).await;
                check(&ctx.events.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&events)),
                    OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
                }
            }
            EventsAction::Create {
                title,
                content,
                start_date,
                end_date,
                day_month,
                important,
                source,
                author,
                categories,
                image,
            } => {
                let media = load_media(image.as_deref()).await?;
                let draft = EventDraft {
                    title,
                    content,
                    start_date,
                    end_date,
                    day_month,
                    important,
                    source,
                    category_ids: categories,
                    author_id: Some(author),
                    ..Default::default()
                };
                let created = ctx.events.create(draft, media).await;
                let created = require(created, &ctx.events.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&created)),
                    OutputFormat::Pretty => println!("Created:\n{}", pretty::format_event(&created)),
                }
            }
            EventsAction::Get { id } => {
                let event = require(ctx.events.get(id).await, &ctx.events.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&event)),
                    OutputFormat::Pretty => println!("{}", pretty::format_event(&event)),
                }
            }
            EventsAction::Delete { id } => {
                require_done(ctx.events.remove(id).await, &ctx.events.status())?;
                if !cli.quiet {
                    println!("Deleted event {}", id);
                }
            }
        },
        Commands::People(cmd) => match cmd.action {
            PeopleAction::List => {
                let people = ctx.people.list().await;
                check(&ctx.people.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&people)),
                    OutputFormat::Pretty => println!("{}", pretty::format_people(&people)),
                }
            }
            PeopleAction::Search { query } => {
                let people = ctx.people.search(&query).await;
                check(&ctx.people.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&people)),
                    OutputFormat::Pretty => println!("{}", pretty::format_people(&people)),
                }
            }
            PeopleAction::Create {
                name,
                biography,
                birth_date,
                death_date,
                nationality,
                profession,
                day_month,
                author,
                image,
            } => {
                let media = load_media(image.as_deref()).await?;
                let draft = PersonDraft {
                    name,
                    biography,
                    birth_date,
                    death_date,
                    nationality,
                    profession,
                    day_month,
                    author_id: Some(author),
                    ..Default::default()
                };
                let created = ctx.people.create(draft, media).await;
                let created = require(created, &ctx.people.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&created)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_person(&created))
                    }
                }
            }
            PeopleAction::Get { id } => {
                let person = require(ctx.people.get(id).await, &ctx.people.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&person)),
                    OutputFormat::Pretty => println!("{}", pretty::format_person(&person)),
                }
            }
            PeopleAction::Delete { id } => {
                require_done(ctx.people.remove(id).await, &ctx.people.status())?;
                if !cli.quiet {
                    println!("Deleted person {}", id);
                }
            }
        },
        Commands::Resources(cmd) => match cmd.action {
            ResourcesAction::List => {
                let resources = ctx.resources.list().await;
                check(&ctx.resources.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&resources)),
                    OutputFormat::Pretty => println!("{}", pretty::format_resources(&resources)),
                }
            }
            ResourcesAction::Create {
                event,
                media_type,
                source,
                author,
                file,
            } => {
                let media = load_media(file.as_deref()).await?;
                let draft = ResourceDraft {
                    event_id: event,
                    media_type: media_type.into(),
                    source,
                    author_id: Some(author),
                    url: None,
                };
                let created = ctx.resources.create(draft, media).await;
                let created = require(created, &ctx.resources.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&created)),
                    OutputFormat::Pretty => {
                        println!("Created:\n{}", pretty::format_resource(&created))
                    }
                }
            }
            ResourcesAction::Get { id } => {
                let resource = require(ctx.resources.get(id).await, &ctx.resources.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&resource)),
                    OutputFormat::Pretty => println!("{}", pretty::format_resource(&resource)),
                }
            }
            ResourcesAction::Delete { id } => {
                require_done(ctx.resources.remove(id).await, &ctx.resources.status())?;
                if !cli.quiet {
                    println!("Deleted resource {}", id);
                }
            }
        },
        Commands::Users(cmd) => match cmd.action {
            UsersAction::List => {
                let users = ctx.users.list().await;
                check(&ctx.users.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&users)),
                    OutputFormat::Pretty => println!("{}", pretty::format_users(&users)),
                }
            }
            UsersAction::Search { query } => {
                let users = ctx.users.search(&query).await;
                check(&ctx.users.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&users)),
                    OutputFormat::Pretty => println!("{}", pretty::format_users(&users)),
                }
            }
            UsersAction::Create {
                email,
                username,
                fullname,
                password,
                role,
                phone,
                image,
            } => {
                let media = load_media(image.as_deref()).await?;
                let new_user = NewUser {
                    email,
                    username,
                    fullname,
                    password,
                    role: role.into(),
                    phone_number: phone,
                };
                let created = ctx.users.add_user(new_user, media).await;
                let created = require(created, &ctx.users.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&created)),
                    OutputFormat::Pretty => println!("Created:\n{}", pretty::format_user(&created)),
                }
            }
            UsersAction::Get { id } => {
                let user = require(ctx.users.get(id).await, &ctx.users.status())?;
                match cli.format {
                    OutputFormat::Json => println!("{}", format_json(&user)),
                    OutputFormat::Pretty => println!("{}", pretty::format_user(&user)),
                }
            }
            UsersAction::Delete { id } => {
                require_done(ctx.users.delete_user(id).await, &ctx.users.status())?;
                if !cli.quiet {
                    println!("Deleted user {}", id);
                }
            }
        },
        Commands::Auth(cmd) => match cmd.action {
            AuthAction::Login { email, password } => match ctx.auth.login(&email, &password).await
            {
                LoginOutcome::LoggedIn(session) => {
                    if !cli.quiet {
                        let who = session.user.email.as_deref().unwrap_or("unknown");
                        println!("Logged in as {}", who);
                    }
                }
                LoginOutcome::Rejected(message) => return Err(anyhow!(message)),
            },
            AuthAction::Logout => {
                ctx.auth.logout().await?;
                if !cli.quiet {
                    println!("Logged out");
                }
            }
            AuthAction::Status => {
                if ctx.auth.check_current_auth_status().await {
                    println!("Authenticated");
                } else {
                    let status = ctx.auth.status();
                    match status.error {
                        Some(message) => println!("Not authenticated: {}", message),
                        None => println!("Not authenticated"),
                    }
                }
            }
            AuthAction::ResetPassword { email } => {
                ctx.auth.reset_password(&email).await?;
                if !cli.quiet {
                    println!("Recovery mail requested for {}", email);
                }
            }
            AuthAction::Oauth { provider } => {
                let config = Config::from_env();
                let url = ctx
                    .auth
                    .oauth_login(provider.into(), &config.oauth_callback_url())
                    .await;
                let url = require(url, &ctx.auth.status())?;
                println!("{}", url);
            }
        },
    }

    Ok(())
}

/// Read a file into a [`Blob`], inferring the content type from its
/// extension.
async fn load_media(path: Option<&Path>) -> Result<Option<Blob>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    };
    Ok(Some(Blob::new(file_name, content_type, bytes)))
}

/// Fail with the store's recorded error when an operation returned nothing.
fn require<T>(value: Option<T>, status: &StoreStatus) -> Result<T> {
    value.ok_or_else(|| status_error(status))
}

/// Fail with the store's recorded error when an operation reported `false`.
fn require_done(done: bool, status: &StoreStatus) -> Result<()> {
    if done {
        Ok(())
    } else {
        Err(status_error(status))
    }
}

/// Surface a recorded error from an operation whose empty result is valid.
fn check(status: &StoreStatus) -> Result<()> {
    match &status.error {
        Some(message) => Err(anyhow!("{message}")),
        None => Ok(()),
    }
}

fn status_error(status: &StoreStatus) -> anyhow::Error {
    anyhow!(
        "{}",
        status
            .error
            .clone()
            .unwrap_or_else(|| "operation failed".to_string())
    )
}
