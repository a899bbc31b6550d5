use super::args::{Cli, Commands};
use super::print::{print_config, print_notes, print_notice, print_profile, print_strength};
use clap::Parser;
use console::Term;
use notely::api::NotelyApi;
use notely::client::http::HttpTransport;
use notely::config::{ConfigKey, NotelyConfig, NotelyPaths};
use notely::controllers::{Notice, Submission};
use notely::error::{NotelyError, Result};
use notely::storage::fs::FileStorage;
use notely::validation::PasswordStrength;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const SIGNED_OUT: &str = "Not signed in.";
const LOGIN_FIRST: &str = "Please login first.";

struct AppContext {
    api: NotelyApi<FileStorage, HttpTransport>,
}

pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = NotelyPaths::resolve()?;
    debug!(data_dir = %paths.data_dir.display(), "resolved data directory");

    // Config edits need neither a session nor a network client
    if let Some(Commands::Config { key, value }) = cli.command {
        return handle_config(&paths, key, value);
    }

    let mut ctx = init_context(&paths, cli.api_url)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Some(Commands::Login { email, password }) => {
                handle_login(&mut ctx, email, password).await
            }
            Some(Commands::Register {
                name,
                email,
                password,
                confirm_password,
            }) => handle_register(&mut ctx, name, email, password, confirm_password).await,
            Some(Commands::Logout) => handle_logout(&mut ctx),
            Some(Commands::Whoami) => handle_whoami(&ctx),
            Some(Commands::Profile { name, email }) => handle_profile(&mut ctx, name, email).await,
            Some(Commands::List) | None => handle_list(&mut ctx).await,
            Some(Commands::Create { title, description }) => {
                handle_create(&mut ctx, title, description).await
            }
            Some(Commands::Edit {
                note,
                title,
                description,
            }) => handle_edit(&mut ctx, note, title, description).await,
            Some(Commands::Delete { notes }) => handle_delete(&mut ctx, notes).await,
            Some(Commands::Config { .. }) => Ok(true),
        }
    })
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("notely=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(paths: &NotelyPaths, api_url: Option<String>) -> Result<AppContext> {
    let config = NotelyConfig::load(&paths.data_dir)?
        .with_env_overrides()
        .with_api_url_override(api_url);
    debug!(api_url = %config.api_url, "using notes service");

    let storage = FileStorage::in_dir(&paths.data_dir);
    let transport = HttpTransport::from_config(&config);
    let api = NotelyApi::new(storage, transport)?;

    Ok(AppContext { api })
}

/// Prints what came of a form submission and maps it to an exit status.
fn report(submission: Submission) -> Result<bool> {
    match submission {
        Submission::Blocked(errors) => Err(NotelyError::Validation(errors)),
        Submission::Busy => {
            print_notice(&Notice::warning("A request is already in progress."));
            Ok(false)
        }
        Submission::Completed(notice) => {
            print_notice(&notice);
            Ok(true)
        }
        Submission::Failed(notice) => {
            print_notice(&notice);
            Ok(false)
        }
    }
}

fn require_session(ctx: &AppContext) -> bool {
    if ctx.api.session().is_authenticated() {
        return true;
    }
    print_notice(&Notice::warning(LOGIN_FIRST));
    false
}

fn prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let term = Term::stderr();
    term.write_str(&format!("{}: ", label))?;
    Ok(term.read_line()?)
}

fn prompt_secret(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let term = Term::stderr();
    term.write_str(&format!("{}: ", label))?;
    Ok(term.read_secure_line()?)
}

async fn handle_login(
    ctx: &mut AppContext,
    email: Option<String>,
    password: Option<String>,
) -> Result<bool> {
    let email = prompt(email, "Email")?;
    let password = prompt_secret(password, "Password")?;
    report(ctx.api.login(&email, &password).await?)
}

async fn handle_register(
    ctx: &mut AppContext,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
) -> Result<bool> {
    let name = prompt(name, "Name")?;
    let email = prompt(email, "Email")?;
    let password = prompt_secret(password, "Password")?;
    print_strength(PasswordStrength::of(&password));
    let confirm_password = prompt_secret(confirm_password, "Confirm password")?;

    report(
        ctx.api
            .register(&name, &email, &password, &confirm_password)
            .await?,
    )
}

fn handle_logout(ctx: &mut AppContext) -> Result<bool> {
    if !ctx.api.session().is_authenticated() {
        print_notice(&Notice::info(SIGNED_OUT));
        return Ok(true);
    }
    ctx.api.sign_out()?;
    print_notice(&Notice::success("Signed out."));
    Ok(true)
}

fn handle_whoami(ctx: &AppContext) -> Result<bool> {
    match ctx.api.session().user() {
        Some(user) => print_profile(user),
        None => print_notice(&Notice::info(SIGNED_OUT)),
    }
    Ok(true)
}

async fn handle_profile(
    ctx: &mut AppContext,
    name: Option<String>,
    email: Option<String>,
) -> Result<bool> {
    if name.is_none() && email.is_none() {
        return match ctx.api.session().user() {
            Some(user) => {
                print_profile(user);
                Ok(true)
            }
            None => {
                print_notice(&Notice::warning(
                    notely::controllers::profile::PROFILE_SIGNED_OUT,
                ));
                Ok(false)
            }
        };
    }

    let outcome = ctx
        .api
        .update_profile(name.as_deref(), email.as_deref())
        .await?;
    let updated = report(outcome)?;
    if updated {
        if let Some(user) = ctx.api.session().user() {
            print_profile(user);
        }
    }
    Ok(updated)
}

async fn handle_list(ctx: &mut AppContext) -> Result<bool> {
    if !require_session(ctx) {
        return Ok(false);
    }
    let notes = ctx.api.list_notes().await?;
    print_notes(notes);
    Ok(true)
}

async fn handle_create(ctx: &mut AppContext, title: String, description: String) -> Result<bool> {
    if !require_session(ctx) {
        return Ok(false);
    }
    report(ctx.api.create_note(&title, &description).await)
}

async fn handle_edit(
    ctx: &mut AppContext,
    note: String,
    title: Option<String>,
    description: Option<String>,
) -> Result<bool> {
    if !require_session(ctx) {
        return Ok(false);
    }
    let id = ctx.api.resolve_note(&note).await?;
    let outcome = ctx
        .api
        .update_note(&id, title.as_deref(), description.as_deref())
        .await?;
    report(outcome)
}

async fn handle_delete(ctx: &mut AppContext, notes: Vec<String>) -> Result<bool> {
    if !require_session(ctx) {
        return Ok(false);
    }

    // Positions refer to the list as it is now, so resolve them all up front
    let mut ids = Vec::with_capacity(notes.len());
    for selector in &notes {
        ids.push(ctx.api.resolve_note(selector).await?);
    }

    let mut all_deleted = true;
    for id in ids {
        all_deleted &= report(ctx.api.delete_note(&id).await)?;
    }
    Ok(all_deleted)
}

fn handle_config(paths: &NotelyPaths, key: Option<String>, value: Option<String>) -> Result<bool> {
    let mut config = NotelyConfig::load(&paths.data_dir)?;

    let Some(name) = key else {
        print_config(&config);
        return Ok(true);
    };
    let key = ConfigKey::parse(&name)
        .ok_or_else(|| NotelyError::Config(format!("unknown config key '{}'", name)))?;

    match value {
        None => println!("{} = {}", key.name(), config.get(key)),
        Some(value) => {
            config.set(key, &value)?;
            config.save(&paths.data_dir)?;
            print_notice(&Notice::success(format!(
                "{} set to {}",
                key.name(),
                config.get(key)
            )));
        }
    }
    Ok(true)
}
