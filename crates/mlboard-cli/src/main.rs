use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use mlboard_api::ApiClient;
use mlboard_app::auth::AuthFlow;
use mlboard_app::dashboard::DashboardPage;
use mlboard_app::predict::PredictPage;
use mlboard_app::report::ReportPage;
use mlboard_app::upload::UploadPage;
use mlboard_app::view_state::ViewState;
use mlboard_core::backend::Backend;
use mlboard_core::dataset::DatasetRef;
use mlboard_core::session::RegisterPayload;
use mlboard_core::validation;
use mlboard_infrastructure::{BoardPaths, FileSessionStore, UploadCache, config_service};

mod commands;
mod render;

use commands::{COMMAND_NAMES, Command};

type Repl = Editor<CliHelper, DefaultHistory>;

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMAND_NAMES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// All views plus the shared backend and session flow.
struct App {
    backend: Arc<ApiClient>,
    auth: AuthFlow,
    upload: UploadPage,
    dashboard: DashboardPage,
    predict: PredictPage,
    report: ReportPage,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ===== Backend and state initialization =====
    let config = config_service::load_config()?;
    let backend = Arc::new(ApiClient::new(&config)?);
    let store = Arc::new(FileSessionStore::new()?);
    let cache = UploadCache::new()?;

    let mut app = App {
        auth: AuthFlow::new(backend.clone(), store),
        upload: UploadPage::new(cache),
        dashboard: DashboardPage::new(),
        predict: PredictPage::new(),
        report: ReportPage::new(),
        backend,
    };

    // One-time storage reads before any view renders.
    if let Err(err) = app.auth.initialize().await {
        tracing::warn!(error = %err, "failed to read stored session");
    }
    if let Err(err) = app.upload.refresh_cached() {
        tracing::warn!(error = %err, "failed to read upload cache");
    }

    // ===== REPL setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));
    let history_path = BoardPaths::history_file().ok();
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    println!("{}", "=== MLBoard ===".bright_magenta().bold());
    match app.auth.current_user() {
        Some(user) => println!(
            "{}",
            format!("Logged in as {}.", user.user_name).bright_black()
        ),
        None => println!("{}", "Not logged in. Start with /login or /register.".bright_black()),
    }
    println!("{}", "Type /help for commands, 'quit' to exit.".bright_black());
    println!();

    // ===== Main REPL loop =====
    loop {
        match rl.readline("mlboard> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = Command::parse(trimmed);
                if command == Command::Quit {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if let Err(err) = dispatch(&mut app, &mut rl, command).await {
                    println!("{}", err.to_string().red());
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}

async fn dispatch(app: &mut App, rl: &mut Repl, command: Command) -> Result<()> {
    match command {
        Command::Help => print_help(),
        Command::Login => run_login(app, rl).await?,
        Command::Register => run_register(app, rl).await?,
        Command::Logout => {
            app.auth.logout().await?;
            println!("{}", "Logged out.".green());
        }
        Command::Whoami => match app.auth.current_user() {
            Some(user) => {
                println!("  {}", user.user_name.bold());
                if let Some(email) = &user.email {
                    println!("  {email}");
                }
                if let Some(expiration) = &user.expiration {
                    println!("  token expires: {expiration}");
                }
            }
            None => println!("{}", "Not logged in.".bright_black()),
        },
        Command::Datasets => {
            app.auth.require_token()?;
            let datasets = app.backend.user_datasets().await?;
            print_datasets(&datasets);
        }
        Command::Upload {
            path,
            target_column,
            run_auto_ml,
        } => {
            app.auth.require_token()?;
            let response = app
                .upload
                .submit(app.backend.as_ref(), &path, &target_column, run_auto_ml)
                .await?;
            println!("{}", "Dataset uploaded successfully.".green());
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::ClearCache => {
            app.upload.clear_cached()?;
            println!("{}", "Cached dataset cleared.".green());
        }
        Command::Dashboard(requested) => run_dashboard(app, requested).await?,
        Command::Report(requested) => run_report(app, requested).await?,
        Command::Predict(requested) => run_predict(app, rl, requested).await?,
        Command::Invalid(usage) => println!("{}", usage.yellow()),
        Command::Unknown(name) => {
            println!(
                "{}",
                format!("Unknown command: {name}. Type /help for commands.").bright_black()
            );
        }
        Command::Quit => {}
    }
    Ok(())
}

fn print_help() {
    println!("{}", "Commands".bold());
    println!("  /login                                  log in and store the session");
    println!("  /register                               create an account");
    println!("  /logout                                 clear the stored session");
    println!("  /whoami                                 show the current user");
    println!("  /datasets                               list your datasets");
    println!("  /upload <file> <target> [--no-automl]   upload a dataset");
    println!("  /clear-cache                            clear the cached upload response");
    println!("  /dashboard [id]                         show the dataset dashboard");
    println!("  /predict [id]                           fill the feature form and predict");
    println!("  /report [id]                            show the model report");
    println!("  quit                                    exit");
}

async fn run_login(app: &mut App, rl: &mut Repl) -> Result<()> {
    let user_name = rl.readline("Username: ")?;
    let password = rl.readline("Password: ")?;
    let session = app.auth.login(user_name.trim(), &password).await?;
    println!(
        "{}",
        format!("Welcome, {}.", session.user.user_name).green()
    );
    Ok(())
}

async fn run_register(app: &mut App, rl: &mut Repl) -> Result<()> {
    let payload = RegisterPayload {
        user_name: rl.readline("Username: ")?.trim().to_string(),
        full_name: rl.readline("Full name: ")?.trim().to_string(),
        phone_number1: rl.readline("Phone number (optional): ")?.trim().to_string(),
        email: rl.readline("Email: ")?.trim().to_string(),
        password: rl.readline("Password: ")?,
        confirm_password: rl.readline("Confirm password: ")?,
    };

    // Show every offending field at once before giving up.
    let errors = validation::validate_registration(&payload);
    if !errors.is_empty() {
        for error in errors {
            println!("{}", format!("{}: {}", error.field, error.message).red());
        }
        return Ok(());
    }

    let message = app.auth.register(&payload).await?;
    println!("{}", message.green());
    Ok(())
}

async fn run_dashboard(app: &mut App, requested: Option<String>) -> Result<()> {
    app.auth.require_token()?;
    match requested {
        Some(id) => app.dashboard.reload(app.backend.as_ref(), &id).await,
        None => app.dashboard.enter(app.backend.as_ref()).await,
    }

    if let Some(err) = &app.dashboard.datasets_error {
        println!("{}", format!("Failed to load your datasets: {err}").red());
    }
    match &app.dashboard.state {
        ViewState::Loaded(data) => {
            print!("{}", render::dashboard::render_dashboard(data));
            if let Some(fetched) = app.dashboard.last_fetched {
                println!(
                    "{}",
                    format!("Last fetched: {}", fetched.format("%H:%M:%S")).bright_black()
                );
            }
        }
        ViewState::Errored(message) => println!("{}", message.red()),
        _ => {
            if app.dashboard.datasets.is_empty() {
                println!("{}", "No datasets found. Upload one with /upload.".bright_black());
            }
        }
    }
    Ok(())
}

async fn run_report(app: &mut App, requested: Option<String>) -> Result<()> {
    app.auth.require_token()?;
    match requested {
        Some(id) => app.report.reload(app.backend.as_ref(), &id).await,
        None => app.report.enter(app.backend.as_ref()).await,
    }

    if let Some(err) = &app.report.datasets_error {
        println!("{}", format!("Failed to load your datasets: {err}").red());
    }
    match &app.report.state {
        ViewState::Loaded(report) => print!("{}", render::report::render_report(report)),
        ViewState::Errored(message) => println!("{}", message.red()),
        _ => {
            if app.report.datasets.is_empty() {
                println!("{}", "No datasets found. Upload one with /upload.".bright_black());
            }
        }
    }
    Ok(())
}

async fn run_predict(app: &mut App, rl: &mut Repl, requested: Option<String>) -> Result<()> {
    app.auth.require_token()?;
    match requested {
        Some(id) => app.predict.reload(app.backend.as_ref(), &id).await,
        None => app.predict.enter(app.backend.as_ref()).await,
    }

    if let Some(err) = &app.predict.datasets_error {
        println!("{}", format!("Failed to load your datasets: {err}").red());
    }
    if let Some(message) = app.predict.meta.error() {
        println!("{}", message.red());
        return Ok(());
    }
    let Some(meta) = app.predict.meta.data().cloned() else {
        println!("{}", "No datasets found. Upload one with /upload.".bright_black());
        return Ok(());
    };
    print!("{}", render::predict::render_meta(&app.predict, &meta));

    // Model selection
    if !meta.model_options.is_empty() {
        for (idx, name) in meta.model_options.iter().enumerate() {
            let marker = if app.predict.selected_model.as_deref() == Some(name) {
                "*"
            } else {
                " "
            };
            println!("  {marker} {} {}", idx + 1, name);
        }
        let current = app.predict.selected_model.clone().unwrap_or_default();
        let line = rl.readline(&format!("Model [{current}]: "))?;
        let entered = line.trim();
        if !entered.is_empty() {
            let picked = entered
                .parse::<usize>()
                .ok()
                .and_then(|n| meta.model_options.get(n.saturating_sub(1)).cloned())
                .unwrap_or_else(|| entered.to_string());
            app.predict.select_model(picked);
        }
    }

    // Feature values; empty input keeps the current value.
    for feature in &meta.features {
        let current = app
            .predict
            .values
            .get(&feature.name)
            .cloned()
            .unwrap_or_default();
        let line = rl.readline(&render::predict::feature_prompt(feature, &current))?;
        let entered = line.trim();
        if !entered.is_empty() {
            app.predict.set_value(&feature.name, entered.to_string());
        }
    }

    app.predict.submit(app.backend.as_ref()).await;
    if let Some(message) = &app.predict.predict_error {
        println!("{}", message.red());
    }
    if let Some(outcome) = &app.predict.result {
        print!("{}", render::predict::render_outcome(outcome));
    }
    Ok(())
}

fn print_datasets(datasets: &[DatasetRef]) {
    if datasets.is_empty() {
        println!("{}", "No datasets found.".bright_black());
        return;
    }
    for dataset in datasets {
        println!("  {}  {}", format!("{:>6}", dataset.id).cyan(), dataset.name);
    }
}
