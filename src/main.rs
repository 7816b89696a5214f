use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradelog::application::forms::asset_draft::DraftField;
use tradelog::application::forms::sign_in::SignInForm;
use tradelog::application::forms::sign_up::SignUpForm;
use tradelog::application::journal_app::JournalApp;
use tradelog::application::services::asset_registry::MarketAssetRegistry;
use tradelog::application::ui::alert::Alert;
use tradelog::application::ui::format::{format_date, format_rate, format_won};
use tradelog::auth;
use tradelog::config::AppConfig;
use tradelog::domain::errors::WorkflowError;
use tradelog::domain::repositories::token_store::TokenStore;
use tradelog::infrastructure::api_client::ApiClient;
use tradelog::infrastructure::token_store::FileTokenStore;

#[derive(Parser)]
#[command(name = "tradelog", version, about = "Trading journal client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TRADELOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TRADELOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List the market asset catalog
    Assets {
        #[arg(long)]
        search: Option<String>,
    },
    /// List trading logs, newest first
    List,
    /// Show one trading log with its positions
    Show { id: i64 },
    /// Write a new trading log
    Add {
        #[arg(long)]
        date: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        contents: String,
        /// Position as TICKER:AMOUNT:BUY_PRICE, repeatable
        #[arg(long = "asset", value_name = "TICKER:AMOUNT:BUY_PRICE")]
        assets: Vec<String>,
    },
    /// Delete a trading log
    Delete { id: i64 },
    /// Attach a position to a trading log
    Attach {
        diary_id: i64,
        ticker: String,
        amount: String,
        buy_price: String,
    },
    /// Remove a position from a trading log
    Detach { diary_id: i64, diary_asset_id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tradelog::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();
    config.validate()?;
    let cli = Cli::parse();

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path()));
    let backend = Arc::new(ApiClient::new(&config.api_url, tokens.clone())?);
    info!("Using backend {}", backend.base_url());

    let result = run(cli.command, backend, tokens).await;
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

async fn run(
    command: Command,
    backend: Arc<ApiClient>,
    tokens: Arc<dyn TokenStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Login { email, password } => {
            let mut form = SignInForm::new(backend, tokens);
            form.set_email(&email);
            form.set_password(&password);
            match form.submit().await {
                Ok(session) => println!("Signed in as {}", session.email),
                Err(e) => return Err(explain(e, form.alert())),
            }
        }
        Command::Signup {
            email,
            password,
            confirm,
        } => {
            let mut form = SignUpForm::new(backend);
            form.set_email(&email);
            form.set_password(&password);
            form.set_password_confirmation(&confirm);
            match form.submit().await {
                Ok(()) => println!("Account created. Sign in with `tradelog login`."),
                Err(e) => return Err(explain(e, form.alert())),
            }
        }
        Command::Logout => {
            tokens.clear()?;
            println!("Signed out");
        }
        Command::Whoami => match tokens.load().and_then(|t| auth::decode_session(&t)) {
            Some(session) => println!("{} (user {})", session.email, session.user_id),
            None => println!("Not signed in"),
        },
        command => {
            let mut app = JournalApp::new(backend, tokens, MarketAssetRegistry::new());
            if app.restore().await?.is_none() {
                return Err(WorkflowError::NotSignedIn.into());
            }
            journal(command, &mut app).await?;
        }
    }
    Ok(())
}

async fn journal(command: Command, app: &mut JournalApp) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Assets { search } => {
            let assets = app.registry().snapshot();
            let wanted = search.map(|s| app.registry().suggest(&s));
            for asset in assets {
                if wanted.as_ref().is_some_and(|w| !w.contains(&asset.ticker)) {
                    continue;
                }
                println!(
                    "{:>6}  {:<10} {:<24} {}",
                    asset.id,
                    asset.ticker,
                    asset.name,
                    format_won(asset.current_price())
                );
            }
        }
        Command::List => {
            for log in app.feed().logs() {
                println!("{:>6}  {:<14} {}", log.id, format_date(&log.date), log.title);
            }
        }
        Command::Show { id } => {
            select(app, id).await?;
            print_viewer(app);
        }
        Command::Add {
            date,
            title,
            contents,
            assets,
        } => {
            app.open_add_form();
            let form = app.add_form_mut();
            form.set_date(&date);
            form.set_title(&title);
            form.set_contents(&contents);
            for (index, entry) in assets.iter().enumerate() {
                let mut parts = entry.splitn(3, ':');
                let ticker = parts.next().unwrap_or_default();
                let amount = parts.next().unwrap_or_default();
                let buy_price = parts.next().unwrap_or_default();
                if index > 0 {
                    form.add_asset_row();
                }
                form.set_asset_field(index, DraftField::Ticker, ticker);
                form.set_asset_field(index, DraftField::Amount, amount);
                form.set_asset_field(index, DraftField::BuyPrice, buy_price);
            }
            if app.add_form().is_submit_disabled() {
                return Err("date (YYYY-MM-DD), title and contents are required".into());
            }
            let report = app.submit_add_form().await.map_err(|e| explain(e, app.alert()))?;
            println!(
                "Created trading log {} with {} position(s)",
                report.trading_log.id, report.attached
            );
            for failure in &report.failures {
                println!("  could not attach {}: {}", failure.ticker, failure.error);
            }
        }
        Command::Delete { id } => {
            select(app, id).await?;
            app.delete_selected()
                .await
                .map_err(|e| explain(e, app.alert()))?;
            println!("Deleted trading log {}", id);
        }
        Command::Attach {
            diary_id,
            ticker,
            amount,
            buy_price,
        } => {
            select(app, diary_id).await?;
            let viewer = app.viewer();
            viewer.set_draft_field(DraftField::Ticker, &ticker);
            viewer.set_draft_field(DraftField::Amount, &amount);
            viewer.set_draft_field(DraftField::BuyPrice, &buy_price);
            if !viewer.can_attach() {
                let hints = viewer.suggestions();
                let message = if hints.is_empty() {
                    format!("unknown ticker '{}'", ticker)
                } else {
                    format!("unknown ticker '{}', did you mean {}?", ticker, hints.join(", "))
                };
                return Err(message.into());
            }
            viewer.attach().await?;
            print_viewer(app);
        }
        Command::Detach {
            diary_id,
            diary_asset_id,
        } => {
            select(app, diary_id).await?;
            app.viewer().detach(diary_asset_id).await?;
            print_viewer(app);
        }
        Command::Login { .. }
        | Command::Signup { .. }
        | Command::Logout
        | Command::Whoami => {}
    }
    Ok(())
}

async fn select(app: &mut JournalApp, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let log = app
        .feed()
        .find(id)
        .ok_or_else(|| format!("no trading log with id {}", id))?;
    app.select_log(log).await?;
    Ok(())
}

fn print_viewer(app: &JournalApp) {
    let Some(log) = app.viewer().selected() else {
        return;
    };
    println!("#{} {} {}", log.id, format_date(&log.date), log.title);
    println!("{}", log.contents);
    for position in app.viewer().positions() {
        println!(
            "  {:>6}  {:<24} x{:<8} bought {:>14}  now {:>14}  {:>10}",
            position.diary_asset_id,
            position.asset_name,
            position.amount,
            format_won(position.purchase_price),
            format_won(position.current_price),
            format_rate(position.profit_rate)
        );
    }
}

/// Prefer the user-facing alert text over the raw error.
fn explain(error: WorkflowError, alert: &Alert) -> Box<dyn std::error::Error> {
    if alert.is_visible() {
        alert.text.clone().into()
    } else {
        error.into()
    }
}
