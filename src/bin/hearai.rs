use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use hearai_wordbook::presenter::ADD_TO_WORDBOOK_MENU_ID;
use hearai_wordbook::{
    Backend, CaptureOutcome, Config, Error, FileTokenStore, Notification, Notifier, Popup,
    PopupView, ProfileCard, TokenStore, View, WordCapture, WordbookClient,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Backend base URL
    #[arg(long, env = "HEARAI_BACKEND_URL")]
    backend_url: Option<url::Url>,

    /// Token storage file (default: ~/.hearai/storage.json)
    #[arg(long, env = "HEARAI_STORAGE")]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in by scanning a pairing code with the HearAI app
    Login,
    /// Add the first word of TEXT to the wordbook
    Add { text: String },
    /// Show the logged-in profile
    Whoami,
    /// Forget the stored access token
    Logout,
}

struct TerminalView;

impl PopupView for TerminalView {
    fn show_login(&self) {
        println!("Not logged in.");
    }

    fn show_main(&self, card: &ProfileCard) {
        println!("Logged in as {}", card.nickname);
    }

    fn show_pairing_code(&self, uri: &str) {
        println!("Scan with the HearAI app to log in:\n  {uri}");
    }

    fn mark_pairing_code_expired(&self) {
        println!("Pairing code expired. Run `hearai login` again.");
    }
}

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if notification.message.is_empty() {
            println!("{}", notification.title);
        } else {
            println!("{}: {}", notification.title, notification.message);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, Error> {
    let mut config = Config::from_env()?;
    if let Some(url) = args.backend_url {
        config = config.with_base_url(url);
    }
    config.validate()?;

    let store = Arc::new(match args.storage {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::default_location()?,
    });
    let backend = Arc::new(WordbookClient::new(config.clone())?);

    match args.command {
        Command::Login => login(backend, store, config).await,
        Command::Add { text } => {
            let capture = WordCapture::new(backend, store, Arc::new(TerminalNotifier));
            let outcome = capture
                .on_menu_click(ADD_TO_WORDBOOK_MENU_ID, Some(&text))
                .await;
            Ok(match outcome {
                CaptureOutcome::Added(_) | CaptureOutcome::AlreadyExists(_) => ExitCode::SUCCESS,
                CaptureOutcome::InvalidWord => {
                    eprintln!("no valid word in {text:?}");
                    ExitCode::FAILURE
                }
                _ => ExitCode::FAILURE,
            })
        }
        Command::Whoami => {
            let token = store.load().await?.ok_or(Error::AuthMissing)?;
            let profile = backend.fetch_profile(&token).await?;
            println!("{}", profile.nickname);
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            store.clear().await?;
            println!("Logged out.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn login(
    backend: Arc<WordbookClient>,
    store: Arc<FileTokenStore>,
    config: Config,
) -> Result<ExitCode, Error> {
    let mut popup = Popup::new(backend, store, Arc::new(TerminalView), config)?;

    if let View::Main(_) = popup.open().await? {
        return Ok(ExitCode::SUCCESS);
    }

    let finished = tokio::select! {
        view = popup.complete_login() => Some(view),
        _ = tokio::signal::ctrl_c() => None,
    };
    let Some(view) = finished else {
        popup.close();
        return Ok(ExitCode::FAILURE);
    };
    let view = view?;

    Ok(match view {
        View::Main(_) => ExitCode::SUCCESS,
        View::Login => ExitCode::FAILURE,
    })
}
