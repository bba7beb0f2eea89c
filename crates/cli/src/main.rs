use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raahi_agents::{ChatDispatcher, HttpConversationBackend};
use raahi_core::catalog::{self, GuideFilter};
use raahi_core::{conditions, dashboard, IntentClassifier, LanguagePackRegistry};
use raahi_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "raahi")]
#[command(about = "ProRaahi tourism assistant CLI")]
struct Cli {
    #[arg(
        long,
        env = "RAAHI_CHAT_BACKEND_URL",
        default_value = "http://localhost:5000/chat"
    )]
    backend_url: String,

    #[arg(long, env = "RAAHI_CHAT_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,

    #[arg(long, env = "RAAHI_LANGUAGE_PACKS")]
    language_packs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat; `exit` or `quit` leaves.
    Chat {
        #[arg(long, default_value = "en")]
        language: String,
    },
    Ask {
        message: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        session: Option<String>,
    },
    Classify {
        text: String,
    },
    Weather {
        #[arg(long)]
        city: Option<String>,
    },
    Guides {
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
    },
    /// Maintenance and restoration summaries.
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("raahi_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Chat { ref language } => {
            let dispatcher = build_dispatcher(&cli)?;
            run_chat(dispatcher, language).await?;
        }
        Command::Ask {
            ref message,
            ref language,
            ref session,
        } => {
            let dispatcher = build_dispatcher(&cli)?;
            let envelope = dispatcher
                .handle(message, language.as_deref(), session.as_deref())
                .await;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Command::Classify { ref text } => {
            let intent = IntentClassifier::default().classify(text);
            println!("{}", intent.as_str());
        }
        Command::Weather { ref city } => {
            let report = conditions::weather_for(city.as_deref());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Guides {
            ref location,
            ref specialty,
        } => {
            let guides = catalog::search_guides(&GuideFilter {
                location: location.clone(),
                specialty: specialty.clone(),
                price_range: None,
            });
            println!("{}", serde_json::to_string_pretty(&guides)?);
        }
        Command::Dashboard => {
            let summary = serde_json::json!({
                "maintenance": dashboard::maintenance_report().summary,
                "restoration": dashboard::restoration_report().summary,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

async fn run_chat(dispatcher: ChatDispatcher<HttpConversationBackend>, language: &str) -> Result<()> {
    println!("ProRaahi chat mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let envelope = dispatcher.handle(message, Some(language), None).await;
        println!("\n{}\n[{}]\n", envelope.text, envelope.processing_mode.as_str());
    }

    Ok(())
}

fn build_dispatcher(cli: &Cli) -> Result<ChatDispatcher<HttpConversationBackend>> {
    let registry = load_registry(cli.language_packs.as_deref())?;
    let backend = HttpConversationBackend::new(cli.backend_url.clone())?;

    Ok(ChatDispatcher::new(
        Arc::new(backend),
        Arc::new(registry),
        Arc::new(IntentClassifier::default()),
        AppMetrics::shared(),
    )
    .with_timeout(Duration::from_millis(cli.timeout_ms)))
}

fn load_registry(path: Option<&Path>) -> Result<LanguagePackRegistry> {
    match path {
        Some(path) => LanguagePackRegistry::with_overrides(path)
            .with_context(|| format!("failed loading language packs from {}", path.display())),
        None => Ok(LanguagePackRegistry::builtin()),
    }
}
