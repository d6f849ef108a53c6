mod session;

use anyhow::Result;
use clap::Parser;
use console::style;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use wayfarer::agent::Agent;
use wayfarer::providers::factory::ProviderType;
use wayfarer::providers::ollama::OLLAMA_HOST;
use wayfarer::reasoner::Reasoner;
use wayfarer::secrets::{self, Secrets};
use wayfarer::settings::{Settings, DEFAULT_MAX_ROUNDS};
use wayfarer::tools::builtin_registry;

use crate::session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Reasoning backend (openai or ollama)
    #[arg(short, long, default_value = "open-ai")]
    #[arg(value_enum)]
    provider: ProviderVariant,

    /// Model to use (defaults to the backend's standard model)
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the local Ollama server
    #[arg(long, default_value = OLLAMA_HOST)]
    ollama_host: String,

    /// Maximum decision rounds before a query is abandoned
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: usize,

    /// Run a single query and exit instead of starting a session
    #[arg(short, long)]
    query: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ProviderVariant {
    OpenAi,
    Ollama,
}

impl From<ProviderVariant> for ProviderType {
    fn from(variant: ProviderVariant) -> Self {
        match variant {
            ProviderVariant::OpenAi => ProviderType::OpenAi,
            ProviderVariant::Ollama => ProviderType::Ollama,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    secrets::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wayfarer=warn")),
        )
        .init();

    let cli = Cli::parse();
    let secrets = Secrets::from_env();
    let settings = Settings {
        provider: cli.provider.into(),
        model: cli.model.clone(),
        ollama_host: cli.ollama_host.clone(),
        max_rounds: cli.max_rounds,
    };

    print_status(&settings, &secrets);

    let mut reasoner = Reasoner::new();
    if let Err(e) = reasoner.initialize(settings.provider_config(&secrets)).await {
        eprintln!("{} {}", style("error:").red().bold(), e);
        match settings.provider {
            ProviderType::OpenAi => eprintln!(
                "{}",
                style("Set OPENAI_API_KEY (environment or .env) and try again.").dim()
            ),
            ProviderType::Ollama => eprintln!(
                "{}",
                style(format!(
                    "Make sure Ollama is running at {} (`ollama serve`).",
                    settings.ollama_host
                ))
                .dim()
            ),
        }
        std::process::exit(1);
    }

    let registry = builtin_registry(&secrets)?;
    let agent = Agent::new(reasoner, registry).with_max_rounds(settings.max_rounds);
    let mut session = Session::new(agent);

    match cli.query {
        Some(query) => session.run_once(&query).await,
        None => session.start().await,
    }
}

fn print_status(settings: &Settings, secrets: &Secrets) {
    let backends: Vec<String> = ProviderType::iter().map(|p| p.to_string()).collect();
    println!(
        "{} {}",
        style("Wayfarer").bold(),
        style("— AI travel agent & expense planner").dim()
    );
    println!(
        "backend: {} (available: {})\n",
        style(settings.provider).cyan(),
        backends.join(", ")
    );

    if settings.provider == ProviderType::OpenAi {
        if secrets.openai_api_key.is_some() {
            println!("  {} OpenAI API key", style("✓").green());
        } else {
            println!(
                "  {} OpenAI API key missing (required for the openai backend)",
                style("✗").red()
            );
        }
    }

    if secrets.serper_api_key.is_some() {
        println!("  {} Serper API key", style("✓").green());
    } else {
        println!(
            "  {} Serper API key missing — DuckDuckGo will handle web search",
            style("•").yellow()
        );
    }

    if secrets.openweathermap_api_key.is_some() {
        println!("  {} Weather API key", style("✓").green());
    } else {
        println!(
            "  {} Weather API key missing — weather lookups will report unavailability",
            style("•").yellow()
        );
    }

    if secrets.exchangerate_api_key.is_some() {
        println!("  {} ExchangeRate API key", style("✓").green());
    } else {
        println!(
            "  {} ExchangeRate API key missing — using the free tier",
            style("•").yellow()
        );
    }

    println!();
}
