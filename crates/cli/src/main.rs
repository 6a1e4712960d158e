use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use server::config::{
    HandlerConfig, DEFAULT_GENERATION_BASE_URL, DEFAULT_GENERATION_MODEL, DEFAULT_GITHUB_API_URL,
    DEFAULT_PORT,
};
use server::{create_router, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "task-handler")]
#[command(about = "Generate, publish and report on IITM task submissions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP handler (default)
    Serve,
    /// Print the resolved configuration with credentials redacted
    CheckConfig,
}

#[derive(Args, Clone)]
struct Settings {
    /// Shared secret every submission must carry
    #[arg(long, env = "EXPECTED_SECRET", default_value = "", hide_env_values = true)]
    expected_secret: String,

    /// Token used for repository, contents and pages calls
    #[arg(long, env = "GITHUB_TOKEN", default_value = "", hide_env_values = true)]
    github_token: String,

    /// Key for the chat-completions endpoint
    #[arg(long, env = "AIPIPE_API_KEY", default_value = "", hide_env_values = true)]
    generation_api_key: String,

    #[arg(long, env = "GENERATION_BASE_URL", default_value = DEFAULT_GENERATION_BASE_URL)]
    generation_base_url: String,

    #[arg(long, env = "GENERATION_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    generation_model: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    github_api_url: String,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl Settings {
    fn into_config(self) -> HandlerConfig {
        HandlerConfig {
            expected_secret: self.expected_secret,
            github_token: self.github_token,
            generation_api_key: self.generation_api_key,
            generation_base_url: self.generation_base_url,
            generation_model: self.generation_model,
            github_api_url: self.github_api_url,
            port: self.port,
            ..HandlerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.settings.into_config();

    match cli.command {
        Some(Commands::CheckConfig) => check_config(&config),
        Some(Commands::Serve) | None => serve(config).await,
    }
}

fn check_config(config: &HandlerConfig) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&config.redacted())?;
    println!("{}", rendered);

    if let Err(e) = config.validate() {
        println!();
        println!("Configuration is incomplete: {}", e);
    }

    Ok(())
}

async fn serve(config: HandlerConfig) -> Result<()> {
    init_tracing();

    let redacted = config.redacted();
    tracing::info!(
        expected_secret = redacted.expected_secret,
        github_token = redacted.github_token,
        generation_api_key = redacted.generation_api_key,
        model = %redacted.generation_model,
        "Loaded configuration"
    );

    let state = AppState::from_config(&config).context("Failed to initialise task handler")?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;

    println!();
    println!("IITM Task Handler");
    println!("════════════════════════════════════════");
    println!();
    println!("  API Server:  http://localhost:{}", config.port);
    println!("  Swagger UI:  http://localhost:{}/swagger-ui", config.port);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "task_handler=info,server=info,orchestrator=info,github=info,generation=info,tower_http=info"
                .into()
        }))
        .init();
}
