pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod render;

use agent::ChatAgent;
use app::AppContext;
use cli::Args;
use config::settings::SettingsStore;
use llm::fallback::LocalResponder;
use llm::remote::RemoteChatClient;
use log::info;
use render::TerminalRenderer;
use std::error::Error;
use std::sync::{ Arc, Mutex };
use tokio::io::BufReader;
use tokio::sync::mpsc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("API Base URL: {}", args.api_base_url);
    info!("Settings Path: {}", args.settings_path.display());
    info!("Export Dir: {}", args.export_dir.display());
    info!(
        "Fallback Delay: {}-{} ms",
        args.fallback_min_delay_ms,
        args.fallback_max_delay_ms
    );
    info!("-------------------------");

    let settings = SettingsStore::open(&args.settings_path);
    let theme = args.theme.unwrap_or(settings.settings().theme);

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let renderer = Arc::new(Mutex::new(TerminalRenderer::new(std::io::stdout(), theme)));
    let render_task = render::spawn(renderer.clone(), events_rx);

    let backend = Arc::new(RemoteChatClient::new(&args.api_base_url)?);
    let (min_delay, max_delay) = args.fallback_delay();
    let agent = Arc::new(
        ChatAgent::new(backend, LocalResponder::new(min_delay, max_delay)).with_events(events_tx)
    );

    if let Ok(mut r) = renderer.lock() {
        r.welcome()?;
    }
    if args.skip_health_check {
        info!("Health check skipped");
    } else {
        agent.check_health().await;
    }

    let mut app = AppContext::new(agent, settings, renderer, args.export_dir.clone(), render_task);
    let result = app.run(BufReader::new(tokio::io::stdin())).await;
    app.shutdown().await;
    result
}
