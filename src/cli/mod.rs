use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use crate::config::settings::Theme;
use crate::llm::remote::DEFAULT_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the AutoSphere backend serving /api/health, /api/chat and /api/clear.
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Skip the startup health check; replies use the local responder until a send succeeds.
    #[arg(long, env = "SKIP_HEALTH_CHECK", default_value = "false")]
    pub skip_health_check: bool,

    // --- Local Responder Args ---
    /// Lower bound of the simulated typing delay for offline replies, in milliseconds.
    #[arg(long, env = "FALLBACK_MIN_DELAY_MS", default_value = "1000")]
    pub fallback_min_delay_ms: u64,

    /// Upper bound of the simulated typing delay for offline replies, in milliseconds.
    #[arg(long, env = "FALLBACK_MAX_DELAY_MS", default_value = "3000")]
    pub fallback_max_delay_ms: u64,

    // --- Local State Args ---
    /// Path of the JSON file holding theme and credential preferences.
    #[arg(long, env = "SETTINGS_PATH", default_value = "autosphere-settings.json")]
    pub settings_path: PathBuf,

    /// Directory chat exports are written to.
    #[arg(long, env = "EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Theme override for this run (not persisted).
    #[arg(long, env = "THEME", value_enum)]
    pub theme: Option<Theme>,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn fallback_delay(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.fallback_min_delay_ms),
            Duration::from_millis(self.fallback_max_delay_ms),
        )
    }
}
