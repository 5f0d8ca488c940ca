//! Generate synthetic patient notes so the main workflow has data to chew.

use tracing_subscriber::EnvFilter;

use condensa::ollama::{self, OllamaClient};
use condensa::{config, simulate};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let client = OllamaClient::new(&config::ollama_base_url(), config::OLLAMA_TIMEOUT_SECS);
    let model = match ollama::find_best_model(&client) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!(error = %e, "no generation model available, aborting");
            std::process::exit(1);
        }
    };
    tracing::info!(model = %model, "generation model selected");

    let data_dir = config::data_dir();
    if let Err(e) = simulate::create_simulated_data(&client, &model, &data_dir) {
        tracing::error!(error = %e, "data simulation failed");
        std::process::exit(1);
    }
}
