mod api;
mod config;
mod error;
mod notify;
mod scanner;
mod seen;
mod types;

use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // init logging
    env_logger::init();

    info!("starting CoWIN slot scanner...");

    // load environment variables
    dotenv::dotenv().ok();

    // required settings missing -> non-zero exit before any network call
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR> {}. Exiting...", err);
            std::process::exit(1);
        }
    };

    let client = api::CowinClient::new()?;
    let notifier: Arc<dyn notify::Notifier> =
        Arc::new(notify::TelegramNotifier::new(&config.bot_token)?);

    let mut seen = seen::SeenSlots::load(&config.seen_path).await?;

    let scanner = scanner::SlotScanner::new(client, notifier, &config);

    let outcome = tokio::select! {
        result = scanner.run(&mut seen) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
            Ok(())
        }
    };

    // persist the seen-slots map on the way out, fatal or not
    if let Err(err) = seen.save().await {
        error!("could not save seen slots: {}", err);
    }

    if let Err(err) = &outcome {
        error!("scanner stopped: {}", err);
    }
    outcome?;

    Ok(())
}
