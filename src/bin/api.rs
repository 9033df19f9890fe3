use std::sync::Arc;

use anyhow::Context;
use slack_driver::api::WebhookService;
use slack_driver::core::config::AppConfig;
use slack_driver::core::events::LogSink;
use slack_driver::slack::SlackDriver;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    slack_driver::setup_logging();

    let config = AppConfig::from_env().context("loading configuration")?;

    let driver = SlackDriver::new(config.clone()).context("building Slack client")?;
    if driver.is_ready() {
        info!("{}", driver.status());
    } else {
        warn!("{}", driver.status());
    }

    let service = Arc::new(WebhookService::from_config(&config, Arc::new(LogSink)));
    lambda_runtime::run(lambda_runtime::service_fn(move |event| {
        let service = Arc::clone(&service);
        async move { service.handle_lambda(event).await }
    }))
    .await
}
