use anyhow::{Context, Result};
use scriptlink::callback::{CallbackDispatcher, ScriptQueue};
use scriptlink::config::{load_config, ScriptLinkConfig};
use scriptlink::console::run_command;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("SCRIPTLINK_CONFIG") {
        Ok(path) => {
            let mut config = load_config(&path)?;
            config.apply_env();
            config
        }
        Err(_) => ScriptLinkConfig::from_env(),
    };

    // Initialize tracing subscriber (stdout is reserved for invocations)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .init();

    info!(
        callbacks = config.callbacks.len(),
        queue_capacity = config.queue.capacity,
        "scriptlink console starting..."
    );

    let (queue, worker) = ScriptQueue::spawn(config.queue.capacity, |invocation: &str| -> Result<()> {
        println!("{}", invocation);
        Ok(())
    });
    let dispatcher = CallbackDispatcher::new(queue);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match run_command(&dispatcher, &config.callbacks, &line) {
            Ok(submitted) => debug!(command = %line, submitted = submitted, "Command dispatched"),
            Err(e) => warn!(error = %e, command = %line, "Command failed"),
        }
    }

    let executed = worker.shutdown().await?;
    info!(executed = executed, "scriptlink console finished");

    Ok(())
}
