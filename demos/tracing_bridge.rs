use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use log_enricher::config::{stdout_handler, HandlerConfig};
use log_enricher::context::Context;
use log_enricher::extractor::{context_value, Extractor};
use log_enricher::init::{init_tracing_with_config, LayerConfig};

async fn serve(request: u32) {
    info!(request, "handling request");
    sleep(Duration::from_millis(10)).await;
    if request % 2 == 0 {
        error!(reason = "upstream timeout", "request failed");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let handler = stdout_handler(&HandlerConfig::from_env()?)?;
    init_tracing_with_config(
        handler,
        LayerConfig {
            extractors: vec![Arc::new(context_value::<String>("request-id", "request_id")) as Arc<dyn Extractor>],
        },
    )?;

    info!("bridge ready");

    let mut tasks = Vec::new();
    for request in 0..4u32 {
        let cx = Context::background().with_value("request-id", format!("req-{request}"));
        tasks.push(tokio::spawn(cx.scope(serve(request))));
    }
    for task in tasks {
        task.await?;
    }

    Ok(())
}
