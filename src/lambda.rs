use lambda_forwarder::utils::logger;
use lambda_forwarder::{Forwarder, ForwarderConfig, Registry};
use lambda_http::{run, service_fn, Error, Request};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = match ForwarderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // 設定檔無法讀取時，仍以環境變數的日誌等級輸出錯誤
            let level = ForwarderConfig::early_log_level(|key| env::var(key).ok());
            logger::init_lambda_logger(level.as_deref());
            tracing::error!("Failed to load forwarder configuration: {}", e);
            return Err(e.into());
        }
    };

    // 初始化日誌
    logger::init_lambda_logger(config.log_level.as_deref());
    tracing::info!(application = %config.application, "Starting request forwarder");

    // 名稱無效時只記錄錯誤，請求仍會收到 500 診斷回應
    let forwarder = Arc::new(Forwarder::from_config(Registry::builtin(), &config));

    // 冷啟動時即解析應用程式；失敗時仍持續以 500 回應
    if forwarder.ensure_loaded().await.is_err() {
        tracing::warn!("Serving load failure diagnostics until the next cold start");
    }

    run(service_fn(move |request: Request| {
        let forwarder = Arc::clone(&forwarder);
        async move { forwarder.handle(request).await }
    }))
    .await
}
