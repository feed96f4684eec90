#[cfg(feature = "lambda")]
use deal_check::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use deal_check::core::{extract::DuckDuckGoExtractor, fetch::HttpFetcher};
#[cfg(feature = "lambda")]
use deal_check::{DealChecker, EnvConfig, Place, VerificationResult};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::Deserialize;
#[cfg(feature = "lambda")]
use std::sync::Arc;

/// Query parameters of the check endpoint; both optional.
#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub name: Option<String>,
    pub city: Option<String>,
}

#[cfg(feature = "lambda")]
async fn function_handler(
    checker: &DealChecker<HttpFetcher, DuckDuckGoExtractor>,
    event: LambdaEvent<Request>,
) -> Result<VerificationResult, Error> {
    let place = Place::new(
        event.payload.name.unwrap_or_default(),
        event.payload.city.unwrap_or_default(),
    );
    tracing::info!("Checking deals for {:?}", place.name);

    // 永不失敗：各平台錯誤已轉為 status = "unknown"
    Ok(checker.verify_all(&place).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 創建Lambda配置
    let config = EnvConfig::from_env()?;
    config.validate()?;

    let checker = Arc::new(DealChecker::from_config(&config)?);

    run(service_fn(move |event: LambdaEvent<Request>| {
        let checker = Arc::clone(&checker);
        async move { function_handler(&checker, event).await }
    }))
    .await
}
