use std::sync::Arc;

use clap::Parser;
use tracing::info;

use http_route::chain::RoutingChain;
use http_route::cli::Cli;
use http_route::error_page::ErrorPage;
use http_route::logging::init_logging;
use http_route::server::{RequestHandler, ServerListener};
use http_route::settings::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // 설정 오류는 리스너를 열기 전에 프로세스를 종료시킨다
    let mut settings = Settings::load().await?;
    cli.apply(&mut settings);
    settings.validate()?;

    let _log_guard = init_logging(&settings.logging)?;

    let mappings = cli.mapping_sources(&settings).load().await?;
    let chain = RoutingChain::compile(
        mappings,
        Box::new(ErrorPage::not_found()),
        settings.server.match_mode,
    );

    let listener = ServerListener::bind(settings.server.http_port).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    let handler = Arc::new(RequestHandler::new(Arc::new(chain)));
    listener.run(handler).await?;

    Ok(())
}
