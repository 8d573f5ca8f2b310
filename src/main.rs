mod application;
mod domain;
mod infrastructure;
mod presentation;

use infrastructure::container::AppContainer;
use presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let container = AppContainer::new().await?;

    let port = std::env::var("PORT").ok().and_then(|p| p.parse().ok());

    let server = HttpServer::new(
        container.document_handler.clone(),
        container.job_handler.clone(),
        container.chat_handler.clone(),
        container.background_processor.clone(),
        port,
    );

    server.run().await
}
