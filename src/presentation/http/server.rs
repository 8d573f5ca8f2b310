use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::messaging::BackgroundProcessor;
use crate::presentation::http::{
    handlers::{ChatHandler, DocumentHandler, JobHandler},
    routes::{chat_routes, document_routes, health_routes, job_routes},
};

pub struct HttpServer {
    document_handler: Arc<DocumentHandler>,
    job_handler: Arc<JobHandler>,
    chat_handler: Arc<ChatHandler>,
    background_processor: Arc<BackgroundProcessor>,
    port: u16,
}

impl HttpServer {
    pub fn new(
        document_handler: Arc<DocumentHandler>,
        job_handler: Arc<JobHandler>,
        chat_handler: Arc<ChatHandler>,
        background_processor: Arc<BackgroundProcessor>,
        port: Option<u16>,
    ) -> Self {
        Self {
            document_handler,
            job_handler,
            chat_handler,
            background_processor,
            port: port.unwrap_or(8000),
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let background_processor = self.background_processor.clone();
        tokio::spawn(async move {
            background_processor.start().await;
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = Router::new()
            .merge(health_routes())
            .merge(document_routes(self.document_handler))
            .merge(job_routes(self.job_handler))
            .merge(chat_routes(self.chat_handler))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(50 * 1024 * 1024)) // 50MB cap
            .layer(
                TraceLayer::new_for_http()
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "{} in {}ms",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!("request failed after {}ms: {:?}", latency.as_millis(), error);
                        },
                    ),
            );

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("Listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
