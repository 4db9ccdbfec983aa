use crate::config::HttpServerConfig;
use axum::Router;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct HttpServer {
    router: Arc<Router>,
    config: HttpServerConfig,
}

impl HttpServer {
    pub fn new(router: Router, config: HttpServerConfig) -> Self {
        Self {
            router: Arc::new(router),
            config,
        }
    }

    pub async fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind(self.config.addr()).await
    }

    pub async fn start(&self) -> io::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until the process exits.
    pub async fn serve(&self, listener: TcpListener) -> io::Result<()> {
        log::info!("server running on http://{}", listener.local_addr()?);
        axum::serve(listener, (*self.router).clone()).await
    }
}
