use catalog::api;
use catalog::logger::*;
use catalog::server::*;
use catalog::settings::*;
use std::fs;
use std::sync::Arc;
use tokio::signal;
use warp::Filter;

async fn shutdown_signal() {
    signal::ctrl_c().await.expect("Could not register SIGINT");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    if let Some(tls) = &project_settings.http.tls {
        if !fs::metadata(&tls.cert_path)?.is_file() {
            return Err(anyhow::anyhow!(
                "TLS cert is not a regular file: {:?}",
                tls.cert_path
            ));
        }
        if !fs::metadata(&tls.key_path)?.is_file() {
            return Err(anyhow::anyhow!(
                "TLS key is not a regular file: {:?}",
                tls.key_path
            ));
        }
    }

    let server = Arc::new(Server::try_new(&project_settings).await?);

    let app = api::routes(server.clone()).with(warp::trace::request());

    match &project_settings.http.tls {
        Some(tls) => {
            let (bound, serving) = warp::serve(app)
                .tls()
                .cert_path(&tls.cert_path)
                .key_path(&tls.key_path)
                .bind_with_graceful_shutdown(address, shutdown_signal());
            info!(%bound, "listening (tls)");
            serving.await;
        }
        None => {
            let (bound, serving) =
                warp::serve(app).bind_with_graceful_shutdown(address, shutdown_signal());
            info!(%bound, "listening");
            serving.await;
        }
    }

    let shutdown_timeout = std::time::Duration::from_secs(30);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => info!("server shutdown successfully"),
        Err(_) => error!("server shutdown timed out"),
    }

    Ok(())
}
