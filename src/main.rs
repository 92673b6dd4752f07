use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use std::net::SocketAddr;

mod models;
mod services;
mod state;
mod api;
mod cli;

use state::new_state;
use cli::{CommandArgs, Commands, EcosystemArgs, ServeArgs, StreamArgs};
use models::Ecosystem;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandArgs::parse();

    match args.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Stream(args) => stream(args).await,
        Commands::Ecosystem(args) => ecosystem(args),
    }
}

async fn serve(args: ServeArgs) -> std::io::Result<()> {
    print_banner(&args);

    let (server, addrs) = bind_server(&args)?;
    let port = addrs
        .first()
        .map(SocketAddr::port)
        .unwrap_or_else(|| args.resolved_port());
    log::info!("Server running on port {}", port);

    server.await
}

/// 绑定端口并返回尚未运行的服务及实际监听地址
fn bind_server(args: &ServeArgs) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let state = new_state(args.root_response());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
        .bind(args.bind_address())?;

    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

async fn stream(args: StreamArgs) -> std::io::Result<()> {
    log::info!("🎬 Stream bot pushing to RTMP endpoint");

    services::run_forever(&args).await.map_err(|e| {
        log::error!("❌ Stream bot stopped: {:#}", e);
        std::io::Error::other(e.to_string())
    })
}

fn ecosystem(args: EcosystemArgs) -> std::io::Result<()> {
    let rendered = match &args.file {
        Some(path) => Ecosystem::from_file(path),
        None => Ok(Ecosystem::preset(args.preset)),
    }
    .and_then(|ecosystem| ecosystem.to_pm2_json())
    .map_err(|e| {
        log::error!("❌ Invalid ecosystem: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
    })?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered))?;
            log::info!("✅ Ecosystem written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn print_banner(args: &ServeArgs) {
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║      Stream Manager v{:<37}║", env!("CARGO_PKG_VERSION"));
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🚀 Server starting on http://{}", args.bind_address());
    println!();
    println!("📋 Available endpoints:");
    println!("  GET    /                       - {:?} root", args.variant);
    println!("  GET    /health                 - Health check");
    println!("═══════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[actix_web::test]
    #[serial]
    async fn test_health_on_bound_port() {
        std::env::set_var("PORT", "0");
        let parsed =
            CommandArgs::try_parse_from(["stream-manager", "serve", "--address", "127.0.0.1"]);
        std::env::remove_var("PORT");

        let Commands::Serve(args) = parsed.unwrap().command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, Some(0));

        let (server, addrs) = bind_server(&args).unwrap();
        let port = addrs[0].port();
        assert_ne!(port, 0);

        let handle = server.handle();
        actix_web::rt::spawn(server);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        for _ in 0..2 {
            let resp = client
                .get(format!("http://127.0.0.1:{}/health", port))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status().as_u16(), 200);
            assert!(resp.bytes().await.unwrap().is_empty());
        }

        let resp = client
            .get(format!("http://127.0.0.1:{}/nonexistent", port))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404);

        handle.stop(true).await;
    }
}
