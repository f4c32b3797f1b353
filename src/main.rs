use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{Cli, ClientArgs, Commands, WaterArgs};
use office_plant::client::{
    status_at, GateOutcome, GateSignal, HttpPlantApi, Key, Notification, PlantApi, PlantViewModel,
};
use office_plant::format::{display_name, format_watered};
use office_plant::{
    build_router, AppState, MemoryPlantStore, MongoPlantStore, PlantService, PlantStore,
    ServerConfig, StoreKind,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.into_config();
            init_tracing(config.log_json, "info");
            serve(config).await
        }
        Commands::View(args) => {
            init_tracing(false, "warn");
            view(args).await
        }
        Commands::Water(args) => {
            init_tracing(false, "warn");
            water(args).await
        }
    }
}

fn init_tracing(log_json: bool, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = tokio::signal::ctrl_c() => {}
            }
            return;
        }
    }
    let _ = tokio::signal::ctrl_c().await;
}

async fn serve(config: ServerConfig) -> Result<()> {
    if let Err(e) = config.validate() {
        bail!("configuración inválida: {e}");
    }

    let store: Arc<dyn PlantStore> = match config.store {
        StoreKind::Mongo => Arc::new(
            MongoPlantStore::connect(&config.mongo_uri, &config.database)
                .await
                .context("Error al conectar con MongoDB")?,
        ),
        StoreKind::Memory => {
            warn!("using in-memory store; the plant record is lost on restart");
            Arc::new(MemoryPlantStore::new())
        }
    };
    let service = PlantService::new(store);
    let backend = service.backend_tag();
    let state = AppState::new(service, &config).map_err(anyhow::Error::msg)?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("no se pudo escuchar en {}", config.bind))?;
    info!(
        bind = %config.bind,
        store = backend,
        domain = %config.allowed_domain,
        "office-plant listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("el servidor terminó con error")?;
    info!("office-plant stopped");
    Ok(())
}

async fn view(args: ClientArgs) -> Result<()> {
    let api = HttpPlantApi::new(&args.url, &args.identity_header, &args.identity)?;
    let plant = api.fetch().await.context("Error al leer la planta")?;
    let status = status_at(plant.last_watered, Utc::now());

    println!(
        "Estado: {}\nÚltimo riego: {}\nActualizado por: {}",
        status.label(),
        format_watered(plant.last_watered),
        display_name(&plant.last_updated_by),
    );
    if plant.watering_history.is_empty() {
        println!("Riegos: Ninguno");
    } else {
        for (i, event) in plant.watering_history.iter().enumerate() {
            println!(
                "  Riego {}:\n    Fecha: {}\n    Por: {}\n    Nota: '{}'",
                i + 1,
                event.date.to_rfc3339(),
                display_name(&event.user),
                event.note
            );
        }
    }
    Ok(())
}

async fn water(args: WaterArgs) -> Result<()> {
    let api = HttpPlantApi::new(
        &args.client.url,
        &args.client.identity_header,
        &args.client.identity,
    )?;
    let mut vm = PlantViewModel::new(args.client.identity.clone());
    vm.refresh(&api).await;
    if let Some(err) = vm.error() {
        bail!("{err}");
    }

    let now = Utc::now();
    if vm.dispatch(&api, GateSignal::Open, now).await != GateOutcome::Opened {
        println!(
            "No hace falta regar: estado '{}'",
            vm.status(now).label()
        );
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let note = match args.note {
        Some(note) => note,
        None => prompt(&mut lines, "Nota (opcional): ").await?,
    };
    vm.dispatch(&api, GateSignal::EditNote(note), now).await;

    let signal = if args.yes {
        GateSignal::ClickConfirm
    } else {
        let answer = prompt(
            &mut lines,
            "¿Seguro que quieres regar la planta? No se puede deshacer. [s/N] ",
        )
        .await?;
        let key = match answer.trim().to_lowercase().as_str() {
            "s" | "si" | "sí" | "y" | "yes" => Key::Enter,
            _ => Key::Escape,
        };
        GateSignal::Key {
            key,
            in_text_input: false,
        }
    };
    if vm.dispatch(&api, signal, now).await == GateOutcome::Cancelled {
        println!("Riego cancelado");
        return Ok(());
    }

    let mut failed = false;
    for notification in vm.take_notifications() {
        match notification {
            Notification::Success(msg) => println!("{msg}"),
            Notification::Error(msg) => {
                eprintln!("{msg}");
                failed = true;
            }
        }
    }
    if failed {
        bail!("no se registró el riego");
    }
    Ok(())
}

async fn prompt<R>(lines: &mut tokio::io::Lines<R>, question: &str) -> Result<String>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?.unwrap_or_default())
}
