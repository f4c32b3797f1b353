use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

use office_plant::config::{
    ServerConfig, StoreKind, DEFAULT_ALLOWED_DOMAIN, DEFAULT_DATABASE, DEFAULT_IDENTITY_HEADER,
    DEFAULT_MONGO_URI,
};

#[derive(Parser)]
#[command(name = "office-plant")]
#[command(about = "Registro compartido del riego de la planta de la oficina")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Levantar el servicio HTTP
    Serve(ServeArgs),
    /// Ver el estado de la planta y el historial de riegos
    View(ClientArgs),
    /// Regar la planta (pide confirmación)
    Water(WaterArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Dirección en la que escucha el servidor
    #[arg(long, env = "PLANT_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
    /// Almacén del registro
    #[arg(long, value_enum, env = "PLANT_STORE", default_value = "mongo")]
    pub store: StoreKind,
    #[arg(long, env = "MONGO_URI", default_value = DEFAULT_MONGO_URI, hide_env_values = true)]
    pub mongo_uri: String,
    #[arg(long, env = "PLANT_DB", default_value = DEFAULT_DATABASE)]
    pub database: String,
    /// Único dominio de correo con acceso
    #[arg(long, env = "ALLOWED_DOMAIN", default_value = DEFAULT_ALLOWED_DOMAIN)]
    pub allowed_domain: String,
    /// Header con el correo verificado por el proxy de identidad
    #[arg(long, env = "IDENTITY_HEADER", default_value = DEFAULT_IDENTITY_HEADER)]
    pub identity_header: String,
    /// Logs en JSON
    #[arg(long, env = "PLANT_LOG_JSON")]
    pub log_json: bool,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            store: self.store,
            mongo_uri: self.mongo_uri,
            database: self.database,
            allowed_domain: self.allowed_domain,
            identity_header: self.identity_header,
            log_json: self.log_json,
        }
    }
}

#[derive(Args, Debug)]
pub struct ClientArgs {
    /// URL base del servicio
    #[arg(long, env = "PLANT_URL", default_value = "http://127.0.0.1:3000")]
    pub url: String,
    /// Correo con el que se firma la acción
    #[arg(long = "as", env = "PLANT_USER")]
    pub identity: String,
    #[arg(long, env = "IDENTITY_HEADER", default_value = DEFAULT_IDENTITY_HEADER)]
    pub identity_header: String,
}

#[derive(Args, Debug)]
pub struct WaterArgs {
    #[command(flatten)]
    pub client: ClientArgs,
    /// Nota opcional para el historial
    #[arg(long)]
    pub note: Option<String>,
    /// Confirmar sin preguntar
    #[arg(short = 'y', long)]
    pub yes: bool,
}
