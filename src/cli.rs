//! Interface de linha de comando do bulkcol baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (upload, report)
//! e flags globais (--log, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bulkcol — Envio em massa de coleções para uma loja Shopify.
#[derive(Debug, Parser)]
#[command(name = "bulkcol", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do log durável (sobrepõe bulkcol.toml).
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Envia as coleções do CSV para a loja.
    Upload {
        /// Caminho do arquivo CSV de entrada.
        csv: PathBuf,
    },

    /// Divide o log de execução em relatórios de sucesso e erro.
    Report,
}
