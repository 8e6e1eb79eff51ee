//! Configuração do bulkcol carregada a partir de `bulkcol.toml`.
//!
//! A struct [`BulkcolConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis. As variáveis
//! de ambiente `SHOPIFY_STORE`, `SHOPIFY_ADMIN_TOKEN` e
//! `SHOPIFY_API_VERSION` têm precedência sobre o arquivo.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::shopify::RetryPolicy;

/// Configuração de nível superior carregada de `bulkcol.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkcolConfig {
    /// Domínio da loja (ex.: "minha-loja.myshopify.com").
    #[serde(default)]
    pub store: String,

    /// Token de acesso da Admin API.
    #[serde(default)]
    pub token: String,

    /// Versão da Admin API usada na URL base.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Caminho do log durável, aberto em modo append.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Relatório CSV de sucessos produzido pelo subcomando `report`.
    #[serde(default = "default_success_report")]
    pub success_report: PathBuf,

    /// Relatório CSV de erros produzido pelo subcomando `report`.
    #[serde(default = "default_error_report")]
    pub error_report: PathBuf,

    /// Total de tentativas por requisição, incluindo a primeira.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Atraso base em milissegundos para o backoff exponencial.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Teto em milissegundos para o atraso dobrado.
    #[serde(default = "default_delay_cap_ms")]
    pub delay_cap_ms: u64,

    /// Pausa fixa entre linhas, em milissegundos.
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
}

// Versão padrão da Admin API.
fn default_api_version() -> String {
    "2024-10".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("bulkcol.log")
}

fn default_success_report() -> PathBuf {
    PathBuf::from("upload_report_successes.csv")
}

fn default_error_report() -> PathBuf {
    PathBuf::from("upload_report_errors.csv")
}

// Orçamento padrão de tentativas: 5.
fn default_max_attempts() -> u32 {
    5
}

// Atraso base padrão: 1000ms.
fn default_base_delay_ms() -> u64 {
    1000
}

// Teto padrão do backoff: 16000ms.
fn default_delay_cap_ms() -> u64 {
    16000
}

// Pausa padrão entre linhas: 600ms (~2 req/s).
fn default_pace_ms() -> u64 {
    600
}

impl Default for BulkcolConfig {
    fn default() -> Self {
        Self {
            store: String::new(),
            token: String::new(),
            api_version: default_api_version(),
            log_path: default_log_path(),
            success_report: default_success_report(),
            error_report: default_error_report(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            delay_cap_ms: default_delay_cap_ms(),
            pace_ms: default_pace_ms(),
        }
    }
}

impl BulkcolConfig {
    /// Carrega a configuração de `bulkcol.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let path = Path::new("bulkcol.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<BulkcolConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variáveis de ambiente têm precedência sobre o arquivo.
        if let Ok(store) = std::env::var("SHOPIFY_STORE")
            && !store.is_empty()
        {
            config.store = store;
        }
        if let Ok(token) = std::env::var("SHOPIFY_ADMIN_TOKEN")
            && !token.is_empty()
        {
            config.token = token;
        }
        if let Ok(version) = std::env::var("SHOPIFY_API_VERSION")
            && !version.is_empty()
        {
            config.api_version = version;
        }

        Ok(config)
    }

    /// Pré-condições de execução: credenciais presentes e domínio válido.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.is_empty() {
            return Err(ConfigError::MissingStore);
        }
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if !self.store.contains(".myshopify.com") {
            return Err(ConfigError::BadStoreFormat);
        }
        Ok(())
    }

    /// URL base versionada da Admin API.
    pub fn base_url(&self) -> String {
        format!("https://{}/admin/api/{}", self.store, self.api_version)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay_ms: self.base_delay_ms,
            delay_cap_ms: self.delay_cap_ms,
        }
    }
}
