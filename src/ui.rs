//! Interface de terminal do bulkcol — spinner e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`RunProgress`] acompanha visualmente o envio
//! das coleções no terminal.

use std::path::Path;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::BulkcolConfig;
use crate::orchestrator::RunSummary;
use crate::report::ReportCounts;

/// Indicador visual de progresso para um envio em andamento.
pub struct RunProgress {
    // Spinner do indicatif; clones compartilham o mesmo desenho.
    pb: ProgressBar,
}

impl RunProgress {
    /// Inicia o spinner e retorna a instância de progresso.
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message("Starting upload...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    /// Um clone da barra para rotear linhas de log por cima do spinner.
    pub fn bar(&self) -> ProgressBar {
        self.pb.clone()
    }

    /// Atualiza a mensagem do spinner com a linha em processamento.
    pub fn row(&self, position: usize, total: usize, title: &str) {
        self.pb
            .set_message(format!("Row {position}/{total}: {title}"));
    }

    /// Encerra e limpa o spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Imprime o cabeçalho do envio com os parâmetros efetivos.
pub fn print_banner(cfg: &BulkcolConfig, csv_path: &Path, total: usize, verbose: bool) {
    let bold = Style::new().bold();
    println!("{}", bold.apply_to("Shopify bulk collections"));
    println!("  Store:       {}", cfg.store);
    println!("  CSV:         {}", csv_path.display());
    println!("  Log:         {}", cfg.log_path.display());
    println!("  API version: {}", cfg.api_version);
    if verbose {
        println!(
            "  Retry:       {} attempts, base {}ms, cap {}ms, pace {}ms",
            cfg.max_attempts, cfg.base_delay_ms, cfg.delay_cap_ms, cfg.pace_ms
        );
    }
    println!("---");
    println!("Found {total} collection(s) to process");
    println!("---");
}

/// Imprime o resumo final do envio, sempre que a execução passou da
/// validação inicial — mesmo com falhas por linha.
pub fn print_summary(summary: &RunSummary, log_path: &Path) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let yellow = Style::new().yellow();

    println!("---");
    println!(
        "{} Completed: {} processed, {} successful, {} errors",
        green.apply_to("✓"),
        summary.processed,
        green.apply_to(summary.succeeded),
        red.apply_to(summary.failed)
    );
    if summary.skipped > 0 {
        println!(
            "{} Skipped {} row(s) without a title",
            yellow.apply_to("↷"),
            summary.skipped
        );
    }
    println!("Full log: {}", log_path.display());
}

/// Imprime o resumo da reconciliação do log em relatórios.
pub fn print_report_summary(counts: &ReportCounts, cfg: &BulkcolConfig) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();

    println!(
        "{} Successes: {} -> {}",
        green.apply_to("✓"),
        counts.successes,
        cfg.success_report.display()
    );
    println!(
        "{} Errors: {} -> {}",
        red.apply_to("✗"),
        counts.errors,
        cfg.error_report.display()
    );
}

/// Diagnóstico fatal em vermelho no stderr.
pub fn print_fatal(message: &str) {
    let red = Style::new().red().bold();
    eprintln!("{} {message}", red.apply_to("✗"));
}
