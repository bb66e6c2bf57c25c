//! # Perfdata Check
//!
//! Plugin Nagios/Icinga que coleta métricas locais (CPU, RAM, discos,
//! temperaturas) e imprime uma única linha com status, resumo e
//! performance data. O exit code segue o status (0/1/2/3).
//!
//! ## Uso
//! ```bash
//! perfdata_check                          # config.toml ao lado do executável
//! perfdata_check --config /etc/check.toml
//! perfdata_check --structured-label       # rótulos JSON
//! ```
//!
//! Logs vão para stderr (`RUST_LOG=debug` para detalhes); stdout carrega
//! apenas a linha do plugin.

mod collector;

use collector::Collector;
use perfdata_core::config::AppConfig;
use perfdata_core::format::format_value;
use perfdata_core::{CheckResponse, MetricPoint, Status};
use std::path::PathBuf;
use std::process;
use tracing::{debug, warn};

const USAGE: &str = "Uso: perfdata_check [--config <arquivo>] [--structured-label] [--help]";

/// Argumentos de linha de comando.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    structured_label: bool,
    help: bool,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| format!("{arg} requer um caminho"))?;
                    parsed.config = Some(PathBuf::from(path));
                }
                "--structured-label" => parsed.structured_label = true,
                "--help" | "-h" => parsed.help = true,
                other => return Err(format!("Argumento desconhecido: {other}")),
            }
        }
        Ok(parsed)
    }
}

fn main() {
    // ── Logging (stderr) ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => exit_unknown(&format!("{e}. {USAGE}")),
    };
    if args.help {
        println!("{USAGE}");
        process::exit(Status::Unknown.exit_code());
    }

    // ── Carregar config ──
    let config = match &args.config {
        Some(path) => match AppConfig::try_load(path) {
            Ok(config) => config,
            Err(e) => exit_unknown(&e.to_string()),
        },
        None => AppConfig::load(&AppConfig::default_path()),
    };

    let errors = config.validate();
    if !errors.is_empty() {
        exit_unknown(&format!("Configuração inválida: {}", errors.join("; ")));
    }

    let response = run_check(&config, args.structured_label);
    println!("{}", response.output_line());
    process::exit(response.status().exit_code());
}

/// Coleta, avalia e monta a resposta.
fn run_check(config: &AppConfig, structured_label: bool) -> CheckResponse {
    let mut response = CheckResponse::new(config.output.ok_message.as_str());
    response.set_structured_label(structured_label || config.output.structured_label);

    let mut collector = Collector::new(&config.collect);
    for sample in collector.collect() {
        let point = sample.into_point(&config.thresholds);
        record(&mut response, point);
    }

    debug!(status = %response.status(), metrics = response.perfdata().len(), "check concluído");
    response
}

/// Insere o ponto e, se ele passou de um threshold, registra a mensagem.
fn record(response: &mut CheckResponse, point: MetricPoint) {
    let status = point.status();
    let summary = describe(&point, status);

    match response.add_metric(point) {
        Ok(()) => {
            if status != Status::Ok {
                response.update_status(status, summary);
            }
        }
        Err(e) => warn!("Métrica descartada: {e}"),
    }
}

/// Ex: `disk_usage[/boot] 97.5% (crit 95)`
fn describe(point: &MetricPoint, status: Status) -> String {
    let mut s = point.name().to_string();
    if !point.sub_label().is_empty() {
        s.push_str(&format!("[{}]", point.sub_label()));
    }
    s.push_str(&format!(" {}{}", format_value(point.value()), point.unit()));

    let threshold = match status {
        Status::Critical => point.crit().map(|c| ("crit", c)),
        Status::Warning => point.warn().map(|w| ("warn", w)),
        _ => None,
    };
    if let Some((kind, v)) = threshold {
        s.push_str(&format!(" ({kind} {})", format_value(v)));
    }
    s
}

fn exit_unknown(message: &str) -> ! {
    let mut response = CheckResponse::new("");
    response.update_status(Status::Unknown, message);
    println!("{}", response.output_line());
    process::exit(Status::Unknown.exit_code());
}
