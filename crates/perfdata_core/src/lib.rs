//! # Perfdata Core
//!
//! Modelo, validação e formatação de performance data no padrão de
//! plugins Nagios/Icinga.
//!
//! ## Módulos
//! - [`point`] – `MetricPoint`: uma métrica, sua validação e seu fragmento
//! - [`set`] – `MetricSet`: pontos únicos por `(nome, sub-rótulo)` e a linha final
//! - [`format`] – Formatação compacta de floats (`%g`)
//! - [`status`] – Níveis OK/WARNING/CRITICAL/UNKNOWN e thresholds
//! - [`response`] – Linha completa do plugin (status + resumo + perfdata)
//! - [`config`] – Configuração unificada via TOML

pub mod point;
pub mod set;
pub mod format;
pub mod status;
pub mod response;
pub mod config;

// Re-exports convenientes
pub use point::{MetricKey, MetricPoint, ValidationError};
pub use set::{MetricSet, PerfDataError};
pub use status::Status;
pub use response::CheckResponse;
pub use config::AppConfig;
