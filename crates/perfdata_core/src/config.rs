//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável define thresholds, modo de
//! rótulo e quais métricas coletar. Seções ausentes usam o padrão.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Erros ao ler ou gravar a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro ao ler {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Erro ao parsear {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Erro de serialização: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro ao gravar {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Par warn/crit de uma família de métricas. Ausente = sem threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crit: Option<f64>,
}

impl Thresholds {
    pub fn new(warn: f64, crit: f64) -> Self {
        Self {
            warn: Some(warn),
            crit: Some(crit),
        }
    }
}

/// Thresholds por família de métrica coletada.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Uso global de CPU (%)
    pub cpu_usage: Thresholds,
    /// Uso de RAM (%)
    pub ram_usage: Thresholds,
    /// Uso de cada disco (%)
    pub disk_usage: Thresholds,
    /// Temperatura de cada sensor (°C)
    pub temperature: Thresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu_usage: Thresholds::new(80.0, 95.0),
            ram_usage: Thresholds::new(80.0, 90.0),
            disk_usage: Thresholds::new(80.0, 95.0),
            temperature: Thresholds::new(75.0, 90.0),
        }
    }
}

/// Formato da linha de saída.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Rótulos como objeto JSON (`'{"metric":"..."}'`) em vez de texto plano
    pub structured_label: bool,
    /// Resumo quando tudo está OK
    pub ok_message: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            structured_label: false,
            ok_message: "todas as métricas dentro dos limites".into(),
        }
    }
}

/// Quais métricas coletar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectConfig {
    pub cpu: bool,
    pub ram: bool,
    pub disks: bool,
    pub temperatures: bool,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            cpu: true,
            ram: true,
            disks: true,
            temperatures: true,
        }
    }
}

/// Configuração raiz do plugin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub thresholds: ThresholdConfig,
    pub collect: CollectConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML, caindo no padrão em caso de erro.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match Self::try_load(path) {
                Ok(config) => {
                    info!("Configuração carregada de {}", path.display());
                    return config;
                }
                Err(e) => warn!("{e}"),
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Carrega configuração sem fallback.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let families = [
            ("cpu_usage", &self.thresholds.cpu_usage),
            ("ram_usage", &self.thresholds.ram_usage),
            ("disk_usage", &self.thresholds.disk_usage),
            ("temperature", &self.thresholds.temperature),
        ];
        for (name, t) in families {
            if let (Some(w), Some(c)) = (t.warn, t.crit) {
                if w > c {
                    errors.push(format!("{name}: warn ({w}) maior que crit ({c})"));
                }
            }
            // Percentuais não podem ser negativos
            if name != "temperature" {
                for v in [t.warn, t.crit].into_iter().flatten() {
                    if v < 0.0 {
                        errors.push(format!("{name}: threshold negativo ({v})"));
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.thresholds.cpu_usage, parsed.thresholds.cpu_usage);
        assert_eq!(config.output.ok_message, parsed.output.ok_message);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[output]
structured_label = true

[thresholds.disk_usage]
warn = 70.0
"#;
        let config: AppConfig = toml::from_str(partial).unwrap();
        assert!(config.output.structured_label);
        assert_eq!(config.thresholds.disk_usage.warn, Some(70.0));
        // Campo omitido = sem threshold
        assert_eq!(config.thresholds.disk_usage.crit, None);
        // Outras seções devem ter valor padrão
        assert_eq!(config.thresholds.cpu_usage, Thresholds::new(80.0, 95.0));
        assert!(config.collect.temperatures);
    }

    #[test]
    fn detects_inverted_thresholds() {
        let mut config = AppConfig::default();
        config.thresholds.ram_usage = Thresholds::new(95.0, 90.0);
        config.thresholds.cpu_usage.warn = Some(-1.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 2, "Erros: {:?}", errors);
        assert!(errors[0].starts_with("cpu_usage"));
        assert!(errors[1].starts_with("ram_usage"));
    }

    #[test]
    fn try_load_reports_missing_file() {
        let err = AppConfig::try_load(Path::new("/nao/existe/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn save_and_load() {
        let path = std::env::temp_dir().join(format!("perfdata_cfg_{}.toml", std::process::id()));
        let mut config = AppConfig::default();
        config.output.structured_label = true;
        config.thresholds.temperature.crit = None;
        config.save(&path).unwrap();

        let loaded = AppConfig::try_load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(loaded.output.structured_label);
        assert_eq!(loaded.thresholds.temperature.crit, None);
        assert_eq!(loaded.thresholds.temperature.warn, Some(75.0));
    }
}
