//! Coleta de métricas locais via `sysinfo`.
//!
//! Cada leitura vira um [`Sample`] de uma família (CPU, RAM, disco,
//! temperatura); os thresholds da família são aplicados em
//! [`Sample::into_point`].

use perfdata_core::config::{CollectConfig, ThresholdConfig, Thresholds};
use perfdata_core::MetricPoint;
use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, RefreshKind, System};
use tracing::debug;

/// Família de uma métrica coletada – decide quais thresholds usar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    CpuUsage,
    RamUsage,
    DiskUsage,
    Temperature,
}

impl Family {
    fn thresholds(self, config: &ThresholdConfig) -> Thresholds {
        match self {
            Family::CpuUsage => config.cpu_usage,
            Family::RamUsage => config.ram_usage,
            Family::DiskUsage => config.disk_usage,
            Family::Temperature => config.temperature,
        }
    }
}

/// Uma leitura bruta, ainda sem thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub family: Family,
    pub name: &'static str,
    pub sub_label: String,
    pub value: f64,
    pub unit: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Sample {
    fn percent(family: Family, name: &'static str, sub_label: String, value: f64) -> Self {
        Self {
            family,
            name,
            sub_label,
            value: round2(value.clamp(0.0, 100.0)),
            unit: "%",
            min: Some(0.0),
            max: Some(100.0),
        }
    }

    /// Converte a leitura em [`MetricPoint`] com os thresholds da família.
    pub fn into_point(self, config: &ThresholdConfig) -> MetricPoint {
        let t = self.family.thresholds(config);
        let mut point = MetricPoint::new(self.name, self.value, self.unit);
        point.set_sub_label(sanitize_label(&self.sub_label));
        if let Some(w) = t.warn {
            point.set_warn(w);
        }
        if let Some(c) = t.crit {
            point.set_crit(c);
        }
        if let Some(min) = self.min {
            point.set_min(min);
        }
        if let Some(max) = self.max {
            point.set_max(max);
        }
        point
    }
}

/// Mount points e rótulos de sensores vêm do sistema; uma aspa simples
/// fecharia o rótulo `'...'` antes da hora e quebraria os campos posicionais.
fn sanitize_label(label: &str) -> String {
    label.replace('\'', "_")
}

/// Arredonda para duas casas (evita ruído de f32 → f64 no output).
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Coletor de métricas do host.
pub struct Collector {
    sys: System,
    disks: Disks,
    components: Components,
    enabled: CollectConfig,
}

impl Collector {
    pub fn new(enabled: &CollectConfig) -> Self {
        let sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            enabled: enabled.clone(),
        }
    }

    /// Lê todos os sensores habilitados.
    pub fn collect(&mut self) -> Vec<Sample> {
        let mut samples = Vec::new();

        if self.enabled.cpu {
            samples.push(self.cpu_usage());
        }
        if self.enabled.ram {
            self.sys.refresh_memory();
            if let Some(s) = ram_usage(self.sys.used_memory(), self.sys.total_memory()) {
                samples.push(s);
            }
        }
        if self.enabled.disks {
            self.disks.refresh(true);
            samples.extend(self.disk_usage());
        }
        if self.enabled.temperatures {
            self.components.refresh(true);
            samples.extend(self.temperatures());
        }

        debug!("{} métricas coletadas", samples.len());
        samples
    }

    /// Uso de CPU precisa de duas leituras separadas pelo intervalo mínimo.
    fn cpu_usage(&mut self) -> Sample {
        self.sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_usage();
        Sample::percent(
            Family::CpuUsage,
            "cpu_usage",
            String::new(),
            f64::from(self.sys.global_cpu_usage()),
        )
    }

    fn disk_usage(&self) -> Vec<Sample> {
        self.disks
            .iter()
            .filter_map(|disk| {
                let mount = disk.mount_point().display().to_string();
                disk_percent(disk.total_space(), disk.available_space())
                    .map(|p| Sample::percent(Family::DiskUsage, "disk_usage", mount, p))
            })
            .collect()
    }

    fn temperatures(&self) -> Vec<Sample> {
        let mut samples = Vec::new();
        for comp in self.components.iter() {
            // Sensor sem leitura ou com valor absurdo
            let Some(t) = comp.temperature() else { continue };
            if !(t > 0.0 && t < 150.0) {
                continue;
            }
            samples.push(Sample {
                family: Family::Temperature,
                name: "temperature",
                sub_label: comp.label().to_string(),
                value: round2(f64::from(t)),
                unit: "C",
                min: None,
                max: None,
            });
        }
        samples
    }
}

fn ram_usage(used: u64, total: u64) -> Option<Sample> {
    if total == 0 {
        return None;
    }
    let percent = used as f64 / total as f64 * 100.0;
    Some(Sample::percent(Family::RamUsage, "ram_usage", String::new(), percent))
}

/// Percentual usado; `None` para pseudo-filesystems sem tamanho.
fn disk_percent(total: u64, available: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(used as f64 / total as f64 * 100.0)
}
