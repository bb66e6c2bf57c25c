//! Níveis de status do plugin e avaliação de thresholds.
//!
//! Os thresholds de uma métrica são apenas informativos para o monitoring
//! host; a avaliação aqui serve ao plugin que quer derivar o próprio status.

use std::fmt;

/// Status de um check, com o exit code convencional do plugin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Exit code esperado pelo Nagios/Icinga.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// Gravidade para "o pior vence": Ok < Warning < Unknown < Critical.
    fn severity(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Unknown => 2,
            Status::Critical => 3,
        }
    }

    /// Retorna o mais grave entre `self` e `other`.
    pub fn worst(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retorna o [`Status`] de um valor dado thresholds opcionais.
///
/// Maior é pior e os limites são inclusivos.
pub fn level_for_value(value: f64, warn: Option<f64>, crit: Option<f64>) -> Status {
    if crit.is_some_and(|c| value >= c) {
        Status::Critical
    } else if warn.is_some_and(|w| value >= w) {
        Status::Warning
    } else {
        Status::Ok
    }
}
