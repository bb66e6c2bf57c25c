//! Ponto de performance data – uma métrica nomeada com unidade,
//! thresholds e limites opcionais.
//!
//! Formato de um ponto no output do plugin:
//!
//! ```text
//! 'label'=value[unit];[warn];[crit];[min];[max]
//! ```
//!
//! A construção nunca falha. A validação contra a gramática do plugin
//! acontece em [`MetricPoint::validate`], chamada por
//! [`MetricSet::add`](crate::set::MetricSet::add) no momento da inserção.

use crate::format::format_value;
use crate::status::{level_for_value, Status};
use serde::Serialize;
use std::fmt;

/// Erros de validação de um [`MetricPoint`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("O nome da métrica não pode ser vazio")]
    EmptyName,

    #[error("Nome inválido '{0}': não pode conter '=' nem aspas simples (')")]
    InvalidNameChars(String),

    #[error("Unidade inválida '{0}': não pode conter dígitos, ';' nem aspas")]
    InvalidUnitChars(String),

    #[error("min ({min}) não pode ser maior que max ({max})")]
    MinExceedsMax { min: f64, max: f64 },

    #[error("Valor {value} menor que min ({min})")]
    ValueBelowMin { value: f64, min: f64 },

    #[error("Valor {value} maior que max ({max})")]
    ValueAboveMax { value: f64, max: f64 },
}

/// Chave composta `(nome, sub-rótulo)` que identifica um ponto num
/// [`MetricSet`](crate::set::MetricSet).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricKey {
    pub name: String,
    pub sub_label: String,
}

/// Uma medição com unidade, thresholds (warn/crit) e limites (min/max).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    name: String,
    /// Vazio = sem sub-rótulo
    sub_label: String,
    value: f64,
    unit: String,
    warn: Option<f64>,
    crit: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl MetricPoint {
    /// Cria um ponto sem thresholds nem limites. Não valida nada.
    ///
    /// ```
    /// use perfdata_core::MetricPoint;
    ///
    /// let p = MetricPoint::new("memory_usage", 55.0, "%")
    ///     .with_warn(80.0)
    ///     .with_crit(90.0);
    /// assert_eq!(p.render(false), "'memory_usage'=55%;80;90;;");
    /// ```
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_label: String::new(),
            value,
            unit: unit.into(),
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }

    // ── Builder (por valor) ──

    pub fn with_warn(mut self, warn: f64) -> Self {
        self.warn = Some(warn);
        self
    }

    pub fn with_crit(mut self, crit: f64) -> Self {
        self.crit = Some(crit);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Define o sub-rótulo que diferencia métricas de mesmo nome
    /// (ex: uma por interface). A última chamada vence.
    pub fn with_sub_label(mut self, sub_label: impl Into<String>) -> Self {
        self.sub_label = sub_label.into();
        self
    }

    // ── Setters (por referência) ──

    pub fn set_warn(&mut self, warn: f64) -> &mut Self {
        self.warn = Some(warn);
        self
    }

    pub fn set_crit(&mut self, crit: f64) -> &mut Self {
        self.crit = Some(crit);
        self
    }

    pub fn set_min(&mut self, min: f64) -> &mut Self {
        self.min = Some(min);
        self
    }

    pub fn set_max(&mut self, max: f64) -> &mut Self {
        self.max = Some(max);
        self
    }

    pub fn set_sub_label(&mut self, sub_label: impl Into<String>) -> &mut Self {
        self.sub_label = sub_label.into();
        self
    }

    // ── Leitura ──

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sub_label(&self) -> &str {
        &self.sub_label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn warn(&self) -> Option<f64> {
        self.warn
    }

    pub fn crit(&self) -> Option<f64> {
        self.crit
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn key(&self) -> MetricKey {
        MetricKey {
            name: self.name.clone(),
            sub_label: self.sub_label.clone(),
        }
    }

    /// Valida o ponto contra as guidelines de plugins Nagios.
    ///
    /// Para na primeira violação, na ordem: nome vazio, caracteres do nome,
    /// caracteres da unidade, min > max, valor < min, valor > max.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.name.contains(['=', '\'']) {
            return Err(ValidationError::InvalidNameChars(self.name.clone()));
        }
        if self
            .unit
            .chars()
            .any(|c| c.is_ascii_digit() || matches!(c, ';' | '\'' | '"'))
        {
            return Err(ValidationError::InvalidUnitChars(self.unit.clone()));
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ValidationError::MinExceedsMax { min, max });
            }
        }
        if let Some(min) = self.min {
            if self.value < min {
                return Err(ValidationError::ValueBelowMin {
                    value: self.value,
                    min,
                });
            }
        }
        if let Some(max) = self.max {
            if self.value > max {
                return Err(ValidationError::ValueAboveMax {
                    value: self.value,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Avalia o valor contra os próprios warn/crit (maior é pior).
    pub fn status(&self) -> Status {
        level_for_value(self.value, self.warn, self.crit)
    }

    /// Fragmento do output para este ponto.
    ///
    /// No modo plano o rótulo é `nome_subrótulo`, então chaves distintas
    /// como `("a_b", "c")` e `("a", "b_c")` saem ambas como `'a_b_c'`.
    /// A unicidade do [`MetricSet`](crate::set::MetricSet) vale para a chave
    /// estruturada, não para o texto; use o rótulo estruturado quando nomes
    /// e sub-rótulos puderem conter `_`.
    pub fn render(&self, structured_label: bool) -> String {
        self.display(structured_label).to_string()
    }

    pub fn display(&self, structured_label: bool) -> MetricPointDisplay<'_> {
        MetricPointDisplay {
            point: self,
            structured_label,
        }
    }
}

/// Rótulo estruturado `{"metric":"...","label":"..."}`.
#[derive(Serialize)]
struct StructuredLabel<'a> {
    metric: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    label: &'a str,
}

fn is_empty(s: &&str) -> bool {
    s.is_empty()
}

pub struct MetricPointDisplay<'a> {
    point: &'a MetricPoint,
    structured_label: bool,
}

impl fmt::Display for MetricPointDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.point;

        // Rótulo
        f.write_str("'")?;
        if self.structured_label {
            let label = StructuredLabel {
                metric: &p.name,
                label: &p.sub_label,
            };
            let json = serde_json::to_string(&label).map_err(|_| fmt::Error)?;
            f.write_str(&json)?;
        } else {
            f.write_str(&p.name)?;
            if !p.sub_label.is_empty() {
                write!(f, "_{}", p.sub_label)?;
            }
        }
        f.write_str("'")?;

        // Valor + os quatro campos posicionais, sempre presentes
        write!(f, "={}{}", format_value(p.value), p.unit)?;
        for field in [p.warn, p.crit, p.min, p.max] {
            f.write_str(";")?;
            if let Some(v) = field {
                f.write_str(&format_value(v))?;
            }
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
