//! Conjunto de pontos de performance data de uma execução de check.
//!
//! Cada ponto é identificado por `(nome, sub-rótulo)`. Inserções duplicadas
//! são rejeitadas e a ordem de render é a ordem de inserção.

use crate::point::{MetricKey, MetricPoint, ValidationError};
use crate::status::Status;
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Erros ao inserir um ponto num [`MetricSet`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PerfDataError {
    #[error("O ponto de performance informado não é válido: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Já existe um ponto com a métrica '{name}' e o sub-rótulo '{sub_label}'")]
    DuplicateMetric { name: String, sub_label: String },
}

/// Pontos aceitos, em ordem de inserção.
#[derive(Debug, Clone, Default)]
pub struct MetricSet {
    points: IndexMap<MetricKey, MetricPoint>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valida e armazena o ponto.
    ///
    /// Em caso de erro o conjunto não é alterado.
    pub fn add(&mut self, point: MetricPoint) -> Result<(), PerfDataError> {
        point.validate()?;

        match self.points.entry(point.key()) {
            Entry::Occupied(e) => {
                let key = e.key();
                Err(PerfDataError::DuplicateMetric {
                    name: key.name.clone(),
                    sub_label: key.sub_label.clone(),
                })
            }
            Entry::Vacant(e) => {
                e.insert(point);
                Ok(())
            }
        }
    }

    /// Como [`add`](Self::add), mas armazena uma cópia de um builder
    /// emprestado (o chamador pode continuar alterando o original).
    pub fn add_ref(&mut self, point: &MetricPoint) -> Result<(), PerfDataError> {
        self.add(point.clone())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, name: &str, sub_label: &str) -> bool {
        self.get(name, sub_label).is_some()
    }

    pub fn get(&self, name: &str, sub_label: &str) -> Option<&MetricPoint> {
        self.points.get(&MetricKey {
            name: name.to_string(),
            sub_label: sub_label.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricPoint> {
        self.points.values()
    }

    /// Pior status entre os pontos armazenados (`Ok` se vazio).
    pub fn worst_status(&self) -> Status {
        self.points
            .values()
            .fold(Status::Ok, |acc, p| acc.worst(p.status()))
    }

    /// Linha de performance data: os fragmentos separados por um espaço.
    pub fn render(&self, structured_label: bool) -> String {
        let mut out = String::new();
        for (i, point) in self.points.values().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&point.render(structured_label));
        }
        out
    }
}

impl<'a> IntoIterator for &'a MetricSet {
    type Item = &'a MetricPoint;
    type IntoIter = indexmap::map::Values<'a, MetricKey, MetricPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.values()
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_valid_point() {
        let mut set = MetricSet::new();
        set.add(MetricPoint::new("metric", 10.0, "")).unwrap();
        assert!(set.contains("metric", ""));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rejects_duplicate_without_overwriting() {
        let mut set = MetricSet::new();
        set.add(MetricPoint::new("metric", 10.0, "")).unwrap();

        let err = set.add(MetricPoint::new("metric", 99.0, "")).unwrap_err();
        assert!(matches!(err, PerfDataError::DuplicateMetric { .. }));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("metric", "").map(|p| p.value()), Some(10.0));
    }

    #[test]
    fn sub_labels_make_distinct_keys() {
        let mut set = MetricSet::new();
        set.add(MetricPoint::new("metric", 10.0, "")).unwrap();
        set.add(MetricPoint::new("metric", 10.0, "").with_sub_label("tag1"))
            .unwrap();
        set.add(MetricPoint::new("metric", 10.0, "").with_sub_label("tag2"))
            .unwrap();

        let err = set
            .add(MetricPoint::new("metric", 10.0, "").with_sub_label("tag1"))
            .unwrap_err();
        assert_eq!(
            err,
            PerfDataError::DuplicateMetric {
                name: "metric".into(),
                sub_label: "tag1".into(),
            }
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn keys_do_not_collide_on_concatenation() {
        let mut set = MetricSet::new();
        set.add(MetricPoint::new("ab", 1.0, "").with_sub_label("c"))
            .unwrap();
        set.add(MetricPoint::new("a", 1.0, "").with_sub_label("bc"))
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn invalid_point_leaves_set_unchanged() {
        let mut set = MetricSet::new();
        let err = set
            .add(MetricPoint::new("metric", 10.0, "").with_min(50.0))
            .unwrap_err();
        assert!(matches!(
            err,
            PerfDataError::Invalid(ValidationError::ValueBelowMin { .. })
        ));
        assert!(err.to_string().contains("não é válido"));
        assert!(set.is_empty());

        // A chave continua livre
        set.add(MetricPoint::new("metric", 60.0, "").with_min(50.0))
            .unwrap();
    }

    #[test]
    fn stored_point_is_a_copy() {
        let mut set = MetricSet::new();
        let mut builder = MetricPoint::new("metric", 10.0, "s");
        set.add_ref(&builder).unwrap();

        builder.set_warn(1.0).set_sub_label("other");
        set.add_ref(&builder).unwrap();

        assert_eq!(set.get("metric", "").and_then(|p| p.warn()), None);
        assert_eq!(set.render(false), "'metric'=10s;;;; 'metric_other'=10s;1;;;");
    }

    #[test]
    fn empty_set_renders_empty_string() {
        assert_eq!(MetricSet::new().render(false), "");
        assert_eq!(MetricSet::new().render(true), "");
    }

    #[test]
    fn render_joins_in_insertion_order() {
        let mut set = MetricSet::new();
        set.add(MetricPoint::new("b", 2.0, "s")).unwrap();
        set.add(MetricPoint::new("a", 1.0, "%").with_warn(80.0))
            .unwrap();
        set.add(MetricPoint::new("a", 3.0, "").with_sub_label("eth0"))
            .unwrap();

        assert_eq!(
            set.render(false),
            "'b'=2s;;;; 'a'=1%;80;;; 'a_eth0'=3;;;;"
        );
        assert_eq!(
            set.render(true),
            r#"'{"metric":"b"}'=2s;;;; '{"metric":"a"}'=1%;80;;; '{"metric":"a","label":"eth0"}'=3;;;;"#
        );

        let values: Vec<f64> = set.iter().map(|p| p.value()).collect();
        assert_eq!(values, [2.0, 1.0, 3.0]);

        let mut labels = Vec::new();
        for point in &set {
            labels.push(point.sub_label());
        }
        assert_eq!(labels, ["", "", "eth0"]);
    }

    #[test]
    fn worst_status_across_points() {
        let mut set = MetricSet::new();
        assert_eq!(set.worst_status(), Status::Ok);
        set.add(MetricPoint::new("a", 75.0, "").with_warn(70.0))
            .unwrap();
        assert_eq!(set.worst_status(), Status::Warning);
        set.add(MetricPoint::new("b", 95.0, "").with_crit(90.0))
            .unwrap();
        assert_eq!(set.worst_status(), Status::Critical);
    }
}
