//! Resposta de um check – status, mensagens e performance data.
//!
//! Monta a linha final do plugin:
//!
//! ```text
//! STATUS: resumo | 'metric'=10s;40;50;0;60 'other'=1;;;;
//! ```
//!
//! Não encerra o processo; o exit code fica a cargo do binário
//! ([`Status::exit_code`]).

use crate::point::MetricPoint;
use crate::set::{MetricSet, PerfDataError};
use crate::status::Status;

/// Estado acumulado de uma execução de check.
#[derive(Debug, Clone)]
pub struct CheckResponse {
    status: Status,
    ok_message: String,
    messages: Vec<String>,
    perfdata: MetricSet,
    structured_label: bool,
}

impl CheckResponse {
    /// `ok_message` é o resumo usado quando nenhuma mensagem foi registrada.
    pub fn new(ok_message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            ok_message: ok_message.into(),
            messages: Vec::new(),
            perfdata: MetricSet::new(),
            structured_label: false,
        }
    }

    /// Registra uma mensagem. O status só piora, nunca melhora.
    ///
    /// Mensagens com status `Ok` não entram no resumo.
    pub fn update_status(&mut self, status: Status, message: impl Into<String>) {
        self.status = self.status.worst(status);
        if status != Status::Ok {
            self.messages.push(message.into());
        }
    }

    pub fn set_structured_label(&mut self, enabled: bool) {
        self.structured_label = enabled;
    }

    pub fn add_metric(&mut self, point: MetricPoint) -> Result<(), PerfDataError> {
        self.perfdata.add(point)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn perfdata(&self) -> &MetricSet {
        &self.perfdata
    }

    /// Linha completa do plugin.
    pub fn output_line(&self) -> String {
        let summary = if self.messages.is_empty() {
            sanitize(&self.ok_message)
        } else {
            self.messages
                .iter()
                .map(|m| sanitize(m))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut line = format!("{}: {summary}", self.status);
        if !self.perfdata.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.perfdata.render(self.structured_label));
        }
        line
    }
}

/// `|` separa o texto da performance data, então não pode aparecer no resumo.
fn sanitize(message: &str) -> String {
    message.replace('|', "PIPE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_without_perfdata() {
        let r = CheckResponse::new("tudo certo");
        assert_eq!(r.status(), Status::Ok);
        assert_eq!(r.output_line(), "OK: tudo certo");
    }

    #[test]
    fn perfdata_is_appended_after_pipe() {
        let mut r = CheckResponse::new("tudo certo");
        r.add_metric(MetricPoint::new("metric", 10.0, "s").with_warn(40.0))
            .unwrap();
        assert_eq!(r.output_line(), "OK: tudo certo | 'metric'=10s;40;;;");

        r.set_structured_label(true);
        assert_eq!(
            r.output_line(),
            r#"OK: tudo certo | '{"metric":"metric"}'=10s;40;;;"#
        );
    }

    #[test]
    fn status_only_escalates() {
        let mut r = CheckResponse::new("ok");
        r.update_status(Status::Critical, "disco cheio");
        r.update_status(Status::Warning, "cpu alta");
        r.update_status(Status::Ok, "ignorada");
        assert_eq!(r.status(), Status::Critical);
        assert_eq!(r.output_line(), "CRITICAL: disco cheio, cpu alta");
    }

    #[test]
    fn pipes_in_messages_are_replaced() {
        let mut r = CheckResponse::new("a|b");
        assert_eq!(r.output_line(), "OK: aPIPEb");
        r.update_status(Status::Unknown, "falha | x");
        assert_eq!(r.output_line(), "UNKNOWN: falha PIPE x");
    }

    #[test]
    fn add_metric_propagates_errors() {
        let mut r = CheckResponse::new("ok");
        assert!(r.add_metric(MetricPoint::new("", 1.0, "")).is_err());
        r.add_metric(MetricPoint::new("m", 1.0, "")).unwrap();
        assert!(matches!(
            r.add_metric(MetricPoint::new("m", 2.0, "")),
            Err(PerfDataError::DuplicateMetric { .. })
        ));
        assert_eq!(r.perfdata().len(), 1);
    }
}
