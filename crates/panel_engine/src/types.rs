use std::fmt;

use panel_core::{
    file_name_from_url, LogLevel, OccurrenceDetail, OccurrenceReport, OperationOutcome, RemoteLog,
    SuccessReport,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `GET /api/verificar-maior-zip`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub nome_arquivo: Option<String>,
    #[serde(default)]
    pub arquivo: Option<String>,
}

/// `POST /api/processar-completo`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub resultado: Option<ProcessResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessResult {
    #[serde(default)]
    pub url_arquivo: Option<String>,
    #[serde(default)]
    pub total_encontrados: u64,
    #[serde(default)]
    pub arquivos_txt: Vec<serde_json::Value>,
    #[serde(default)]
    pub resultados: Vec<OccurrenceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OccurrenceRecord {
    pub arquivo: String,
    pub linha_encontrada: u64,
    #[serde(default)]
    pub total_linhas_contexto: u64,
    #[serde(default)]
    pub linha_inicio: u64,
    #[serde(default)]
    pub linha_fim: u64,
    #[serde(default)]
    pub contexto_completo: String,
}

/// `POST /api/baixar-zip` and `POST /api/ler-conteudo`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// `GET /api/logs`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<LogRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProcessRequest<'a> {
    pub url: &'a str,
    pub string_busca: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FileRequest<'a> {
    pub arquivo: Option<&'a str>,
}

impl From<LogRecord> for RemoteLog {
    fn from(record: LogRecord) -> Self {
        RemoteLog::new(
            record.timestamp,
            LogLevel::from_wire(&record.level),
            record.message,
        )
    }
}

impl VerifyResponse {
    pub fn into_outcome(self) -> OperationOutcome {
        if !self.success {
            return OperationOutcome::Rejected {
                message: self.message,
            };
        }
        let file_name = self
            .nome_arquivo
            .or_else(|| self.arquivo.as_deref().map(|url| file_name_from_url(url).to_string()));
        OperationOutcome::Succeeded(SuccessReport {
            message: self.message,
            file_name,
            file_url: self.arquivo,
            occurrences: None,
        })
    }
}

impl ProcessResponse {
    pub fn into_outcome(self) -> OperationOutcome {
        if !self.success {
            return OperationOutcome::Rejected {
                message: self.message,
            };
        }
        let occurrences = self.resultado.map(ProcessResult::into_report);
        OperationOutcome::Succeeded(SuccessReport {
            message: self.message,
            file_name: None,
            file_url: None,
            occurrences,
        })
    }
}

impl ProcessResult {
    fn into_report(self) -> OccurrenceReport {
        OccurrenceReport {
            archive_url: self.url_arquivo,
            total: self.total_encontrados,
            text_files: self.arquivos_txt.iter().map(display_value).collect(),
            details: self
                .resultados
                .into_iter()
                .map(|record| {
                    OccurrenceDetail::new(
                        record.arquivo,
                        record.linha_encontrada,
                        record.total_linhas_contexto,
                        (record.linha_inicio, record.linha_fim),
                        &record.contexto_completo,
                    )
                })
                .collect(),
        }
    }
}

impl ActionResponse {
    pub fn into_outcome(self) -> OperationOutcome {
        if self.success {
            OperationOutcome::Succeeded(SuccessReport::new(self.message))
        } else {
            OperationOutcome::Rejected {
                message: self.message,
            }
        }
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    /// The body was not the expected JSON document.
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
