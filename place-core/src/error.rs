//! Erros da carga de recursos (gazetteer e configuração).
//!
//! O motor de identificação em si não falha: estes erros pertencem apenas
//! à fronteira de carga, executada uma vez antes de qualquer requisição.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    #[error("falha de I/O em {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV inválido: {0}")]
    Csv(#[from] csv::Error),

    /// O cabeçalho do CSV não tem uma das colunas obrigatórias.
    #[error("coluna obrigatória ausente no gazetteer: {0}")]
    MissingColumn(&'static str),

    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlaceError>;
