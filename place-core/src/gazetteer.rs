//! # Gazetteer — Tabela de Referência de Lugares
//!
//! Guarda os nomes conhecidos de países, estados e cidades, normalizados e
//! sem duplicatas. É construído uma única vez (na inicialização do servidor
//! ou do teste) e depois apenas lido, podendo ser compartilhado entre
//! threads sem sincronização.
//!
//! ## Normalização
//!
//! Todo campo textual passa por [`capitalize`]: primeira letra maiúscula,
//! restante minúsculo (`"NEW YORK"` → `"New york"`). Assim as comparações
//! posteriores são insensíveis a caixa sem renormalizar a cada consulta.
//!
//! ## Formato CSV
//!
//! ```text
//! Country,State,City
//! France,Ile-de-france,Paris
//! United states,New york,New york
//! ```
//!
//! Colunas extras são ignoradas; células vazias não contribuem com nomes.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PlaceError, Result};
use crate::text::capitalize;

/// Categorias da tabela de referência, na ordem fixa de avaliação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceCategory {
    Country,
    State,
    City,
}

impl PlaceCategory {
    /// Ordem de avaliação do matcher. Empates favorecem a categoria anterior.
    pub const ALL: [PlaceCategory; 3] = [
        PlaceCategory::Country,
        PlaceCategory::State,
        PlaceCategory::City,
    ];

    /// Nome da categoria, que também é o nome da coluna no CSV.
    pub fn name(&self) -> &'static str {
        match self {
            PlaceCategory::Country => "Country",
            PlaceCategory::State => "State",
            PlaceCategory::City => "City",
        }
    }
}

/// Uma linha bruta do dataset (antes ou depois da normalização).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GazetteerRow {
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
}

impl GazetteerRow {
    pub fn new(country: &str, state: &str, city: &str) -> Self {
        Self {
            country: Some(country.to_string()),
            state: Some(state.to_string()),
            city: Some(city.to_string()),
        }
    }

    pub fn get(&self, category: PlaceCategory) -> Option<&str> {
        match category {
            PlaceCategory::Country => self.country.as_deref(),
            PlaceCategory::State => self.state.as_deref(),
            PlaceCategory::City => self.city.as_deref(),
        }
    }

    fn normalized(self) -> Self {
        Self {
            country: normalize_field(self.country),
            state: normalize_field(self.state),
            city: normalize_field(self.city),
        }
    }
}

fn normalize_field(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| capitalize(&s))
}

/// Tabela de referência imutável, particionada por categoria.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    rows: Vec<GazetteerRow>,
    countries: Vec<String>,
    states: Vec<String>,
    cities: Vec<String>,
    /// Nomes com mais de uma palavra, em minúsculas e já divididos
    compounds: Vec<Vec<String>>,
}

impl Gazetteer {
    /// Normaliza, remove linhas duplicadas (mantendo a primeira ocorrência)
    /// e indexa os nomes por categoria.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = GazetteerRow>,
    {
        let mut seen_rows = HashSet::new();
        let rows: Vec<GazetteerRow> = rows
            .into_iter()
            .map(GazetteerRow::normalized)
            .filter(|row| seen_rows.insert(row.clone()))
            .collect();

        let column = |category: PlaceCategory| -> Vec<String> {
            let mut seen = HashSet::new();
            rows.iter()
                .filter_map(|row| row.get(category))
                .filter(|name| seen.insert(*name))
                .map(str::to_string)
                .collect()
        };
        let countries = column(PlaceCategory::Country);
        let states = column(PlaceCategory::State);
        let cities = column(PlaceCategory::City);

        let mut seen_compounds = HashSet::new();
        let compounds = countries
            .iter()
            .chain(&states)
            .chain(&cities)
            .map(|name| {
                name.split_whitespace()
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .filter(|parts| parts.len() > 1)
            .filter(|parts| seen_compounds.insert(parts.clone()))
            .collect();

        Self {
            rows,
            countries,
            states,
            cities,
            compounds,
        }
    }

    /// Lê um CSV com cabeçalho contendo as colunas `Country`, `State` e `City`.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for category in PlaceCategory::ALL {
            if !headers.iter().any(|h| h == category.name()) {
                return Err(PlaceError::MissingColumn(category.name()));
            }
        }

        let rows = csv_reader
            .deserialize::<GazetteerRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let raw_count = rows.len();
        let gazetteer = Self::from_rows(rows);

        info!(
            raw_rows = raw_count,
            unique_rows = gazetteer.rows.len(),
            countries = gazetteer.countries.len(),
            states = gazetteer.states.len(),
            cities = gazetteer.cities.len(),
            "gazetteer carregado"
        );
        Ok(gazetteer)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PlaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Nomes de uma categoria, únicos e na ordem da primeira ocorrência.
    pub fn names_in_category(&self, category: PlaceCategory) -> &[String] {
        match category {
            PlaceCategory::Country => &self.countries,
            PlaceCategory::State => &self.states,
            PlaceCategory::City => &self.cities,
        }
    }

    /// Linhas normalizadas e deduplicadas, na ordem original.
    pub fn rows(&self) -> &[GazetteerRow] {
        &self.rows
    }

    /// Nomes compostos (ex: `["new", "york"]`) para o tokenizador conservador.
    pub fn compounds(&self) -> &[Vec<String>] {
        &self.compounds
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
