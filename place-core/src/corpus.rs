//! # Dados de Demonstração
//!
//! Um gazetteer pequeno embutido no binário (países, estados e cidades
//! conhecidos, com algumas linhas repetidas de propósito) e textos de exemplo
//! para a interface web. Em produção o gazetteer vem de um CSV externo.

use crate::error::Result;
use crate::gazetteer::Gazetteer;

/// CSV embutido com as colunas `Country,State,City`
pub const DEMO_GAZETTEER_CSV: &str = include_str!("../data/placenamedatasets.csv");

/// Carrega o gazetteer embutido.
pub fn demo_gazetteer() -> Result<Gazetteer> {
    Gazetteer::from_csv_reader(DEMO_GAZETTEER_CSV.as_bytes())
}

/// Textos de demonstração para a interface web
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "Viagem",
            "I love Paris in the spring. Last year we flew from Lisbon to Munich and then took the train to Vienna.",
        ),
        (
            "Repetição",
            "Paris is lovely. Paris is also historic.",
        ),
        (
            "Erros de digitação",
            "Our team has offices in Germny, Pakistn and Australa, plus a small branch near Tokio.",
        ),
        (
            "Nomes compostos",
            "She moved from New York to Buenos Aires, then spent a winter in Cape Town before settling in New Delhi.",
        ),
        (
            "Ambiguidade",
            "Georgia is a country in the Caucasus, but Atlanta is the capital of the state of Georgia.",
        ),
        (
            "Negócios",
            "The conference in Toronto drew speakers from Mumbai, Shanghai and Sydney. Analysts in London and Frankfurt followed the keynote remotely.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::PlaceCategory;

    #[test]
    fn test_demo_gazetteer_loads_and_deduplicates() {
        let gazetteer = demo_gazetteer().unwrap();
        let raw_rows = DEMO_GAZETTEER_CSV.lines().count() - 1;
        assert!(gazetteer.len() < raw_rows);

        let cities = gazetteer.names_in_category(PlaceCategory::City);
        assert!(cities.iter().any(|c| c == "Paris"));
        assert!(cities.iter().any(|c| c == "New york"));
        assert!(!gazetteer.compounds().is_empty());
    }

    #[test]
    fn test_demo_texts_not_empty() {
        assert!(demo_texts().iter().all(|(domain, text)| !domain.is_empty() && !text.is_empty()));
    }
}
