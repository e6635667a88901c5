//! Search classification enums.
//!
//! The wire values are the Portuguese strings the backend stores in
//! `pesquisas_usuarios` (`tipo_busca`, `tipo_filtro`).

use serde::{Deserialize, Serialize};

/// How a search was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SearchMode {
    #[default]
    #[serde(rename = "texto")]
    Text,
    #[serde(rename = "voz")]
    Voice,
    #[serde(rename = "imagem")]
    Image,
}

impl SearchMode {
    /// The backend wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "texto",
            Self::Voice => "voz",
            Self::Image => "imagem",
        }
    }

    /// Parse from a wire value; anything unrecognized is a text search.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "voz" => Self::Voice,
            "imagem" => Self::Image,
            _ => Self::Text,
        }
    }
}

/// Which tab a search was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilterTab {
    #[default]
    #[serde(rename = "geral")]
    General,
    #[serde(rename = "promocoes")]
    Promotions,
}

impl FilterTab {
    /// The backend wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "geral",
            Self::Promotions => "promocoes",
        }
    }

    /// Parse from a wire value; anything unrecognized is the general tab.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "promocoes" => Self::Promotions,
            _ => Self::General,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_mode_wire_values() {
        assert_eq!(SearchMode::Voice.as_str(), "voz");
        assert_eq!(SearchMode::parse("imagem"), SearchMode::Image);
        assert_eq!(SearchMode::parse("whatever"), SearchMode::Text);

        let json = serde_json::to_string(&SearchMode::Voice).unwrap();
        assert_eq!(json, "\"voz\"");
    }

    #[test]
    fn test_filter_tab_wire_values() {
        assert_eq!(FilterTab::Promotions.as_str(), "promocoes");
        assert_eq!(FilterTab::parse("promocoes"), FilterTab::Promotions);
        assert_eq!(FilterTab::parse(""), FilterTab::General);

        let json = serde_json::to_string(&FilterTab::General).unwrap();
        assert_eq!(json, "\"geral\"");
    }
}
