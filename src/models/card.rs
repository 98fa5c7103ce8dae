//! Vocabulary card as served by `/api/tarjetas`.
//!
//! The server sends a different shape per category (verbs carry `grupo`,
//! adjectives `tipo`, adverbs `adverbio` and `categoria`), so every field is
//! optional and the display rules below pick whatever is present.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-side identifier of a card. Echoed back verbatim in stat deltas.
///
/// Any JSON value is accepted; ids that are neither integers nor strings
/// (floats, huge numbers, booleans) land in `Other` instead of failing the
/// whole batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl CardId {
    /// Empty strings, zero, `false` and `null` are treated as "no id".
    fn is_present(&self) -> bool {
        match self {
            CardId::Number(n) => *n != 0,
            CardId::Text(s) => !s.is_empty(),
            CardId::Other(value) => is_truthy(value),
        }
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64() != Some(0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Number(n) => write!(f, "{n}"),
            CardId::Text(s) => f.write_str(s),
            CardId::Other(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: Option<CardId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub kanji: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub adverbio: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hiragana: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub grupo: Option<String>,
    #[serde(default, rename = "español", deserialize_with = "lenient_text")]
    pub espanol: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub par_transitivo_intransitivo: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tipo: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub significado: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub categoria: Option<String>,
}

/// Accepts strings, numbers and booleans; anything else reads as absent.
/// Data files are hand-written, so `"grupo": 2` and `"grupo": "2"` both occur.
/// Zero and `false` read as absent too.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value) if !is_truthy(&value) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A field counts as present only when it is non-empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl Card {
    /// Id used for stat tracking. Cards without one are never reported.
    pub fn tracked_id(&self) -> Option<&CardId> {
        self.id.as_ref().filter(|id| id.is_present())
    }

    /// Front of the card: `adverbio` wins over `kanji`.
    pub fn primary_text(&self) -> &str {
        present(&self.adverbio)
            .or_else(|| present(&self.kanji))
            .unwrap_or_default()
    }

    /// Phonetic reading, if the card has one.
    pub fn reading(&self) -> Option<&str> {
        present(&self.hiragana)
    }

    /// Back of the card.
    ///
    /// Checked in order: verb cards (`grupo`), adjective cards (`tipo` with
    /// `español` and `kanji`), then anything with a meaning and a category.
    /// Missing values inside a chosen branch render as empty text.
    pub fn translation_text(&self) -> String {
        let espanol = present(&self.espanol);
        let categoria = present(&self.categoria).unwrap_or_default();

        if let Some(grupo) = present(&self.grupo) {
            let mut text = format!("{}\nGrupo: {}", espanol.unwrap_or_default(), grupo);
            if self.par_transitivo_intransitivo.as_deref() == Some("Sí") {
                text.push_str(&format!(
                    "\nVersión: {}",
                    present(&self.tipo).unwrap_or_default()
                ));
            }
            return text;
        }

        if let (Some(tipo), Some(espanol), Some(_)) =
            (present(&self.tipo), espanol, present(&self.kanji))
        {
            return format!("{espanol}\nTipo: {tipo}");
        }

        match espanol.or_else(|| present(&self.significado)) {
            Some(meaning) => format!("{meaning}\nCategoría: {categoria}"),
            None => format!("Categoría: {categoria}\n(Traducción no disponible)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(value: serde_json::Value) -> Card {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_verb_with_transitive_pair() {
        let c = card(json!({
            "kanji": "食べる",
            "grupo": "2",
            "español": "comer",
            "par_transitivo_intransitivo": "Sí",
            "tipo": "transitivo"
        }));

        assert_eq!(c.translation_text(), "comer\nGrupo: 2\nVersión: transitivo");
    }

    #[test]
    fn test_verb_without_transitive_pair() {
        let c = card(json!({
            "kanji": "行く",
            "grupo": 1,
            "español": "ir",
            "par_transitivo_intransitivo": "No",
            "tipo": "intransitivo"
        }));

        assert_eq!(c.translation_text(), "ir\nGrupo: 1");
    }

    #[test]
    fn test_adjective_shows_type() {
        let c = card(json!({
            "kanji": "高い",
            "hiragana": "たかい",
            "español": "alto, caro",
            "tipo": "い"
        }));

        assert_eq!(c.translation_text(), "alto, caro\nTipo: い");
    }

    #[test]
    fn test_adverb_with_meaning() {
        let c = card(json!({
            "adverbio": "ゆっくり",
            "español": "despacio",
            "categoria": "adverbios"
        }));

        assert_eq!(c.translation_text(), "despacio\nCategoría: adverbios");
    }

    #[test]
    fn test_significado_used_when_espanol_missing() {
        let c = card(json!({
            "adverbio": "とても",
            "significado": "muy",
            "categoria": "grado"
        }));

        assert_eq!(c.translation_text(), "muy\nCategoría: grado");
    }

    #[test]
    fn test_fallback_without_translation() {
        let c = card(json!({ "adverbio": "そろそろ", "categoria": "tiempo" }));

        assert_eq!(
            c.translation_text(),
            "Categoría: tiempo\n(Traducción no disponible)"
        );
    }

    #[test]
    fn test_tipo_without_kanji_falls_through() {
        let c = card(json!({
            "adverbio": "もう",
            "tipo": "x",
            "español": "ya",
            "categoria": "tiempo"
        }));

        assert_eq!(c.translation_text(), "ya\nCategoría: tiempo");
    }

    #[test]
    fn test_primary_text_prefers_adverbio() {
        let c = card(json!({ "adverbio": "すぐ", "kanji": "直ぐ" }));
        assert_eq!(c.primary_text(), "すぐ");

        let c = card(json!({ "adverbio": "", "kanji": "直ぐ" }));
        assert_eq!(c.primary_text(), "直ぐ");
    }

    #[test]
    fn test_reading_only_when_present() {
        let c = card(json!({ "kanji": "水", "hiragana": "みず" }));
        assert_eq!(c.reading(), Some("みず"));

        let c = card(json!({ "kanji": "水", "hiragana": "" }));
        assert_eq!(c.reading(), None);

        let c = card(json!({ "adverbio": "もっと" }));
        assert_eq!(c.reading(), None);
    }

    #[test]
    fn test_tracked_id() {
        assert_eq!(
            card(json!({ "id": "v001", "kanji": "見る" })).tracked_id(),
            Some(&CardId::Text("v001".to_string()))
        );
        assert_eq!(
            card(json!({ "id": 7, "kanji": "見る" })).tracked_id(),
            Some(&CardId::Number(7))
        );
        assert_eq!(card(json!({ "id": "", "kanji": "見る" })).tracked_id(), None);
        assert_eq!(card(json!({ "id": 0, "kanji": "見る" })).tracked_id(), None);
        assert_eq!(card(json!({ "kanji": "見る" })).tracked_id(), None);
    }

    #[test]
    fn test_unusual_ids_do_not_break_batch() {
        let cards: Vec<Card> = serde_json::from_value(json!([
            { "id": 1, "kanji": "会う" },
            { "id": 2.5, "kanji": "買う" },
            { "id": 18446744073709551615u64, "kanji": "言う" },
            { "id": true, "kanji": "歌う" },
            { "id": false, "kanji": "使う" },
            { "id": 0.0, "kanji": "洗う" }
        ]))
        .unwrap();

        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].tracked_id(), Some(&CardId::Number(1)));
        assert_eq!(cards[1].tracked_id(), Some(&CardId::Other(json!(2.5))));
        assert_eq!(cards[1].tracked_id().unwrap().to_string(), "2.5");
        assert_eq!(
            cards[2].tracked_id().unwrap().to_string(),
            "18446744073709551615"
        );
        assert!(cards[3].tracked_id().is_some());
        assert_eq!(cards[4].tracked_id(), None);
        assert_eq!(cards[5].tracked_id(), None);
    }

    #[test]
    fn test_zero_and_false_fields_are_absent() {
        let c = card(json!({
            "kanji": "来る",
            "grupo": 0,
            "español": "y",
            "categoria": "verbo"
        }));
        assert_eq!(c.translation_text(), "y\nCategoría: verbo");

        let c = card(json!({ "kanji": false, "adverbio": 0, "hiragana": false }));
        assert_eq!(c.primary_text(), "");
        assert_eq!(c.reading(), None);

        let c = card(json!({ "kanji": "する", "grupo": true, "español": "hacer" }));
        assert_eq!(c.translation_text(), "hacer\nGrupo: true");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let c = card(json!({
            "id": 3,
            "kanji": "書く",
            "ejemplo": { "frase": "手紙を書く" },
            "nivel": ["N5"]
        }));

        assert_eq!(c.primary_text(), "書く");
    }

    #[test]
    fn test_card_id_display() {
        assert_eq!(CardId::Number(12).to_string(), "12");
        assert_eq!(CardId::Text("adj-4".to_string()).to_string(), "adj-4");
    }
}
