//! # Recipe Model
//!
//! Types decoded from the recipe list endpoint. Field names follow the wire
//! format (`uuid`, `photo_url_small`, ...); links are optional.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::RecipeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeList {
    pub recipes: Vec<Recipe>,
}

impl RecipeList {
    /// Decode a recipe list from its JSON body
    pub fn from_json(body: &[u8]) -> Result<Self, RecipeError> {
        Ok(serde_json::from_slice(body)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "uuid")]
    pub id: Uuid,

    pub name: String,

    pub cuisine: Cuisine,

    #[serde(rename = "source_url", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Url>,

    #[serde(rename = "photo_url_small", default, skip_serializing_if = "Option::is_none")]
    pub small_photo: Option<Url>,

    #[serde(rename = "photo_url_large", default, skip_serializing_if = "Option::is_none")]
    pub large_photo: Option<Url>,

    #[serde(rename = "youtube_url", default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<Url>,
}

/// Which of a recipe's two photos to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoSize {
    #[default]
    Small,
    Large,
}

impl Recipe {
    pub fn photo(&self, size: PhotoSize) -> Option<&Url> {
        match size {
            PhotoSize::Small => self.small_photo.as_ref(),
            PhotoSize::Large => self.large_photo.as_ref(),
        }
    }
}

/// Cuisine of a recipe, keyed by demonym.
///
/// Demonyms in the [`KnownCuisine`] table decode to `Known` and get a flag;
/// anything else is kept verbatim as `Unknown`. Both encode back to the
/// original string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Cuisine {
    Known(KnownCuisine),
    Unknown(String),
}

impl Cuisine {
    pub fn from_demonym(demonym: impl Into<String>) -> Self {
        let demonym = demonym.into();
        match KnownCuisine::from_demonym(&demonym) {
            Some(known) => Cuisine::Known(known),
            None => Cuisine::Unknown(demonym),
        }
    }

    pub fn demonym(&self) -> &str {
        match self {
            Cuisine::Known(known) => known.demonym(),
            Cuisine::Unknown(demonym) => demonym,
        }
    }

    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Cuisine::Known(known) => Some(known.flag()),
            Cuisine::Unknown(_) => None,
        }
    }

    /// Display label: flag and demonym for known cuisines, the raw string otherwise
    pub fn text(&self) -> String {
        match self {
            Cuisine::Known(known) => format!("{} {}", known.flag(), known.demonym()),
            Cuisine::Unknown(demonym) => demonym.clone(),
        }
    }
}

impl From<String> for Cuisine {
    fn from(value: String) -> Self {
        Cuisine::from_demonym(value)
    }
}

impl From<Cuisine> for String {
    fn from(value: Cuisine) -> Self {
        match value {
            Cuisine::Known(known) => known.demonym().to_owned(),
            Cuisine::Unknown(demonym) => demonym,
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownCuisine {
    Malaysian,
    British,
    American,
    Canadian,
    French,
    Polish,
    Russian,
    Tunisian,
    Croatian,
}

impl KnownCuisine {
    pub const ALL: [KnownCuisine; 9] = [
        KnownCuisine::Malaysian,
        KnownCuisine::British,
        KnownCuisine::American,
        KnownCuisine::Canadian,
        KnownCuisine::French,
        KnownCuisine::Polish,
        KnownCuisine::Russian,
        KnownCuisine::Tunisian,
        KnownCuisine::Croatian,
    ];

    /// Exact, case-sensitive lookup
    pub fn from_demonym(demonym: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.demonym() == demonym)
    }

    pub fn demonym(self) -> &'static str {
        match self {
            KnownCuisine::Malaysian => "Malaysian",
            KnownCuisine::British => "British",
            KnownCuisine::American => "American",
            KnownCuisine::Canadian => "Canadian",
            KnownCuisine::French => "French",
            KnownCuisine::Polish => "Polish",
            KnownCuisine::Russian => "Russian",
            KnownCuisine::Tunisian => "Tunisian",
            KnownCuisine::Croatian => "Croatian",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            KnownCuisine::Malaysian => "🇲🇾",
            KnownCuisine::British => "🇬🇧",
            KnownCuisine::American => "🇺🇸",
            KnownCuisine::Canadian => "🇨🇦",
            KnownCuisine::French => "🇫🇷",
            KnownCuisine::Polish => "🇵🇱",
            KnownCuisine::Russian => "🇷🇺",
            KnownCuisine::Tunisian => "🇹🇳",
            KnownCuisine::Croatian => "🇭🇷",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &[u8] = include_bytes!("../fixtures/recipes.json");
    const EMPTY: &[u8] = include_bytes!("../fixtures/recipes-empty.json");
    const MALFORMED: &[u8] = include_bytes!("../fixtures/recipes-malformed.json");

    #[test]
    fn test_decode_full_list() {
        let list = RecipeList::from_json(FULL).unwrap();
        assert!(!list.recipes.is_empty());

        let crumble = &list.recipes[0];
        assert_eq!(crumble.name, "Apple & Blackberry Crumble");
        assert_eq!(
            crumble.id,
            Uuid::parse_str("599344f4-3c5c-4cca-b914-2210e3b3312f").unwrap()
        );
        assert_eq!(crumble.cuisine, Cuisine::Known(KnownCuisine::British));
        assert!(crumble.source.is_some());
        assert!(crumble.photo(PhotoSize::Large).unwrap().path().ends_with("large.jpg"));
    }

    #[test]
    fn test_missing_links_decode_as_none() {
        let list = RecipeList::from_json(FULL).unwrap();
        let tart = list
            .recipes
            .iter()
            .find(|r| r.name == "Apple Frangipan Tart")
            .unwrap();
        assert!(tart.source.is_none());
        assert!(tart.youtube.is_some());
    }

    #[test]
    fn test_decode_empty_list() {
        let list = RecipeList::from_json(EMPTY).unwrap();
        assert!(list.recipes.is_empty());
    }

    #[test]
    fn test_decode_malformed_list_fails() {
        assert!(matches!(
            RecipeList::from_json(MALFORMED),
            Err(RecipeError::Decode(_))
        ));
    }

    #[test]
    fn test_unknown_cuisine_is_kept_verbatim() {
        let list = RecipeList::from_json(FULL).unwrap();
        let cheesecake = list
            .recipes
            .iter()
            .find(|r| r.name == "Honey Yogurt Cheesecake")
            .unwrap();

        assert_eq!(cheesecake.cuisine, Cuisine::Unknown("Greek".to_string()));
        assert_eq!(cheesecake.cuisine.flag(), None);
        assert_eq!(cheesecake.cuisine.text(), "Greek");
    }

    #[test]
    fn test_known_cuisine_text_has_flag() {
        let cuisine = Cuisine::from_demonym("Malaysian");
        assert_eq!(cuisine.text(), "🇲🇾 Malaysian");
        assert_eq!(cuisine.demonym(), "Malaysian");
    }

    #[test]
    fn test_demonym_lookup_is_case_sensitive() {
        assert_eq!(KnownCuisine::from_demonym("French"), Some(KnownCuisine::French));
        assert_eq!(KnownCuisine::from_demonym("french"), None);
    }

    #[test]
    fn test_cuisine_encodes_as_demonym() {
        let json = serde_json::to_string(&Cuisine::Known(KnownCuisine::Croatian)).unwrap();
        assert_eq!(json, "\"Croatian\"");

        let json = serde_json::to_string(&Cuisine::Unknown("Thai".into())).unwrap();
        assert_eq!(json, "\"Thai\"");
    }

    #[test]
    fn test_reencoded_list_keeps_wire_names() {
        let list = RecipeList::from_json(FULL).unwrap();
        let value = serde_json::to_value(&list).unwrap();
        let first = &value["recipes"][0];

        assert!(first.get("uuid").is_some());
        assert!(first.get("photo_url_small").is_some());
        assert!(first.get("id").is_none());
    }
}
