use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::Deserialize;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ItemError {
    #[error("Item list is empty, at least one item is required")]
    Empty,
    #[error("Duplicate item id {0}")]
    DuplicateId(u32),
    #[error("Invalid color token '{0}', expected #rrggbb")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Display, Deref, From, Into, AsRef)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Display, Deref, From, Into, AsRef)]
#[serde(transparent)]
pub struct ItemLink(String);

crate::impl_string_newtype!(ItemLink);

/// A `#rrggbb` color token, validated when parsed.
#[derive(Debug, Clone, PartialEq, Deserialize, Display)]
#[serde(try_from = "String")]
#[display("{raw}")]
pub struct ColorToken {
    raw: String,
    rgb: Srgb<u8>,
}

impl ColorToken {
    pub fn rgb(&self) -> Srgb<f64> {
        self.rgb.into_format()
    }
}

impl FromStr for ColorToken {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // palette accepts 3-digit shorthand too, tokens are always full hex
        if trimmed.trim_start_matches('#').len() != 6 {
            return Err(ItemError::InvalidColor(s.to_string()));
        }
        let rgb = Srgb::<u8>::from_str(trimmed)
            .map_err(|_| ItemError::InvalidColor(s.to_string()))?;
        Ok(Self {
            raw: trimmed.to_string(),
            rgb,
        })
    }
}

impl TryFrom<String> for ColorToken {
    type Error = ItemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    pub id: u32,
    pub title: Label,
    pub subtitle: Label,
    pub color: ColorToken,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<ItemLink>,
}

/// The ordered, non-empty set of ring items. Order defines angular position.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemList {
    items: Vec<Item>,
}

impl ItemList {
    pub fn new(items: Vec<Item>) -> Result<Self, ItemError> {
        if items.is_empty() {
            return Err(ItemError::Empty);
        }

        let mut seen = HashSet::with_capacity(items.len());
        if let Some(dup) = items.iter().find(|item| !seen.insert(item.id)) {
            return Err(ItemError::DuplicateId(dup.id));
        }

        Ok(Self { items })
    }

    /// Never zero.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn count(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.items.len()).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Degrees between neighbouring items.
    pub fn angle_step(&self) -> f64 {
        360.0 / self.items.len() as f64
    }

    /// Ring angle of item `index` in degrees, before rotation.
    pub fn angle(&self, index: usize) -> f64 {
        index as f64 * self.angle_step()
    }
}

#[cfg(test)]
pub(crate) fn sample_items(count: usize) -> ItemList {
    let items = (0..count)
        .map(|i| Item {
            id: i as u32 + 1,
            title: Label::new(format!("ITEM {}", i + 1)),
            subtitle: Label::new("Sub"),
            color: "#8b5cf6".parse().unwrap(),
            description: (i % 2 == 0).then(|| format!("Description {}", i + 1)),
            link: None,
        })
        .collect();
    ItemList::new(items).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_rejected() {
        assert_eq!(ItemList::new(Vec::new()), Err(ItemError::Empty));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut items: Vec<Item> = sample_items(3).iter().cloned().collect();
        items[2].id = items[0].id;
        assert_eq!(ItemList::new(items), Err(ItemError::DuplicateId(1)));
    }

    #[test]
    fn test_angles() {
        let list = sample_items(5);
        assert_eq!(list.angle_step(), 72.0);
        assert_eq!(list.angle(0), 0.0);
        assert_eq!(list.angle(3), 216.0);
    }

    #[test]
    fn test_color_token() {
        let token: ColorToken = "#a78bfa".parse().unwrap();
        assert_eq!(token.to_string(), "#a78bfa");
        let rgb = token.rgb();
        assert!((rgb.red - 167.0 / 255.0).abs() < 1e-9);

        assert!("#abc".parse::<ColorToken>().is_err());
        assert!("purple".parse::<ColorToken>().is_err());
    }

    #[test]
    fn test_item_deserialization() {
        let json = r##"{
            "id": 3,
            "title": "SOFT THREADS",
            "subtitle": "Creative",
            "color": "#c084fc",
            "description": "Flowing particle streams."
        }"##;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.title.as_str(), "SOFT THREADS");
        assert_eq!(item.description.as_deref(), Some("Flowing particle streams."));
        assert!(item.link.is_none());

        let bad = r##"{"id": 1, "title": "A", "subtitle": "B", "color": "violet"}"##;
        assert!(serde_json::from_str::<Item>(bad).is_err());
    }
}
