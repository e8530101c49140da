//! Catalog Model - menu items, categories and option types
//!
//! Read-only reference data. Option types play the role of product
//! attributes: single-choice types (spice level, sweetness) allow one value,
//! multi-choice types (addons) allow a non-empty set with a designated
//! "no addon" default value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub display_order: i32,
}

/// 选择模式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// At most one value (spice level, sweetness)
    Single,
    /// Non-empty set; the default value means "no addon"
    Multi,
}

/// Option value (embedded in OptionType)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionValue {
    pub value_id: i64,
    pub name: String,
    /// Price delta added to the base price (may be zero)
    #[serde(default)]
    pub additional_price: Decimal,
    /// Single: preselected value. Multi: the exclusive "no addon" value.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Option type entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionType {
    pub option_type_id: i64,
    pub name: String,
    pub mode: SelectionMode,
    /// Single-choice types only: a value must be chosen
    #[serde(default)]
    pub required: bool,
    pub values: Vec<OptionValue>,
}

impl OptionType {
    /// Values a customer can currently pick
    pub fn candidates(&self) -> impl Iterator<Item = &OptionValue> {
        self.values.iter().filter(|v| v.is_active)
    }

    pub fn default_value(&self) -> Option<&OptionValue> {
        self.candidates().find(|v| v.is_default)
    }

    pub fn value(&self, value_id: i64) -> Option<&OptionValue> {
        self.values.iter().find(|v| v.value_id == value_id)
    }
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub item_id: i64,
    pub category_id: i64,
    pub name: String,
    pub base_price: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Option types that apply to this item, in display order
    #[serde(default)]
    pub option_type_ids: Vec<i64>,
}

/// Whole catalog snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
    pub option_types: Vec<OptionType>,
}

impl Catalog {
    pub fn item(&self, item_id: i64) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    pub fn item_mut(&mut self, item_id: i64) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|i| i.item_id == item_id)
    }

    pub fn option_type(&self, option_type_id: i64) -> Option<&OptionType> {
        self.option_types
            .iter()
            .find(|t| t.option_type_id == option_type_id)
    }

    /// Option types the item declares, skipping dangling references
    pub fn option_types_for<'a>(
        &'a self,
        item: &'a MenuItem,
    ) -> impl Iterator<Item = &'a OptionType> + 'a {
        item.option_type_ids
            .iter()
            .filter_map(|id| self.option_type(*id))
    }

    /// Find the option type owning `value_id` among those applicable to `item`
    pub fn applicable_value<'a>(
        &'a self,
        item: &'a MenuItem,
        value_id: i64,
    ) -> Option<(&'a OptionType, &'a OptionValue)> {
        self.option_types_for(item)
            .find_map(|t| t.value(value_id).map(|v| (t, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog {
            categories: vec![Category {
                category_id: 1,
                name: "ข้าว".into(),
                display_order: 0,
            }],
            items: vec![MenuItem {
                item_id: 10,
                category_id: 1,
                name: "ข้าวผัด".into(),
                base_price: Decimal::new(60, 0),
                is_available: true,
                option_type_ids: vec![100, 999],
            }],
            option_types: vec![OptionType {
                option_type_id: 100,
                name: "เพิ่ม".into(),
                mode: SelectionMode::Multi,
                required: false,
                values: vec![
                    OptionValue {
                        value_id: 1,
                        name: "ไม่เพิ่ม".into(),
                        additional_price: Decimal::ZERO,
                        is_default: true,
                        is_active: true,
                    },
                    OptionValue {
                        value_id: 2,
                        name: "ไข่".into(),
                        additional_price: Decimal::new(10, 0),
                        is_default: false,
                        is_active: true,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_lookup_skips_dangling_option_types() {
        let catalog = sample();
        let item = catalog.item(10).unwrap();
        assert_eq!(catalog.option_types_for(item).count(), 1);
    }

    #[test]
    fn test_applicable_value() {
        let catalog = sample();
        let item = catalog.item(10).unwrap();
        let (t, v) = catalog.applicable_value(item, 2).unwrap();
        assert_eq!(t.option_type_id, 100);
        assert_eq!(v.name, "ไข่");
        assert!(catalog.applicable_value(item, 3).is_none());
        assert_eq!(t.default_value().unwrap().value_id, 1);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"item_id":1,"category_id":1,"name":"ชาไทย","base_price":"35"}"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.is_available);
        assert!(item.option_type_ids.is_empty());
        assert_eq!(item.base_price, Decimal::new(35, 0));
    }
}
