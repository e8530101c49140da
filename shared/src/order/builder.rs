//! Order Builder
//!
//! Turns (menu item, quantity, option values, note) into a [`LineItemDraft`].
//!
//! Selection rules:
//! - single-choice types hold at most one value; selecting replaces
//! - multi-choice types hold a non-empty set; the default value ("no addon")
//!   is exclusive with every other value and comes back when the set empties

use super::ledger::validate_quantity;
use super::types::{LineItemDraft, OrderSelection};
use crate::error::{PosError, PosResult, Resource};
use crate::models::{Catalog, CustomerRequest, MenuItem, OptionType, OptionValue, SelectionMode};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

const ADDON_JOINER: &str = ", ";

#[derive(Debug, Clone)]
pub struct OrderBuilder<'a> {
    catalog: &'a Catalog,
    item: &'a MenuItem,
    quantity: i32,
    note: Option<String>,
    /// option_type_id -> chosen value ids
    chosen: BTreeMap<i64, BTreeSet<i64>>,
}

impl<'a> OrderBuilder<'a> {
    pub fn new(catalog: &'a Catalog, item_id: i64) -> PosResult<Self> {
        let item = catalog
            .item(item_id)
            .ok_or_else(|| PosError::not_found(Resource::MenuItem, item_id))?;
        ensure_available(item)?;

        let mut chosen = BTreeMap::new();
        for option_type in catalog.option_types_for(item) {
            let mut set = BTreeSet::new();
            if let Some(default) = option_type.default_value() {
                set.insert(default.value_id);
            }
            chosen.insert(option_type.option_type_id, set);
        }

        Ok(Self {
            catalog,
            item,
            quantity: 1,
            note: None,
            chosen,
        })
    }

    /// Build straight from a submitted selection
    pub fn from_selection(catalog: &'a Catalog, selection: &OrderSelection) -> PosResult<LineItemDraft> {
        let mut builder = Self::new(catalog, selection.item_id)?;
        for value_id in &selection.option_value_ids {
            builder.select(*value_id)?;
        }
        builder.set_quantity(selection.quantity);
        builder.set_note(selection.note.clone());
        builder.build()
    }

    pub fn menu_item(&self) -> &MenuItem {
        self.item
    }

    fn lookup(&self, value_id: i64) -> PosResult<(&'a OptionType, &'a OptionValue)> {
        match self.catalog.applicable_value(self.item, value_id) {
            Some((t, v)) if v.is_active => Ok((t, v)),
            _ => Err(PosError::OptionNotApplicable {
                item_id: self.item.item_id,
                value_id,
            }),
        }
    }

    pub fn is_selected(&self, value_id: i64) -> bool {
        self.chosen.values().any(|set| set.contains(&value_id))
    }

    pub fn select(&mut self, value_id: i64) -> PosResult<()> {
        let (option_type, value) = self.lookup(value_id)?;
        let set = self.chosen.entry(option_type.option_type_id).or_default();
        match option_type.mode {
            SelectionMode::Single => {
                set.clear();
                set.insert(value_id);
            }
            SelectionMode::Multi if value.is_default => {
                set.clear();
                set.insert(value_id);
            }
            SelectionMode::Multi => {
                set.retain(|id| option_type.value(*id).is_none_or(|v| !v.is_default));
                set.insert(value_id);
            }
        }
        Ok(())
    }

    pub fn deselect(&mut self, value_id: i64) -> PosResult<()> {
        let (option_type, _) = self.lookup(value_id)?;
        let set = self.chosen.entry(option_type.option_type_id).or_default();
        set.remove(&value_id);
        if option_type.mode == SelectionMode::Multi && set.is_empty() {
            if let Some(default) = option_type.default_value() {
                set.insert(default.value_id);
            }
        }
        Ok(())
    }

    pub fn toggle(&mut self, value_id: i64) -> PosResult<()> {
        if self.is_selected(value_id) {
            self.deselect(value_id)
        } else {
            self.select(value_id)
        }
    }

    pub fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }

    /// Chosen values per applicable option type, in catalog order
    fn selected(&self) -> Vec<(&'a OptionType, Vec<&'a OptionValue>)> {
        self.catalog
            .option_types_for(self.item)
            .map(|t| {
                let set = self.chosen.get(&t.option_type_id);
                let values = t
                    .candidates()
                    .filter(|v| set.is_some_and(|s| s.contains(&v.value_id)))
                    .collect();
                (t, values)
            })
            .collect()
    }

    /// `base_price + Σ additional_price`
    pub fn unit_price(&self) -> Decimal {
        self.selected()
            .iter()
            .flat_map(|(_, values)| values.iter())
            .fold(self.item.base_price, |acc, v| acc + v.additional_price)
    }

    pub fn customer_request(&self) -> CustomerRequest {
        let mut primary = Vec::new();
        let mut addon = Vec::new();
        for (option_type, values) in self.selected() {
            match option_type.mode {
                SelectionMode::Single => primary.extend(values.into_iter().map(|v| v.name.as_str())),
                SelectionMode::Multi => addon.extend(
                    values
                        .into_iter()
                        .filter(|v| !v.is_default)
                        .map(|v| v.name.as_str()),
                ),
            }
        }
        if let Some(note) = &self.note {
            addon.push(note.as_str());
        }
        CustomerRequest::new(
            Some(primary.join(ADDON_JOINER)),
            Some(addon.join(ADDON_JOINER)),
        )
    }

    pub fn build(&self) -> PosResult<LineItemDraft> {
        validate_quantity(self.quantity)?;
        // availability may have been toggled since the builder was opened
        let current = self
            .catalog
            .item(self.item.item_id)
            .ok_or_else(|| PosError::not_found(Resource::MenuItem, self.item.item_id))?;
        ensure_available(current)?;

        let mut option_value_ids = Vec::new();
        for (option_type, values) in self.selected() {
            match option_type.mode {
                SelectionMode::Single if option_type.required && values.is_empty() => {
                    return Err(PosError::OptionRequired {
                        option_type: option_type.name.clone(),
                    });
                }
                SelectionMode::Multi if values.is_empty() => {
                    // nothing chosen on submit: fall back to "no addon"
                    option_value_ids.extend(option_type.default_value().map(|v| v.value_id));
                }
                _ => option_value_ids.extend(values.iter().map(|v| v.value_id)),
            }
        }

        Ok(LineItemDraft {
            item_id: self.item.item_id,
            menu_name: self.item.name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price(),
            customer_request: self.customer_request(),
            option_value_ids,
        })
    }
}

fn ensure_available(item: &MenuItem) -> PosResult<()> {
    if item.is_available {
        Ok(())
    } else {
        Err(PosError::CatalogUnavailable {
            item_id: item.item_id,
            name: item.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    const NO_ADDON: i64 = 11;
    const EGG: i64 = 12;
    const VEG: i64 = 13;
    const MILD: i64 = 21;
    const HOT: i64 = 22;

    fn value(value_id: i64, name: &str, price: i64, is_default: bool) -> OptionValue {
        OptionValue {
            value_id,
            name: name.into(),
            additional_price: Decimal::new(price, 0),
            is_default,
            is_active: true,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            categories: vec![Category {
                category_id: 1,
                name: "อาหารจานเดียว".into(),
                display_order: 0,
            }],
            items: vec![
                MenuItem {
                    item_id: 1,
                    category_id: 1,
                    name: "กะเพราหมู".into(),
                    base_price: Decimal::new(60, 0),
                    is_available: true,
                    option_type_ids: vec![2, 1],
                },
                MenuItem {
                    item_id: 2,
                    category_id: 1,
                    name: "ต้มยำกุ้ง".into(),
                    base_price: Decimal::new(120, 0),
                    is_available: false,
                    option_type_ids: vec![],
                },
                MenuItem {
                    item_id: 3,
                    category_id: 1,
                    name: "ส้มตำ".into(),
                    base_price: Decimal::new(50, 0),
                    is_available: true,
                    option_type_ids: vec![3],
                },
            ],
            option_types: vec![
                OptionType {
                    option_type_id: 1,
                    name: "เพิ่ม".into(),
                    mode: SelectionMode::Multi,
                    required: false,
                    values: vec![
                        value(NO_ADDON, "ไม่เพิ่ม", 0, true),
                        value(EGG, "ไข่", 10, false),
                        value(VEG, "ผัก", 5, false),
                    ],
                },
                OptionType {
                    option_type_id: 2,
                    name: "ความเผ็ด".into(),
                    mode: SelectionMode::Single,
                    required: true,
                    values: vec![value(MILD, "เผ็ดน้อย", 0, true), value(HOT, "เผ็ดมาก", 0, false)],
                },
                OptionType {
                    option_type_id: 3,
                    name: "ความหวาน".into(),
                    mode: SelectionMode::Single,
                    required: true,
                    values: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_addon_toggle_keeps_set_non_empty() {
        let catalog = catalog();
        let mut builder = OrderBuilder::new(&catalog, 1).unwrap();
        assert!(builder.is_selected(NO_ADDON));

        builder.toggle(EGG).unwrap();
        assert!(builder.is_selected(EGG));
        assert!(!builder.is_selected(NO_ADDON));

        builder.toggle(EGG).unwrap();
        assert!(!builder.is_selected(EGG));
        assert!(builder.is_selected(NO_ADDON));

        builder.select(EGG).unwrap();
        builder.select(VEG).unwrap();
        builder.select(NO_ADDON).unwrap();
        assert!(builder.is_selected(NO_ADDON));
        assert!(!builder.is_selected(EGG));
        assert!(!builder.is_selected(VEG));
    }

    #[test]
    fn test_price_and_request() {
        let catalog = catalog();
        let mut builder = OrderBuilder::new(&catalog, 1).unwrap();
        builder.select(HOT).unwrap();
        builder.select(EGG).unwrap();
        builder.select(VEG).unwrap();
        builder.set_note(Some("ไม่ใส่ผงชูรส".into()));
        builder.set_quantity(2);

        let draft = builder.build().unwrap();
        assert_eq!(draft.unit_price, Decimal::new(75, 0));
        assert_eq!(draft.quantity, 2);
        assert_eq!(
            draft.customer_request.to_string(),
            "เผ็ดมาก | ไข่, ผัก, ไม่ใส่ผงชูรส"
        );
        assert_eq!(draft.option_value_ids, vec![HOT, EGG, VEG]);
    }

    #[test]
    fn test_single_segment_request_has_no_separator() {
        let catalog = catalog();
        let draft = OrderBuilder::new(&catalog, 1).unwrap().build().unwrap();
        // default spice, no addon, no note
        assert_eq!(draft.customer_request.to_string(), "เผ็ดน้อย");
        assert_eq!(draft.unit_price, Decimal::new(60, 0));
    }

    #[test]
    fn test_single_choice_replaces() {
        let catalog = catalog();
        let mut builder = OrderBuilder::new(&catalog, 1).unwrap();
        builder.select(HOT).unwrap();
        assert!(builder.is_selected(HOT));
        assert!(!builder.is_selected(MILD));
    }

    #[test]
    fn test_required_single_choice_left_empty() {
        let catalog = catalog();
        let mut builder = OrderBuilder::new(&catalog, 1).unwrap();
        builder.deselect(MILD).unwrap();
        assert!(matches!(builder.build(), Err(PosError::OptionRequired { .. })));
    }

    #[test]
    fn test_required_type_without_candidates() {
        let catalog = catalog();
        let builder = OrderBuilder::new(&catalog, 3).unwrap();
        assert!(matches!(builder.build(), Err(PosError::OptionRequired { .. })));
    }

    #[test]
    fn test_rejects_bad_input() {
        let catalog = catalog();
        assert!(matches!(
            OrderBuilder::new(&catalog, 2),
            Err(PosError::CatalogUnavailable { item_id: 2, .. })
        ));
        assert!(matches!(
            OrderBuilder::new(&catalog, 99),
            Err(PosError::NotFound { .. })
        ));

        let mut builder = OrderBuilder::new(&catalog, 1).unwrap();
        builder.set_quantity(0);
        assert!(matches!(builder.build(), Err(PosError::InvalidQuantity(0))));

        let mut builder = OrderBuilder::new(&catalog, 3).unwrap();
        assert!(matches!(
            builder.select(EGG),
            Err(PosError::OptionNotApplicable { item_id: 3, value_id: EGG })
        ));
    }

    #[test]
    fn test_from_selection() {
        let catalog = catalog();
        let draft = OrderBuilder::from_selection(
            &catalog,
            &OrderSelection {
                item_id: 1,
                quantity: 3,
                option_value_ids: vec![EGG],
                note: Some("  ".into()),
            },
        )
        .unwrap();
        assert_eq!(draft.unit_price, Decimal::new(70, 0));
        assert_eq!(draft.customer_request.to_string(), "เผ็ดน้อย | ไข่");
    }
}
