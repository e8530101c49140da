//! 内置演示菜单 (泰式小馆)

use rust_decimal::Decimal;
use shared::models::{Catalog, Category, MenuItem, OptionType, OptionValue, SelectionMode};

/// Option type ids
pub const SPICE: i64 = 1;
pub const ADDON: i64 = 2;
pub const SWEETNESS: i64 = 3;

fn value(value_id: i64, name: &str, price: i64, is_default: bool) -> OptionValue {
    OptionValue {
        value_id,
        name: name.to_string(),
        additional_price: Decimal::new(price, 0),
        is_default,
        is_active: true,
    }
}

fn item(item_id: i64, category_id: i64, name: &str, price: i64, options: &[i64]) -> MenuItem {
    MenuItem {
        item_id,
        category_id,
        name: name.to_string(),
        base_price: Decimal::new(price, 0),
        is_available: true,
        option_type_ids: options.to_vec(),
    }
}

pub fn demo_catalog() -> Catalog {
    Catalog {
        categories: vec![
            Category {
                category_id: 1,
                name: "อาหารจานเดียว".into(),
                display_order: 1,
            },
            Category {
                category_id: 2,
                name: "ต้ม / แกง".into(),
                display_order: 2,
            },
            Category {
                category_id: 3,
                name: "เครื่องดื่ม".into(),
                display_order: 3,
            },
        ],
        items: vec![
            item(101, 1, "ข้าวผัด", 60, &[SPICE, ADDON]),
            item(102, 1, "ผัดกะเพรา", 65, &[SPICE, ADDON]),
            item(103, 1, "ผัดไทย", 70, &[ADDON]),
            item(201, 2, "ต้มยำกุ้ง", 150, &[SPICE]),
            item(202, 2, "แกงเขียวหวาน", 120, &[SPICE]),
            item(301, 3, "ชาไทย", 35, &[SWEETNESS]),
            item(302, 3, "น้ำเปล่า", 15, &[]),
        ],
        option_types: vec![
            OptionType {
                option_type_id: SPICE,
                name: "ความเผ็ด".into(),
                mode: SelectionMode::Single,
                required: true,
                values: vec![
                    value(11, "ไม่เผ็ด", 0, false),
                    value(12, "เผ็ดน้อย", 0, true),
                    value(13, "เผ็ดมาก", 0, false),
                ],
            },
            OptionType {
                option_type_id: ADDON,
                name: "เพิ่ม".into(),
                mode: SelectionMode::Multi,
                required: false,
                values: vec![
                    value(21, "ไม่เพิ่ม", 0, true),
                    value(22, "ไข่", 10, false),
                    value(23, "ผัก", 5, false),
                ],
            },
            OptionType {
                option_type_id: SWEETNESS,
                name: "ความหวาน".into(),
                mode: SelectionMode::Single,
                required: false,
                values: vec![
                    value(31, "หวานน้อย", 0, false),
                    value(32, "หวานปกติ", 0, true),
                ],
            },
        ],
    }
}
