//! # Catalog Normalization
//!
//! Turns raw catalog rows from the external source into the normalized,
//! active-only, sorted lookup table the ledger computes bills from.
//!
//! ## Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Catalog Normalization Pipeline                     │
//! │                                                                     │
//! │  raw rows ──► map (trim names/units, sanitize prices,               │
//! │               infer categories from the legacy name shim)           │
//! │           ──► keep active only                                      │
//! │           ──► empty? fall back to the built-in defaults             │
//! │           ──► ensure exactly one Time item (inject at front,        │
//! │               renumber 0..n-1)                                      │
//! │           ──► sort by display_order, then name                      │
//! │                                                                     │
//! │  The Time item is load-bearing: the usage panel always offers room  │
//! │  time, so a catalog without one is treated as corrupt and repaired. │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Catalog rows are owned by the external layer; this module never talks to
//! it, it only repairs whatever list it is handed.

use crate::money::Won;
use crate::types::{CatalogItem, Category, RawCatalogRow};

// =============================================================================
// Built-in Defaults
// =============================================================================

/// Fallback item name for blank rows.
const FALLBACK_ITEM_NAME: &str = "품목";

/// Fallback billing unit for countable items.
const FALLBACK_UNIT: &str = "개";

/// Billing unit for room time.
const TIME_UNIT: &str = "시간";

/// The built-in catalog used when the external source has nothing usable.
///
/// Prices mirror the venue's long-standing defaults: an hour of room time
/// at 30,000, drinks and beer at 5,000, soju at 10,000.
pub fn default_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem {
            id: "default-time".into(),
            name: "시간".into(),
            unit: TIME_UNIT.into(),
            price: 30_000,
            category: Category::Time,
            display_order: 0,
            is_active: true,
        },
        CatalogItem {
            id: "default-drink".into(),
            name: "음료".into(),
            unit: FALLBACK_UNIT.into(),
            price: 5_000,
            category: Category::Drink,
            display_order: 1,
            is_active: true,
        },
        CatalogItem {
            id: "default-soju".into(),
            name: "소주".into(),
            unit: FALLBACK_UNIT.into(),
            price: 10_000,
            category: Category::Soju,
            display_order: 2,
            is_active: true,
        },
        CatalogItem {
            id: "default-beer".into(),
            name: "맥주".into(),
            unit: FALLBACK_UNIT.into(),
            price: 5_000,
            category: Category::Beer,
            display_order: 3,
            is_active: true,
        },
    ]
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Maps one raw row into a catalog item, coercing every field.
///
/// ## Coercions
/// - blank name → `품목`, blank unit → `개`
/// - price: non-finite → 0, negative → 0, fractional → floored
/// - category: explicit field when present, else the legacy name shim
/// - display_order: missing or negative → 0
fn map_row(row: RawCatalogRow) -> CatalogItem {
    let name = {
        let trimmed = row.name.trim();
        if trimmed.is_empty() {
            FALLBACK_ITEM_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    };
    let unit = match row.unit.as_deref().map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => FALLBACK_UNIT.to_string(),
    };
    let category = match row.category.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Category::infer(raw),
        _ => Category::infer(&name),
    };

    CatalogItem {
        id: row.id,
        name,
        unit,
        price: Won::sanitize(row.default_unit_price).amount(),
        category,
        display_order: row.display_order.unwrap_or(0).max(0),
        is_active: row.is_active,
    }
}

// =============================================================================
// Time-Item Guarantee
// =============================================================================

/// True when the list already offers room time.
fn has_time_item(items: &[CatalogItem]) -> bool {
    items.iter().any(|item| item.category == Category::Time)
}

/// Guarantees exactly one leading Time item.
///
/// When room time is missing, the built-in Time default is injected at the
/// front and every item is renumbered 0..n-1 so the panel order stays dense.
/// Lists that already carry a Time item pass through untouched.
fn ensure_time_item(mut items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    if has_time_item(&items) {
        return items;
    }
    items.insert(0, default_catalog().remove(0));
    for (index, item) in items.iter_mut().enumerate() {
        item.display_order = index as i64;
    }
    items
}

/// Panel ordering: display_order first, then name.
///
/// Name comparison is plain code-point order, which matches locale order
/// for Hangul.
fn sort_items(mut items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    items.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    items
}

// =============================================================================
// Public API
// =============================================================================

/// Normalizes a raw catalog load into the table the ledger prices from.
///
/// ## Guarantees
/// - only active items survive
/// - an empty or all-inactive load falls back to the built-in defaults
/// - a Time item is always present (injected at the front when missing)
/// - ordering is display_order, then name
pub fn normalize_catalog(rows: Vec<RawCatalogRow>) -> Vec<CatalogItem> {
    let items: Vec<CatalogItem> = rows
        .into_iter()
        .map(map_row)
        .filter(|item| item.is_active)
        .collect();

    if items.is_empty() {
        return default_catalog();
    }

    sort_items(ensure_time_item(items))
}

/// Re-normalizes an edited catalog before it is handed back to the external
/// store.
///
/// ## Behavior
/// - a Time item is ensured, then everything is renumbered to its index
/// - blank names become `품목 N`
/// - units are auto-derived from the category (Time → 시간, else 개)
/// - prices are clamped ≥ 0, `is_active` is forced on
/// - an empty edit still yields a usable list (the injected Time item)
///
/// Running the function twice yields the same list, so the save path can
/// round-trip through it freely.
pub fn sanitize_catalog(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    ensure_time_item(items)
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let trimmed = item.name.trim();
            let name = if trimmed.is_empty() {
                format!("{} {}", FALLBACK_ITEM_NAME, index + 1)
            } else {
                trimmed.to_string()
            };
            CatalogItem {
                id: item.id,
                name,
                unit: auto_unit(item.category).to_string(),
                price: Won::clamp_non_negative(item.price).amount(),
                category: item.category,
                display_order: index as i64,
                is_active: true,
            }
        })
        .collect()
}

/// Billing unit implied by a category.
pub const fn auto_unit(category: Category) -> &'static str {
    match category {
        Category::Time => TIME_UNIT,
        _ => FALLBACK_UNIT,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str, category: Option<&str>, price: f64, active: bool) -> RawCatalogRow {
        RawCatalogRow {
            id: id.into(),
            category: category.map(Into::into),
            name: name.into(),
            unit: None,
            default_unit_price: price,
            display_order: Some(0),
            is_active: active,
        }
    }

    #[test]
    fn test_empty_load_falls_back_to_defaults() {
        let items = normalize_catalog(vec![]);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].category, Category::Time);
        assert_eq!(items[0].price, 30_000);
    }

    #[test]
    fn test_inactive_rows_are_dropped() {
        let rows = vec![
            raw("a", "시간", Some("time"), 30_000.0, true),
            raw("b", "맥주", Some("beer"), 5_000.0, false),
        ];
        let items = normalize_catalog(rows);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn test_all_inactive_falls_back_to_defaults() {
        let rows = vec![raw("a", "시간", Some("time"), 30_000.0, false)];
        let items = normalize_catalog(rows);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].id, "default-time");
    }

    #[test]
    fn test_missing_time_item_injected_at_front_and_renumbered() {
        let rows = vec![
            raw("b", "맥주", Some("beer"), 5_000.0, true),
            raw("s", "소주", Some("soju"), 10_000.0, true),
        ];
        let items = normalize_catalog(rows);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].category, Category::Time);
        let time_count = items
            .iter()
            .filter(|i| i.category == Category::Time)
            .count();
        assert_eq!(time_count, 1);
        for (index, item) in items.iter().enumerate() {
            assert_eq!(item.display_order, index as i64);
        }
    }

    #[test]
    fn test_category_inferred_from_name_when_field_missing() {
        let rows = vec![
            raw("t", "추가 시간", None, 15_000.0, true),
            raw("x", "마른안주", None, 8_000.0, true),
        ];
        let items = normalize_catalog(rows);
        let time = items.iter().find(|i| i.id == "t").unwrap();
        let etc = items.iter().find(|i| i.id == "x").unwrap();
        assert_eq!(time.category, Category::Time);
        assert_eq!(etc.category, Category::Etc);
    }

    #[test]
    fn test_price_coercion() {
        let rows = vec![
            raw("t", "시간", Some("time"), f64::NAN, true),
            raw("b", "맥주", Some("beer"), -100.0, true),
            raw("s", "소주", Some("soju"), 9_999.9, true),
        ];
        let items = normalize_catalog(rows);
        let by_id = |id: &str| items.iter().find(|i| i.id == id).unwrap();
        assert_eq!(by_id("t").price, 0);
        assert_eq!(by_id("b").price, 0);
        assert_eq!(by_id("s").price, 9_999);
    }

    #[test]
    fn test_sort_by_display_order_then_name() {
        let mut rows = vec![
            raw("t", "시간", Some("time"), 30_000.0, true),
            raw("b", "맥주", Some("beer"), 5_000.0, true),
            raw("d", "음료", Some("drink"), 5_000.0, true),
        ];
        rows[0].display_order = Some(0);
        rows[1].display_order = Some(1);
        rows[2].display_order = Some(1);
        let items = normalize_catalog(rows);
        assert_eq!(items[0].id, "t");
        // Tied order falls back to name: 맥주 sorts before 음료.
        assert_eq!(items[1].id, "b");
        assert_eq!(items[2].id, "d");
    }

    #[test]
    fn test_blank_name_and_unit_fallbacks() {
        let rows = vec![raw("x", "   ", Some("beer"), 5_000.0, true)];
        let items = normalize_catalog(rows);
        let item = items.iter().find(|i| i.id == "x").unwrap();
        assert_eq!(item.name, "품목");
        assert_eq!(item.unit, "개");
    }

    #[test]
    fn test_sanitize_renumbers_and_derives_units() {
        let mut items = default_catalog();
        items[1].name = "  생맥주  ".into();
        items[1].price = -500;
        items[2].display_order = 99;

        let sanitized = sanitize_catalog(items);
        assert_eq!(sanitized[1].name, "생맥주");
        assert_eq!(sanitized[1].price, 0);
        assert_eq!(sanitized[0].unit, "시간");
        assert_eq!(sanitized[1].unit, "개");
        for (index, item) in sanitized.iter().enumerate() {
            assert_eq!(item.display_order, index as i64);
            assert!(item.is_active);
        }
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_catalog(default_catalog());
        let twice = sanitize_catalog(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sanitize_empty_yields_the_time_item() {
        // Even an empty edit keeps the panel usable: ensure_time_item injects
        // the Time default, so the result is never itemless.
        let sanitized = sanitize_catalog(vec![]);
        assert!(!sanitized.is_empty());
        assert_eq!(sanitized[0].category, Category::Time);
    }
}
