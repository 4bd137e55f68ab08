//! Fair-price lens over the catalog
//!
//! Cost-per-wear analysis of the active wardrobe: total invested value,
//! a per-garment value ranking, and the "hot item" badge for pieces that
//! have already earned their price tag.

use serde::Serialize;
use uuid::Uuid;
use wardrobe_common::garment::{CatalogView, GarmentRecord};

/// A garment qualifies as hot below this cost per wear...
pub const HOT_ITEM_MAX_COST_PER_WEAR: f64 = 50.0;
/// ...provided it has been worn more than this many times.
pub const HOT_ITEM_MIN_WEAR_COUNT: i64 = 5;

/// Value summary for one garment
#[derive(Debug, Clone, Serialize)]
pub struct GarmentValue {
    pub id: Uuid,
    pub name: String,
    pub cost_per_wear: f64,
    pub is_hot: bool,
}

/// Aggregate value view of the active wardrobe
#[derive(Debug, Clone, Serialize)]
pub struct CatalogInsights {
    pub active_count: usize,
    pub total_value: f64,
    /// Lowest cost per wear among rankable garments
    pub best_value: Option<GarmentValue>,
    /// Rankable garments, cheapest wear first
    pub ranking: Vec<GarmentValue>,
}

/// Compute insights over a full garment list. Only active wardrobe pieces
/// count; wishlist entries and binned items are excluded. Garments without
/// a price or without any wears have no cost per wear and stay out of the
/// ranking, though their count and price still contribute to the totals.
pub fn compute_insights(garments: &[GarmentRecord]) -> CatalogInsights {
    let active: Vec<&GarmentRecord> = garments
        .iter()
        .filter(|g| CatalogView::Wardrobe.contains(g))
        .collect();

    let total_value = active.iter().map(|g| g.price).sum();

    let mut ranking: Vec<GarmentValue> = active
        .iter()
        .filter_map(|g| {
            let cost_per_wear = g.cost_per_wear()?;
            Some(GarmentValue {
                id: g.id,
                name: g.name.clone(),
                cost_per_wear,
                is_hot: cost_per_wear < HOT_ITEM_MAX_COST_PER_WEAR
                    && g.wear_count > HOT_ITEM_MIN_WEAR_COUNT,
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        a.cost_per_wear
            .partial_cmp(&b.cost_per_wear)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    CatalogInsights {
        active_count: active.len(),
        total_value,
        best_value: ranking.first().cloned(),
        ranking,
    }
}
