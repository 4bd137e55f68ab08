//! Garment record model and catalog partition rules
//!
//! One `GarmentRecord` is one physical clothing item. A record belongs to
//! exactly one of three catalog partitions at any time: active wardrobe,
//! wishlist, or recycle bin. The bin (`is_deleted`) takes precedence over the
//! wishlist flag when partitioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed garment category enumeration
///
/// Category strings returned by the remote detector are validated against
/// this enumeration at the client boundary; unknown values are rejected
/// there, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Shoes,
    Dresses,
    Accessories,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 6] = [
        Category::Tops,
        Category::Bottoms,
        Category::Outerwear,
        Category::Shoes,
        Category::Dresses,
        Category::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "Tops",
            Category::Bottoms => "Bottoms",
            Category::Outerwear => "Outerwear",
            Category::Shoes => "Shoes",
            Category::Dresses => "Dresses",
            Category::Accessories => "Accessories",
        }
    }

    /// Categories eligible for the composer's top slot
    pub fn is_top_eligible(&self) -> bool {
        matches!(self, Category::Tops | Category::Outerwear)
    }

    /// Categories eligible for the composer's bottom slot
    pub fn is_bottom_eligible(&self) -> bool {
        matches!(self, Category::Bottoms | Category::Dresses)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tops" => Ok(Category::Tops),
            "Bottoms" => Ok(Category::Bottoms),
            "Outerwear" => Ok(Category::Outerwear),
            "Shoes" => Ok(Category::Shoes),
            "Dresses" => Ok(Category::Dresses),
            "Accessories" => Ok(Category::Accessories),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown garment category: {}",
                other
            ))),
        }
    }
}

/// Normalized bounding box from the detection step
///
/// Coordinates use a 0-1000 scale on both axes regardless of the source
/// image resolution. Retained on the record for provenance; not reused
/// after the crop is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Box2D {
    pub ymin: i64,
    pub xmin: i64,
    pub ymax: i64,
    pub xmax: i64,
}

impl Box2D {
    /// A box is well-formed when all edges are in [0, 1000] and it has
    /// positive extent on both axes.
    pub fn is_well_formed(&self) -> bool {
        let in_range =
            |v: i64| (0..=1000).contains(&v);
        in_range(self.ymin)
            && in_range(self.xmin)
            && in_range(self.ymax)
            && in_range(self.xmax)
            && self.ymax > self.ymin
            && self.xmax > self.xmin
    }
}

/// Catalog partition views over garment records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogView {
    /// Active wardrobe: not deleted, not wishlisted
    Wardrobe,
    /// Wishlist: not deleted, wishlisted
    Wishlist,
    /// Recycle bin: deleted (regardless of the wishlist flag)
    Bin,
}

impl CatalogView {
    /// Partition membership test. Bin takes precedence: a deleted record is
    /// in the bin even if its wishlist flag is still set.
    pub fn contains(&self, record: &GarmentRecord) -> bool {
        match self {
            CatalogView::Wardrobe => !record.is_deleted && !record.is_wishlist,
            CatalogView::Wishlist => !record.is_deleted && record.is_wishlist,
            CatalogView::Bin => record.is_deleted,
        }
    }
}

impl FromStr for CatalogView {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wardrobe" => Ok(CatalogView::Wardrobe),
            "wishlist" => Ok(CatalogView::Wishlist),
            "bin" => Ok(CatalogView::Bin),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown catalog view: {}",
                other
            ))),
        }
    }
}

/// One catalogued clothing item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarmentRecord {
    /// Unique identifier, assigned at detection time, immutable
    pub id: Uuid,
    /// Base64-encoded raster image (crop or regenerated product shot)
    pub image_data: String,
    pub category: Category,
    pub name: String,
    pub color: String,
    pub material: String,
    /// Purchase price, non-negative, user-entered (default 0)
    pub price: f64,
    /// Incremented only by the outfit-logging action
    pub wear_count: i64,
    pub created_at: DateTime<Utc>,
    /// Detection bounding box, kept for provenance
    pub box2d: Option<Box2D>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_wishlist: bool,
}

impl GarmentRecord {
    /// Cost-per-wear metric: `price / wear_count`.
    ///
    /// Only defined when both price and wear count are positive. Records
    /// failing the guard are excluded from value ranking, not treated as
    /// cost zero or infinite.
    pub fn cost_per_wear(&self) -> Option<f64> {
        if self.price > 0.0 && self.wear_count > 0 {
            Some(self.price / self.wear_count as f64)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_deleted: bool, is_wishlist: bool) -> GarmentRecord {
        GarmentRecord {
            id: Uuid::new_v4(),
            image_data: String::new(),
            category: Category::Tops,
            name: "White shirt".to_string(),
            color: "white".to_string(),
            material: "cotton".to_string(),
            price: 0.0,
            wear_count: 0,
            created_at: Utc::now(),
            box2d: None,
            is_deleted,
            deleted_at: None,
            is_wishlist,
        }
    }

    #[test]
    fn category_round_trips_through_str() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
        assert!("Hats".parse::<Category>().is_err());
    }

    #[test]
    fn exactly_one_view_contains_each_record() {
        let views = [CatalogView::Wardrobe, CatalogView::Wishlist, CatalogView::Bin];
        for (is_deleted, is_wishlist) in
            [(false, false), (false, true), (true, false), (true, true)]
        {
            let r = record(is_deleted, is_wishlist);
            let matching = views.iter().filter(|v| v.contains(&r)).count();
            assert_eq!(matching, 1, "record must be in exactly one view");
        }
    }

    #[test]
    fn bin_takes_precedence_over_wishlist_flag() {
        // Soft-deleting a wishlisted record leaves is_wishlist set, but the
        // record must show up in the bin view only.
        let r = record(true, true);
        assert!(CatalogView::Bin.contains(&r));
        assert!(!CatalogView::Wishlist.contains(&r));
        assert!(!CatalogView::Wardrobe.contains(&r));
    }

    #[test]
    fn cost_per_wear_guards_against_zero() {
        let mut r = record(false, false);
        r.price = 100.0;
        r.wear_count = 0;
        assert_eq!(r.cost_per_wear(), None);

        r.wear_count = 5;
        assert_eq!(r.cost_per_wear(), Some(20.0));

        r.price = 0.0;
        assert_eq!(r.cost_per_wear(), None);
    }

    #[test]
    fn box_well_formedness() {
        let ok = Box2D { ymin: 0, xmin: 100, ymax: 500, xmax: 900 };
        assert!(ok.is_well_formed());

        let inverted = Box2D { ymin: 500, xmin: 100, ymax: 100, xmax: 900 };
        assert!(!inverted.is_well_formed());

        let out_of_range = Box2D { ymin: 0, xmin: 0, ymax: 1200, xmax: 500 };
        assert!(!out_of_range.is_well_formed());
    }
}
