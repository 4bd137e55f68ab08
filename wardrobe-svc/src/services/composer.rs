//! Outfit composer
//!
//! Random two-slot outfit draws over the active wardrobe. Tops and
//! outerwear feed the top slot; bottoms and dresses feed the bottom slot.
//! Locked slots are kept as-is and only the open slots are redrawn.

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;
use wardrobe_common::garment::GarmentRecord;

/// Chance that an open top slot comes back empty even when tops exist.
/// Deliberate styling variety: some outfits are a statement bottom alone.
pub const EMPTY_TOP_PROBABILITY: f64 = 0.15;

/// Rotating styling one-liners attached to each shuffle
pub const STYLING_HINTS: &[&str] = &[
    "Tuck the front hem in to lift the waistline.",
    "Roll the sleeves twice for a relaxed finish.",
    "Add a thin belt to break up the silhouette.",
    "Half-tuck only one side for an effortless look.",
    "Cuff the trousers once to show the ankle.",
    "Layer a plain tee underneath and leave it unbuttoned.",
];

/// Result of one shuffle. A `None` top with a `Some` bottom is a valid
/// outfit; both slots `None` means the pools were empty.
///
/// `styling_hint` is `Some` exactly when the top slot was deliberately left
/// empty despite tops being available: the hint stands in for the top. An
/// empty top pool yields no hint, so clients can tell the two cases apart.
#[derive(Debug, Clone, Serialize)]
pub struct OutfitShuffle {
    pub top: Option<GarmentRecord>,
    pub bottom: Option<GarmentRecord>,
    pub styling_hint: Option<String>,
}

/// Draw an outfit from the active wardrobe.
///
/// `locked_top` / `locked_bottom` pin a slot to an existing garment and
/// exempt it from the draw. An open top slot has an [`EMPTY_TOP_PROBABILITY`]
/// chance of staying empty; that branch never consumes a pool draw, so a
/// singleton top pool still appears in most shuffles.
pub fn shuffle_outfit<R: Rng>(
    active: &[GarmentRecord],
    locked_top: Option<Uuid>,
    locked_bottom: Option<Uuid>,
    rng: &mut R,
) -> OutfitShuffle {
    let tops: Vec<&GarmentRecord> = active
        .iter()
        .filter(|g| g.category.is_top_eligible())
        .collect();
    let bottoms: Vec<&GarmentRecord> = active
        .iter()
        .filter(|g| g.category.is_bottom_eligible())
        .collect();

    let mut ghost_top = false;
    let top = match locked_top.and_then(|id| active.iter().find(|g| g.id == id)) {
        Some(locked) => Some(locked.clone()),
        None => {
            if tops.is_empty() {
                None
            } else if rng.gen::<f64>() < EMPTY_TOP_PROBABILITY {
                ghost_top = true;
                None
            } else {
                Some(tops[rng.gen_range(0..tops.len())].clone())
            }
        }
    };

    let bottom = match locked_bottom.and_then(|id| active.iter().find(|g| g.id == id)) {
        Some(locked) => Some(locked.clone()),
        None => {
            if bottoms.is_empty() {
                None
            } else {
                Some(bottoms[rng.gen_range(0..bottoms.len())].clone())
            }
        }
    };

    // The hint replaces the top, so it only appears on the ghost branch.
    let styling_hint = if ghost_top {
        Some(STYLING_HINTS[rng.gen_range(0..STYLING_HINTS.len())].to_string())
    } else {
        None
    };

    OutfitShuffle {
        top,
        bottom,
        styling_hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wardrobe_common::garment::Category;

    fn garment(category: Category, name: &str) -> GarmentRecord {
        GarmentRecord {
            id: Uuid::new_v4(),
            image_data: "aGk=".to_string(),
            category,
            name: name.to_string(),
            color: "black".to_string(),
            material: "cotton".to_string(),
            price: 100.0,
            wear_count: 0,
            created_at: Utc::now(),
            box2d: None,
            is_deleted: false,
            deleted_at: None,
            is_wishlist: false,
        }
    }

    #[test]
    fn empty_wardrobe_yields_empty_outfit() {
        let mut rng = StdRng::seed_from_u64(7);
        let shuffle = shuffle_outfit(&[], None, None, &mut rng);
        assert!(shuffle.top.is_none());
        assert!(shuffle.bottom.is_none());
        assert!(shuffle.styling_hint.is_none());
    }

    #[test]
    fn pools_respect_category_eligibility() {
        let wardrobe = vec![
            garment(Category::Shoes, "sneakers"),
            garment(Category::Accessories, "scarf"),
            garment(Category::Outerwear, "denim jacket"),
            garment(Category::Dresses, "slip dress"),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let shuffle = shuffle_outfit(&wardrobe, None, None, &mut rng);
            if let Some(top) = &shuffle.top {
                assert_eq!(top.name, "denim jacket");
            }
            let bottom = shuffle.bottom.as_ref().unwrap();
            assert_eq!(bottom.name, "slip dress");
        }
    }

    #[test]
    fn singleton_top_pool_mostly_appears() {
        // The empty-top branch must not consume a pool draw: with one top
        // available it should be picked roughly 85% of the time.
        let wardrobe = vec![
            garment(Category::Tops, "white tee"),
            garment(Category::Bottoms, "jeans"),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let mut with_top = 0;
        for _ in 0..1000 {
            let shuffle = shuffle_outfit(&wardrobe, None, None, &mut rng);
            if shuffle.top.is_some() {
                with_top += 1;
            }
        }
        assert!(with_top > 700, "top appeared only {} / 1000 times", with_top);
        assert!(with_top < 950, "empty-top branch never fired: {}", with_top);
    }

    #[test]
    fn locked_slots_survive_the_draw() {
        let locked = garment(Category::Tops, "locked blazer");
        let wardrobe = vec![
            locked.clone(),
            garment(Category::Tops, "other top"),
            garment(Category::Bottoms, "jeans"),
            garment(Category::Bottoms, "skirt"),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let shuffle = shuffle_outfit(&wardrobe, Some(locked.id), None, &mut rng);
            assert_eq!(shuffle.top.as_ref().unwrap().id, locked.id);
        }
    }

    #[test]
    fn stale_lock_falls_back_to_the_draw() {
        let wardrobe = vec![
            garment(Category::Tops, "tee"),
            garment(Category::Bottoms, "jeans"),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let shuffle = shuffle_outfit(&wardrobe, Some(Uuid::new_v4()), None, &mut rng);
        // Unknown id cannot be honored; the slot is drawn normally.
        if let Some(top) = shuffle.top {
            assert_eq!(top.name, "tee");
        }
        assert_eq!(shuffle.bottom.unwrap().name, "jeans");
    }

    #[test]
    fn styling_hint_marks_the_deliberate_empty_top() {
        let wardrobe = vec![
            garment(Category::Tops, "tee"),
            garment(Category::Bottoms, "jeans"),
        ];
        let mut rng = StdRng::seed_from_u64(21);
        let mut ghost_seen = false;
        for _ in 0..500 {
            let shuffle = shuffle_outfit(&wardrobe, None, None, &mut rng);
            match (&shuffle.top, &shuffle.styling_hint) {
                // Ghost branch: the hint stands in for the top
                (None, Some(hint)) => {
                    assert!(STYLING_HINTS.contains(&hint.as_str()));
                    ghost_seen = true;
                }
                (Some(_), None) => {}
                (top, hint) => panic!("hint out of step with top: {:?} / {:?}", top, hint),
            }
        }
        assert!(ghost_seen, "ghost branch never fired in 500 shuffles");
    }

    #[test]
    fn empty_top_pool_carries_no_hint() {
        // No tops at all is not the ghost branch; the client should see a
        // plain empty slot, not a styling suggestion.
        let wardrobe = vec![garment(Category::Bottoms, "jeans")];
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let shuffle = shuffle_outfit(&wardrobe, None, None, &mut rng);
            assert!(shuffle.top.is_none());
            assert!(shuffle.styling_hint.is_none());
            assert!(shuffle.bottom.is_some());
        }
    }

    #[test]
    fn bottom_slot_has_no_ghost_branch() {
        let wardrobe = vec![garment(Category::Bottoms, "jeans")];
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let shuffle = shuffle_outfit(&wardrobe, None, None, &mut rng);
            assert!(shuffle.bottom.is_some());
        }
    }
}
