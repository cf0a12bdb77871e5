//! Packing suggestions derived from the current temperature.
//!
//! The decision table runs on Celsius only; callers holding a display value
//! must normalize through [`crate::units`] first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackingCategory {
    Cold,
    Moderate,
    Hot,
}

/// Category for a Celsius temperature.
///
/// Below 15 is cold, above 25 is hot; both boundaries belong to the
/// moderate band (15.0 exactly is moderate).
pub fn category_for(temp_c: f64) -> PackingCategory {
    if temp_c < 15.0 {
        PackingCategory::Cold
    } else if temp_c > 25.0 {
        PackingCategory::Hot
    } else {
        PackingCategory::Moderate
    }
}

/// Items suggested for every trip regardless of temperature.
pub const BASELINE_ITEMS: &[&str] = &[
    "passport or ID",
    "phone charger",
    "toiletries",
    "comfortable walking shoes",
];

impl PackingCategory {
    pub fn items(&self) -> &'static [&'static str] {
        match self {
            PackingCategory::Cold => &["warm coat", "gloves", "scarf", "thermal layers"],
            PackingCategory::Moderate => &["light jacket", "long-sleeve shirts", "jeans"],
            PackingCategory::Hot => &["sunscreen", "sunglasses", "hat", "shorts"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PackingCategory::Cold => "cold",
            PackingCategory::Moderate => "moderate",
            PackingCategory::Hot => "hot",
        }
    }
}

/// Baseline items plus the category-specific ones for a Celsius temperature.
pub fn packing_list(temp_c: f64) -> Vec<&'static str> {
    let mut items: Vec<&'static str> = BASELINE_ITEMS.to_vec();
    items.extend_from_slice(category_for(temp_c).items());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{celsius_to_fahrenheit, fahrenheit_to_celsius};

    #[test]
    fn decision_table_boundaries() {
        assert_eq!(category_for(14.9), PackingCategory::Cold);
        assert_eq!(category_for(15.0), PackingCategory::Moderate);
        assert_eq!(category_for(25.0), PackingCategory::Moderate);
        assert_eq!(category_for(25.1), PackingCategory::Hot);
    }

    #[test]
    fn category_is_stable_under_unit_round_trip() {
        // Normalize-before-decide: displaying in Fahrenheit and converting
        // back must never flip the category, including at the 15°C boundary.
        for c in [-5.0, 14.9, 15.0, 20.0, 25.0, 25.1, 33.0] {
            let round_tripped = fahrenheit_to_celsius(celsius_to_fahrenheit(c));
            assert_eq!(category_for(c), category_for(round_tripped), "at {c}°C");
        }
    }

    #[test]
    fn packing_list_always_includes_the_baseline() {
        for temp in [-10.0, 20.0, 35.0] {
            let items = packing_list(temp);
            for baseline in BASELINE_ITEMS {
                assert!(items.contains(baseline), "missing {baseline} at {temp}°C");
            }
        }
    }

    #[test]
    fn packing_list_adds_category_items() {
        assert!(packing_list(-10.0).contains(&"warm coat"));
        assert!(packing_list(20.0).contains(&"light jacket"));
        assert!(packing_list(35.0).contains(&"sunscreen"));
    }
}
