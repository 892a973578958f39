//! The placeholder "analysis": a few fixed numbers and the sentence that goes
//! above the card.

use serde::Serialize;
use tracing::warn;

use crate::constants::{
    BASELINE_CALORIES, IMAGE_BONUS_CALORIES, IMAGE_FAT_GRAMS, IMAGE_PROTEIN_GRAMS, TEXT_FAT_GRAMS,
    TEXT_PROTEIN_GRAMS,
};
use crate::profile::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NutritionEstimate {
    pub total_calories: i64,
    pub protein_grams: u32,
    pub fat_grams: u32,
}

impl NutritionEstimate {
    pub fn compute(profile: &UserProfile, is_image: bool) -> Self {
        let mut calories = BASELINE_CALORIES;
        if let Some(weight) = profile.weight() {
            calories = calories.saturating_add(weight_contribution(weight));
        }
        if is_image {
            calories = calories.saturating_add(IMAGE_BONUS_CALORIES);
        }

        Self {
            total_calories: calories,
            protein_grams: if is_image { IMAGE_PROTEIN_GRAMS } else { TEXT_PROTEIN_GRAMS },
            fat_grams: if is_image { IMAGE_FAT_GRAMS } else { TEXT_FAT_GRAMS },
        }
    }
}

/// Calories added for a stored weight. A weight with no leading integer adds
/// nothing.
pub fn weight_contribution(weight: &str) -> i64 {
    match parse_leading_int(weight) {
        Some(value) => value,
        None => {
            warn!(weight, "profile weight is not numeric, ignoring it in the estimate");
            0
        }
    }
}

/// Parses the integer at the start of `input`: leading whitespace, an optional
/// sign, then digits. Anything after the digits is ignored, so `"70kg"` and
/// `"70.9"` both give 70.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// The line of text shown above the card.
pub fn response_sentence(query: &str, is_image: bool, profile: &UserProfile) -> String {
    let mut sentence = if is_image {
        format!("Analyzing the photo you sent ('{query}'). Estimated breakdown:")
    } else {
        format!("Estimated breakdown for '{query}':")
    };
    if let Some(weight) = profile.weight() {
        sentence.push_str(&format!(" (adjusted for your {weight} kg profile)."));
    }
    sentence
}
