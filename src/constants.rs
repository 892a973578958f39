// Fixed placeholder numbers for the fake estimate, plus defaults that can be
// overridden from the environment or a .env file.

use std::env;

/// Calories every estimate starts from.
pub const BASELINE_CALORIES: i64 = 150;
/// Extra calories the "photo analysis" finds.
pub const IMAGE_BONUS_CALORIES: i64 = 100;

pub const TEXT_PROTEIN_GRAMS: u32 = 15;
pub const IMAGE_PROTEIN_GRAMS: u32 = 25;
pub const TEXT_FAT_GRAMS: u32 = 10;
pub const IMAGE_FAT_GRAMS: u32 = 12;

pub const PROFILE_SAVED_MESSAGE: &str = "Your profile has been updated successfully!";

// Use lazy_static to initialize static variables safely.
lazy_static::lazy_static! {
    pub static ref DEFAULT_RESPONSE_DELAY_MS: u64 = env::var("NUTRICHAT_RESPONSE_DELAY_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);
    pub static ref DEFAULT_HOST: String = env::var("NUTRICHAT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
}
