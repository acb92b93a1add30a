use crate::rating::DEFAULT_K_FACTOR;

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub k_factor: f64,
    pub starting_rating: i32,
    pub confirm_window_hours: i64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            starting_rating: 1500,
            confirm_window_hours: 48,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        let mut rating = RatingSettings::default();
        if let Some(k) = k_factor_from_env() {
            rating.k_factor = k;
        }
        Self { rating }
    }
}

fn k_factor_from_env() -> Option<f64> {
    std::env::var("K_FACTOR").ok()?.parse().ok()
}
