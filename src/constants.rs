// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed design constants and the default values behind every tunable in
//! [`crate::config::FitnessConfig`] and [`crate::config::Config`].

/// Trend classification constants
pub mod trend {
    /// Relative change (either side of zero) inside which a metric is "stable".
    /// Comparisons are exclusive: exactly +/-5% is still stable.
    pub const DEAD_BAND: f64 = 0.05;

    pub const ARROW_UP: &str = "\u{2191}";
    pub const ARROW_DOWN: &str = "\u{2193}";
    pub const ARROW_STABLE: &str = "\u{2192}";
}

/// Training category vocabularies
pub mod categories {
    pub const RUNNING_TYPES: &[&str] = &["Running"];
    pub const GYM_TYPES: &[&str] = &["Gym-Strength", "Gym-Crossfit"];
    pub const TOUGH_FEELINGS: &[&str] = &["Tired", "Exhausted"];
}

/// Feeling ordinal scale (1 = worst, 5 = best)
pub mod feeling {
    pub const EXHAUSTED: u8 = 1;
    pub const TIRED: u8 = 2;
    pub const OKAY: u8 = 3;
    pub const GOOD: u8 = 4;
    pub const GREAT: u8 = 5;

    /// Minimum score counted as a good/great session
    pub const GOOD_THRESHOLD: u8 = 4;
}

/// Acute:Chronic Workload Ratio zones
pub mod load {
    /// Below this ratio the athlete is detraining
    pub const DETRAINING_BELOW: f64 = 0.8;
    /// Upper bound (inclusive) of the optimal zone
    pub const OPTIMAL_MAX: f64 = 1.3;
    /// Upper bound (inclusive) of the caution zone; above it is danger
    pub const CAUTION_MAX: f64 = 1.5;
    /// Number of prior periods averaged into the chronic load
    pub const CHRONIC_WINDOW: usize = 3;
}

/// Overreaching detection thresholds
pub mod overreaching {
    /// Minimum ACWR before health markers are inspected
    pub const ACWR_THRESHOLD: f64 = 1.3;
    /// Current body battery below this fraction of the prior mean is a decline
    pub const BODY_BATTERY_RATIO: f64 = 0.9;
    /// Current sleep below this fraction of the prior mean is a decline
    pub const SLEEP_RATIO: f64 = 0.9;
    /// Current resting HR above this multiple of the prior mean is elevated
    pub const RESTING_HR_RATIO: f64 = 1.1;
}

/// Period defaults for the overview and periodic reports
pub mod periods {
    /// Weeks shown on the overview dashboard
    pub const OVERVIEW_WEEKS: usize = 4;

    /// Default report schedule: (title, period type, count)
    pub const REPORT_SCHEDULE: &[(&str, &str, usize)] = &[
        ("Monthly Report", "month", 6),
        ("Quarterly Report", "quarter", 4),
        ("Yearly Report", "year", 2),
    ];
}

/// Environment variable names and file defaults
pub mod env_config {
    use std::env;

    pub const TRAINING_RECORDS_PATH: &str = "TRAINING_RECORDS_PATH";
    pub const HEALTH_RECORDS_PATH: &str = "HEALTH_RECORDS_PATH";
    pub const DASHBOARD_OUTPUT_DIR: &str = "DASHBOARD_OUTPUT_DIR";
    pub const FITNESS_CONFIG_PATH: &str = "FITNESS_CONFIG_PATH";

    pub const DEFAULT_OUTPUT_DIR: &str = "site";
    pub const DEFAULT_FITNESS_CONFIG_FILE: &str = "fitness_config.toml";
    pub const CONFIG_DIR_NAME: &str = "training-dashboard";
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Output directory from environment or default
    pub fn output_dir() -> String {
        env::var(DASHBOARD_OUTPUT_DIR).unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
    }

    /// Optional analytics config path from environment
    pub fn fitness_config_path() -> Option<String> {
        env::var(FITNESS_CONFIG_PATH).ok().filter(|p| !p.is_empty())
    }
}

/// Sink output file names
pub mod output {
    pub const DASHBOARD_FILE: &str = "dashboard.json";
    pub const CHARTS_FILE: &str = "data.json";
    pub const REPORT_PREFIX: &str = "report-";
}

/// Service identification for structured logs
pub mod service {
    pub const SERVICE_NAME: &str = "training-dashboard";
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
