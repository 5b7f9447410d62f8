use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Cuida";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reminders are generated this many calendar days ahead when a schedule
/// carries no explicit end date. Keeps materialization bounded.
pub const DEFAULT_GENERATION_WINDOW_DAYS: i64 = 7;

/// Default tracing filter when RUST_LOG is not set
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Cuida/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Cuida")
}

/// Directory where generated care reports are written by the rendering layer
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Cuida"));
    }

    #[test]
    fn reports_dir_under_app_data() {
        let reports = reports_dir();
        let app = app_data_dir();
        assert!(reports.starts_with(app));
        assert!(reports.ends_with("reports"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
