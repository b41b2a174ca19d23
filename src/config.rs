use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedMode {
    Mock,
    Empty,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Workspace opened at start-up; the in-memory store is used when unset.
    pub workspace: Option<PathBuf>,
    pub seed: SeedMode,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace: None,
            seed: SeedMode::Mock,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn seeds_mock(&self) -> bool {
        self.seed == SeedMode::Mock
    }
}

pub fn load_settings() -> Settings {
    settings_from(|key| std::env::var(key).ok())
}

fn settings_from(get: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = get("PORTALD_WORKSPACE").filter(|v| !v.trim().is_empty()) {
        settings.workspace = Some(PathBuf::from(v));
    }

    if let Some(v) = get("PORTALD_SEED") {
        // Anything unrecognized keeps the mock seed.
        if matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "none" | "empty" | "off"
        ) {
            settings.seed = SeedMode::Empty;
        }
    }

    if let Some(v) = get("PORTALD_LOG").filter(|v| !v.trim().is_empty()) {
        settings.log_filter = v;
    }

    settings
}
