use compute::ExplanationAlignment;
use log::Level;
use wasm_bindgen::JsValue;
use web_sys::window;

/// Global application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Default log level for the application
    pub log_level: Level,

    /// Enable debug mode
    pub debug_mode: bool,

    /// Height of the forecast plot in pixels
    pub chart_height: u32,

    /// Height of the explanation bar chart in pixels
    pub explanation_height: u32,

    /// Which timeline position explanation set 0 belongs to
    pub alignment: ExplanationAlignment,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: Level::Info,
            debug_mode: false,
            chart_height: 400,
            explanation_height: 300,
            alignment: ExplanationAlignment::default(),
        }
    }
}

impl AppSettings {
    /// Create settings from environment/window location
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        if let Some(window) = window() {
            if let Ok(hostname) = window.location().hostname() {
                settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";

                // In development, use more verbose logging
                if settings.debug_mode {
                    settings.log_level = Level::Debug;
                }
            }

            if let Ok(Some(storage)) = window.local_storage() {
                if let Ok(Some(log_level)) = storage.get_item("forechart_log_level") {
                    settings.log_level = match log_level.to_lowercase().as_str() {
                        "error" => Level::Error,
                        "warn" => Level::Warn,
                        "info" => Level::Info,
                        "debug" => Level::Debug,
                        "trace" => Level::Trace,
                        _ => settings.log_level,
                    };
                }

                if let Ok(Some(height)) = storage.get_item("forechart_chart_height") {
                    if let Ok(height) = height.parse::<u32>() {
                        settings.chart_height = height;
                    }
                }

                if let Ok(Some(height)) = storage.get_item("forechart_explanation_height") {
                    if let Ok(height) = height.parse::<u32>() {
                        settings.explanation_height = height;
                    }
                }

                if let Ok(Some(alignment)) = storage.get_item("forechart_alignment") {
                    match alignment.parse::<ExplanationAlignment>() {
                        Ok(alignment) => settings.alignment = alignment,
                        Err(error) => log::warn!("Ignoring stored alignment: {}", error),
                    }
                }
            }
        }

        settings
    }

    /// Save settings to localStorage
    pub fn save_to_storage(&self) -> Result<(), JsValue> {
        if let Some(window) = window() {
            if let Some(storage) = window.local_storage()? {
                storage.set_item("forechart_log_level", &format!("{:?}", self.log_level).to_lowercase())?;
                storage.set_item("forechart_chart_height", &self.chart_height.to_string())?;
                storage.set_item("forechart_explanation_height", &self.explanation_height.to_string())?;
                storage.set_item("forechart_alignment", &self.alignment.to_string())?;
            }
        }
        Ok(())
    }
}

// Global settings instance using thread_local
use std::cell::RefCell;

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::from_environment());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Update the global settings and persist them
pub fn update_settings<F>(f: F)
where
    F: FnOnce(&mut AppSettings),
{
    SETTINGS.with(|s| {
        let mut settings = s.borrow_mut();
        f(&mut settings);
        if let Err(error) = settings.save_to_storage() {
            log::warn!("Failed to persist settings: {:?}", error);
        }
    });
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}
