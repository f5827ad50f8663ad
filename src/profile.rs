//! Device class detection and fidelity knobs
//!
//! Detection runs once at startup. There is no feedback loop: the profile is a
//! fixed record that renderers read to scale smoke detail, geometry and
//! particle counts.

use serde::{Deserialize, Serialize};

/// User agent fragments that mark a handheld browser (matched case-insensitively)
const MOBILE_AGENTS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Viewport width (CSS px) at or below which a touch device counts as mobile
pub const SMALL_SCREEN_MAX_WIDTH: f64 = 768.0;

/// Device classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceClass {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Desktop => "Desktop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mobile" | "phone" | "tablet" => Some(DeviceClass::Mobile),
            "desktop" => Some(DeviceClass::Desktop),
            _ => None,
        }
    }

    /// Octaves of fractal noise in the smoke shader
    pub fn smoke_octaves(&self) -> u32 {
        match self {
            DeviceClass::Mobile => 3,
            DeviceClass::Desktop => 7,
        }
    }

    /// Radial segments of the smoke column geometry
    pub fn geometry_detail(&self) -> u32 {
        match self {
            DeviceClass::Mobile => 64,
            DeviceClass::Desktop => 128,
        }
    }

    /// Flame particle count
    pub fn particle_count(&self) -> usize {
        match self {
            DeviceClass::Mobile => 200,
            DeviceClass::Desktop => 500,
        }
    }

    /// Whether the key light casts shadows
    pub fn shadows_enabled(&self) -> bool {
        match self {
            DeviceClass::Mobile => false,
            DeviceClass::Desktop => true,
        }
    }

    /// Allowed device pixel ratio range for the canvas
    pub fn pixel_ratio_range(&self) -> (f32, f32) {
        match self {
            DeviceClass::Mobile => (1.0, 1.5),
            DeviceClass::Desktop => (1.0, 2.0),
        }
    }
}

/// Raw facts about the host used for detection
#[derive(Debug, Clone, Default)]
pub struct DeviceHints {
    pub user_agent: String,
    /// Touch events or touch points are available
    pub touch: bool,
    /// Viewport width in CSS pixels
    pub viewport_width: f64,
}

impl DeviceHints {
    /// Read hints from the browser (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let navigator = window.navigator();
        let user_agent = navigator.user_agent().unwrap_or_default();
        let has_ontouchstart = js_sys::Reflect::has(&window, &"ontouchstart".into()).unwrap_or(false);
        let touch = has_ontouchstart || navigator.max_touch_points() > 0;
        let viewport_width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        Self {
            user_agent,
            touch,
            viewport_width,
        }
    }

    /// Native hosts are treated as desktops
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_browser() -> Self {
        Self::default()
    }

    /// Classify the device
    pub fn class(&self) -> DeviceClass {
        let agent = self.user_agent.to_lowercase();
        let mobile_agent = MOBILE_AGENTS.iter().any(|m| agent.contains(m));
        let small_touch = self.touch && self.viewport_width <= SMALL_SCREEN_MAX_WIDTH;
        if mobile_agent || small_touch {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Fixed fidelity record consumed by rendering collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub is_mobile: bool,
    pub smoke_octaves: u32,
    pub geometry_detail: u32,
    pub particle_count: usize,
    pub shadows_enabled: bool,
    pub pixel_ratio: (f32, f32),
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::for_class(DeviceClass::Desktop)
    }
}

impl DeviceProfile {
    /// Profile for a known class
    pub fn for_class(class: DeviceClass) -> Self {
        Self {
            is_mobile: class == DeviceClass::Mobile,
            smoke_octaves: class.smoke_octaves(),
            geometry_detail: class.geometry_detail(),
            particle_count: class.particle_count(),
            shadows_enabled: class.shadows_enabled(),
            pixel_ratio: class.pixel_ratio_range(),
        }
    }

    /// Detect the profile from host hints
    pub fn detect(hints: &DeviceHints) -> Self {
        let class = hints.class();
        log::info!("Device profile: {}", class.as_str());
        Self::for_class(class)
    }

    pub fn class(&self) -> DeviceClass {
        if self.is_mobile {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(agent: &str, touch: bool, width: f64) -> DeviceHints {
        DeviceHints {
            user_agent: agent.to_string(),
            touch,
            viewport_width: width,
        }
    }

    #[test]
    fn test_mobile_user_agent() {
        let profile = DeviceProfile::detect(&hints(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            false,
            1200.0,
        ));
        assert!(profile.is_mobile);
        assert_eq!(profile.smoke_octaves, 3);
        assert_eq!(profile.geometry_detail, 64);
        assert_eq!(profile.particle_count, 200);
        assert!(!profile.shadows_enabled);
    }

    #[test]
    fn test_small_touch_screen_is_mobile() {
        let h = hints("Mozilla/5.0 (X11; Linux x86_64)", true, 768.0);
        assert_eq!(h.class(), DeviceClass::Mobile);
        let h = hints("Mozilla/5.0 (X11; Linux x86_64)", true, 1024.0);
        assert_eq!(h.class(), DeviceClass::Desktop);
    }

    #[test]
    fn test_desktop_profile() {
        let profile = DeviceProfile::detect(&hints("Mozilla/5.0 (Windows NT 10.0)", false, 1920.0));
        assert!(!profile.is_mobile);
        assert_eq!(profile.smoke_octaves, 7);
        assert_eq!(profile.geometry_detail, 128);
        assert_eq!(profile.particle_count, 500);
        assert!(profile.shadows_enabled);
        assert_eq!(profile.pixel_ratio, (1.0, 2.0));
    }

    #[test]
    fn test_class_round_trip_names() {
        assert_eq!(DeviceClass::from_str("MOBILE"), Some(DeviceClass::Mobile));
        assert_eq!(DeviceClass::from_str("desktop"), Some(DeviceClass::Desktop));
        assert_eq!(DeviceClass::from_str("toaster"), None);
    }
}
