//! Page configuration.
//!
//! Every field has a default matching the shipped page, so the optional
//! `<script type="application/json" id="site-config">` block only needs to
//! name what it overrides.

use serde::{Deserialize, Serialize};

use crate::error::SiteResult;
use crate::timeline::controller::TransitionTiming;
use crate::timeline::{ContentStore, TimelineEntry};

/// Id of the JSON block read at startup.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub timeline: Vec<TimelineEntry>,
    pub transition: TransitionTiming,
    pub preloader: PreloaderConfig,
    pub cursor: CursorConfig,
    pub gallery: GalleryConfig,
    pub particles: ParticleConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            timeline: default_timeline(),
            transition: TransitionTiming::default(),
            preloader: PreloaderConfig::default(),
            cursor: CursorConfig::default(),
            gallery: GalleryConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> SiteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse `json` if present, falling back to defaults on any error.
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(s) => Self::from_json(s).unwrap_or_else(|e| {
                crate::log_warn!("ignoring site config: {e}");
                Self::default()
            }),
        }
    }

    pub fn content_store(&self) -> ContentStore {
        ContentStore::new(self.timeline.iter().cloned())
    }
}

fn default_timeline() -> Vec<TimelineEntry> {
    vec![
        TimelineEntry::new(
            "2023",
            "Senior Full Stack Dev",
            "TechCorp Solutions",
            "Leading a team of 5 developers. Architecting SaaS platforms using Laravel & Vue.js.",
        ),
        TimelineEntry::new(
            "2021",
            "Backend Specialist",
            "Creative Agency",
            "Developed custom CMS solutions and E-commerce integrations. Managed database migrations.",
        ),
        TimelineEntry::new(
            "2019",
            "Web Developer",
            "Freelance",
            "Built over 20+ websites for international clients. Focused on WordPress & React SPAs.",
        ),
    ]
}

/// Durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreloaderConfig {
    pub count_to: f64,
    pub count_duration: f64,
    /// Pause before the loader text fades.
    pub hold: f64,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self { count_to: 100.0, count_duration: 2.0, hold: 2.2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    pub follower_lag: f64,
    pub hover_scale: f64,
    /// Fraction of the pointer's offset from centre a magnetic element follows.
    pub magnetic_strength: f64,
    pub magnetic_duration: f64,
    pub release_duration: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            follower_lag: 0.1,
            hover_scale: 1.5,
            magnetic_strength: 0.3,
            magnetic_duration: 0.3,
            release_duration: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryConfig {
    /// Seconds the scrubbed position takes to catch up with the scrollbar.
    pub scrub_lag: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { scrub_lag: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    pub count: usize,
    /// Edge length of the cube the points are scattered in.
    pub spread: f32,
    pub size: f32,
    /// 0xRRGGBB.
    pub color: u32,
    pub opacity: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
    /// Radians per second of idle spin about y.
    pub spin_rate: f32,
    /// Radians per unit of normalised pointer offset.
    pub pointer_tilt: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            spread: 10.0,
            size: 0.005,
            color: 0x6c5ce7,
            opacity: 0.8,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 2.0,
            spin_rate: 0.05,
            pointer_tilt: 0.5,
        }
    }
}

impl ParticleConfig {
    pub fn rgb(&self) -> [f32; 3] {
        let c = self.color;
        [
            ((c >> 16) & 0xff) as f32 / 255.0,
            ((c >> 8) & 0xff) as f32 / 255.0,
            (c & 0xff) as f32 / 255.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_hold_three_years() {
        let cfg = SiteConfig::default();
        let store = cfg.content_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("2023").unwrap().company, "TechCorp Solutions");
        assert_eq!(cfg.transition.fade_out, 0.3);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteConfig::from_json(
            r#"{
                "timeline": [
                    {"year": "2024", "role": "CTO", "company": "Acme", "description": "Everything."}
                ],
                "transition": {"fadeIn": 0.8},
                "particles": {"count": 500}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.timeline.len(), 1);
        assert_eq!(cfg.transition.fade_in, 0.8);
        assert_eq!(cfg.transition.fade_out, 0.3);
        assert_eq!(cfg.particles.count, 500);
        assert_eq!(cfg.particles.camera_z, 2.0);
        assert_eq!(cfg.cursor, CursorConfig::default());
    }

    #[test]
    fn malformed_json_falls_back() {
        let cfg = SiteConfig::load_or_default(Some("{ not json"));
        assert_eq!(cfg, SiteConfig::default());
        assert_eq!(SiteConfig::load_or_default(Some("   ")), SiteConfig::default());
        assert_eq!(SiteConfig::load_or_default(None), SiteConfig::default());
    }

    #[test]
    fn ease_names_parse() {
        let cfg = SiteConfig::from_json(r#"{"transition": {"ease": "power3Out"}}"#).unwrap();
        assert_eq!(cfg.transition.ease, crate::ease::Ease::Power3Out);
    }

    #[test]
    fn color_splits_into_channels() {
        let rgb = ParticleConfig::default().rgb();
        assert!((rgb[0] - 0x6c as f32 / 255.0).abs() < 1e-6);
        assert!((rgb[2] - 0xe7 as f32 / 255.0).abs() < 1e-6);
    }
}
