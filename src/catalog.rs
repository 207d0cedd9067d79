//! Voice, avatar and language catalogs plus their seed contents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceKind {
    #[serde(rename = "AI_PRESET")]
    Preset,
    #[serde(rename = "CLONED_USER")]
    Cloned,
}

/// Typed mirror of the status text embedded in a cloned voice's description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloneStatus {
    #[serde(rename = "CLONING_PENDING")]
    Pending,
    Available,
    #[serde(rename = "CLONING_FAILED")]
    Failed,
}

impl std::fmt::Display for CloneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloneStatus::Pending => write!(f, "CLONING_PENDING"),
            CloneStatus::Available => write!(f, "AVAILABLE"),
            CloneStatus::Failed => write!(f, "CLONING_FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    #[serde(rename = "voice_id")]
    pub id: String,
    pub name: String,
    /// ISO 639-1 codes.
    #[serde(rename = "language_support")]
    pub language_codes: Vec<String>,
    #[serde(rename = "type")]
    pub kind: VoiceKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_url: Option<String>,
    /// `None` for presets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_status: Option<CloneStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    #[serde(rename = "avatar_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    /// Opaque mouth-shape set identifiers, e.g. `oculus_15`.
    #[serde(rename = "supported_viseme_profiles")]
    pub viseme_profiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "zh", name: "Chinese (Mandarin)" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "pt", name: "Portuguese" },
];

pub const SPEAKING_STYLES: &[&str] = &[
    "Normal",
    "Fast",
    "Slow",
    "Emphatic",
    "Conversational",
    "Whisper",
    "Shout",
];

pub const DEFAULT_LANGUAGE: &str = "en";

fn preset(id: &str, name: &str, lang: &str, description: &str, sample: &str) -> Voice {
    Voice {
        id: id.to_string(),
        name: name.to_string(),
        language_codes: vec![lang.to_string()],
        kind: VoiceKind::Preset,
        description: description.to_string(),
        sample_url: Some(format!("https://example.com/{sample}.mp3")),
        clone_status: None,
    }
}

fn avatar(id: &str, name: &str, description: &str, profiles: &[&str], seed: u8) -> Avatar {
    Avatar {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        viseme_profiles: profiles.iter().map(|p| p.to_string()).collect(),
        thumbnail_url: Some(format!("https://picsum.photos/seed/avatar{seed}/100/100")),
    }
}

/// The preset voices every fresh store starts with.
pub fn seed_voices() -> Vec<Voice> {
    vec![
        preset(
            "voice_001",
            "Standard Male (US English)",
            "en",
            "A clear, standard male voice.",
            "sample_male_en",
        ),
        preset(
            "voice_002",
            "Standard Female (US English)",
            "en",
            "A clear, standard female voice.",
            "sample_female_en",
        ),
        preset(
            "voice_003",
            "Narrator Male (Spanish)",
            "es",
            "A warm male voice for narration in Spanish.",
            "sample_male_es",
        ),
        preset(
            "voice_004",
            "Announcer Female (French)",
            "fr",
            "An energetic female voice for announcements in French.",
            "sample_female_fr",
        ),
    ]
}

pub fn seed_avatars() -> Vec<Avatar> {
    vec![
        avatar(
            "avatar_001",
            "Neutral Humanoid",
            "A generic humanoid avatar.",
            &["oculus_15", "standard_v1"],
            1,
        ),
        avatar(
            "avatar_002",
            "Stylized Character A",
            "A cartoonish character.",
            &["oculus_15"],
            2,
        ),
        avatar(
            "avatar_003",
            "Realistic MetaHuman",
            "A high-fidelity MetaHuman style avatar.",
            &["standard_v1", "metahuman_default"],
            3,
        ),
    ]
}
