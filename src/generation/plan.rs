//! Which shots each generation mode produces.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Put the product on the model in their own photo.
    #[default]
    Original,
    /// Bring the model into a grey studio set.
    Studio,
    /// Copy only; images are supplied by hand.
    Frame,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 3] = [
        GenerationMode::Original,
        GenerationMode::Studio,
        GenerationMode::Frame,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GenerationMode::Original => "original",
            GenerationMode::Studio => "studio",
            GenerationMode::Frame => "frame",
        }
    }

    /// Shots to generate, or `None` when the mode produces no images.
    pub fn plan(self) -> Option<ShotPlan> {
        match self {
            GenerationMode::Original => Some(ShotPlan {
                master_pose: "Master".into(),
                model: vec![
                    Variant::new("Walk", "Walking"),
                    Variant::new("Cross", "Legs Crossed"),
                ],
                closeup: vec![
                    Variant::new("Side", "Side view feet"),
                    Variant::new("Angle", "Low angle feet"),
                    Variant::new("Top", "Top down feet"),
                ],
            }),
            GenerationMode::Studio => Some(ShotPlan {
                master_pose: "Studio Master".into(),
                model: vec![
                    Variant::new("Walk", "Studio Walk"),
                    Variant::new("Lean", "Leaning against wall"),
                ],
                closeup: vec![
                    Variant::new("Detail", "Waist down"),
                    Variant::new("Focus", "Extreme closeup"),
                    Variant::new("Back", "Back view"),
                ],
            }),
            GenerationMode::Frame => None,
        }
    }
}

/// One pose derived from the master shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Pose label stored with the asset.
    pub name: String,
    /// Instruction sent to the backend.
    pub instruction: String,
}

impl Variant {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotPlan {
    pub master_pose: String,
    pub model: Vec<Variant>,
    pub closeup: Vec<Variant>,
}

impl ShotPlan {
    /// Backend calls the plan makes, master included.
    pub fn call_count(&self) -> usize {
        1 + self.model.len() + self.closeup.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_plan() {
        let plan = GenerationMode::Original.plan().unwrap();
        assert_eq!(plan.master_pose, "Master");
        let model: Vec<&str> = plan.model.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(model, vec!["Walk", "Cross"]);
        assert_eq!(plan.model[1].instruction, "Legs Crossed");
        let closeup: Vec<&str> = plan.closeup.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(closeup, vec!["Side", "Angle", "Top"]);
        assert_eq!(plan.call_count(), 6);
    }

    #[test]
    fn studio_plan() {
        let plan = GenerationMode::Studio.plan().unwrap();
        assert_eq!(plan.master_pose, "Studio Master");
        assert_eq!(plan.model[1].instruction, "Leaning against wall");
        assert_eq!(plan.closeup[2].name, "Back");
    }

    #[test]
    fn frame_has_no_images() {
        assert!(GenerationMode::Frame.plan().is_none());
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&GenerationMode::Studio).unwrap();
        assert_eq!(json, r#""studio""#);
        for mode in GenerationMode::ALL {
            assert_eq!(
                serde_json::to_string(&mode).unwrap(),
                format!("\"{}\"", mode.name())
            );
        }
    }
}
