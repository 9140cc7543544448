use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PredictionLabel {
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Not At Risk")]
    NotAtRisk,
}

impl PredictionLabel {
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            PredictionLabel::AtRisk
        } else {
            PredictionLabel::NotAtRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::AtRisk => "At Risk",
            PredictionLabel::NotAtRisk => "Not At Risk",
        }
    }
}

impl std::fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static care recommendations shown alongside a prediction.
#[derive(Debug, Clone, Serialize)]
pub struct CareRecommendations {
    pub headline: &'static str,
    pub items: Vec<&'static str>,
}

impl CareRecommendations {
    pub fn for_label(label: PredictionLabel) -> Self {
        match label {
            PredictionLabel::AtRisk => Self {
                headline: "You seem to be at risk. Here are some helpful suggestions:",
                items: vec![
                    "Maintain regular sleep (7-9 hours).",
                    "Get 20+ minutes of daily activity.",
                    "Limit social media, especially before bed.",
                    "Talk to a friend, counselor, or family.",
                    "Try mindfulness or journaling.",
                ],
            },
            PredictionLabel::NotAtRisk => Self {
                headline: "You're doing great! Keep it up.",
                items: vec![
                    "Continue healthy sleep & activity.",
                    "Support friends in need.",
                    "Track your mood and feelings.",
                ],
            },
        }
    }
}
