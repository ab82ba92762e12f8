//! Controlled vocabularies used to steer prompts and validate replies.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An ordered set of canonical labels for one category.
///
/// Order is preserved as given so prompts list labels the way the
/// vocabulary author wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlledVocabulary {
    labels: IndexSet<String>,
}

impl ControlledVocabulary {
    /// Build a vocabulary from labels. Duplicates keep their first position.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Iterate labels in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Render for inclusion in a prompt.
    pub fn prompt_list(&self) -> String {
        self.iter().collect::<Vec<_>>().join(", ")
    }
}

/// The four vocabularies the pipeline works with.
///
/// Read-only configuration, passed explicitly to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    pub sports: ControlledVocabulary,
    pub technologies: ControlledVocabulary,
    pub populations: ControlledVocabulary,
    pub outcomes: ControlledVocabulary,
}

impl Vocabularies {
    /// Load vocabularies from a JSON document with `sports`, `technologies`,
    /// `populations` and `outcomes` arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The stock vocabularies for sport-technology literature review.
    pub fn builtin() -> Self {
        Self {
            sports: ControlledVocabulary::new(SPORTS.iter().copied()),
            technologies: ControlledVocabulary::new(TECHNOLOGIES.iter().copied()),
            populations: ControlledVocabulary::new(POPULATIONS.iter().copied()),
            outcomes: ControlledVocabulary::new(OUTCOMES.iter().copied()),
        }
    }
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self::builtin()
    }
}

// Labels are kept code point for code point ("Paddle\u{2011}Tennis" uses a
// non-breaking hyphen) since sport matching is exact.
const SPORTS: &[&str] = &[
    "American Football",
    "Football",
    "Soccer",
    "Volleyball",
    "Beach Volleyball",
    "Tennis",
    "Paddle\u{2011}Tennis",
    "Table Tennis",
    "Basketball",
    "Rugby",
    "Badminton",
    "Athletics",
    "Baseball",
    "Softball",
    "Cricket",
    "Golf",
    "Hockey",
    "Ice Hockey",
    "Field Hockey",
    "Handball",
    "Swimming",
    "Cycling",
    "Skiing",
    "Snowboarding",
    "Rowing",
    "Wrestling",
    "Martial Arts",
    "Boxing",
    "MMA",
    "Kick Boxing",
    "Muay Thai",
    "Fencing",
    "Track and Field",
    "Triathlon",
    "Surfing",
    "Skateboarding",
    "Ultimate Frisbee",
    "Lacrosse",
    "Pickleball",
    "Netball",
    "Squash",
    "Floorball",
    "Curling",
    "Gaelic Football",
    "Hurling",
    "Kabaddi",
    "Archery",
    "Equestrian",
    "Shooting",
    "Canoeing/Kayaking",
    "Climbing",
];

const TECHNOLOGIES: &[&str] = &[
    "Wearables",
    "GPS",
    "IMU",
    "Accelerometer",
    "Heart-Rate Monitor",
    "HRV",
    "Force Plates",
    "EMG",
    "Motion Capture",
    "Computer Vision",
    "Machine Learning",
    "Deep Learning",
    "Artificial Intelligence",
    "Video Analysis",
    "Biomechanical Modelling",
    "Virtual Reality",
    "Augmented Reality",
    "ECG",
    "EEG",
    "Thermal Imaging",
    "Simulation",
    "3D Printing",
    "Smart Textiles",
    "Pressure Insoles",
    "Pedometer",
    "Eye Tracking",
    "Drones",
];

const POPULATIONS: &[&str] = &[
    "Youth",
    "Adolescents",
    "Collegiate",
    "Elite",
    "Adults",
    "Players",
    "School",
    "Professional",
    "Sub-Elite",
    "Amateur",
    "Recreational",
    "Masters",
    "Female",
    "Male",
    "Para-Athletes",
    "Coaches",
    "Students",
];

const OUTCOMES: &[&str] = &[
    "Performance",
    "Biomechanics",
    "Physiology",
    "Injury Incidence",
    "Injury Risk",
    "Injury Severity",
    "Injury Prevention",
    "Recovery",
    "Tactical Behaviour",
    "Psychology",
    "Perception",
    "Decision-Making",
    "Workload",
    "Fatigue",
    "Running Economy",
    "Endurance",
    "Speed",
    "Strength",
    "Power",
    "Accuracy",
    "Motivation",
    "Autonomic Function",
    "Leadership",
    "Fitness",
    "Strategy",
    "Competition",
    "Teaching Ability",
    "Knowledge Level",
    "Precision",
    "Skill",
    "Tactics",
    "Concussion",
];
