use serde::Serialize;

/// The closed set of civic issue categories the service recognizes.
///
/// The order of `ALL` is significant: it is the order prompt phrases are fed
/// to the embedding model and the order its score vector is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Pothole,
    Garbage,
    Streetlight,
    RoadDamage,
    Flooding,
    SidewalkDamage,
    Graffiti,
    TrafficSignal,
    BlockedPath,
    TreeHazard,
}

impl IncidentType {
    pub const ALL: [IncidentType; 10] = [
        IncidentType::Pothole,
        IncidentType::Garbage,
        IncidentType::Streetlight,
        IncidentType::RoadDamage,
        IncidentType::Flooding,
        IncidentType::SidewalkDamage,
        IncidentType::Graffiti,
        IncidentType::TrafficSignal,
        IncidentType::BlockedPath,
        IncidentType::TreeHazard,
    ];

    pub fn identifier(&self) -> &'static str {
        match self {
            IncidentType::Pothole => "pothole",
            IncidentType::Garbage => "garbage",
            IncidentType::Streetlight => "streetlight",
            IncidentType::RoadDamage => "road_damage",
            IncidentType::Flooding => "flooding",
            IncidentType::SidewalkDamage => "sidewalk_damage",
            IncidentType::Graffiti => "graffiti",
            IncidentType::TrafficSignal => "traffic_signal",
            IncidentType::BlockedPath => "blocked_path",
            IncidentType::TreeHazard => "tree_hazard",
        }
    }

    pub fn prompt_phrase(&self) -> String {
        format!("a photo of {}", self.identifier().replace('_', " "))
    }

    pub fn prompt_phrases() -> Vec<String> {
        Self::ALL.iter().map(|t| t.prompt_phrase()).collect()
    }
}

/// Severity labels for the free-text analysis path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn prompt_phrase(&self) -> String {
        let description = match self {
            Severity::Low => "a minor issue that can be fixed whenever convenient",
            Severity::Medium => "a problem that needs attention soon",
            Severity::High => "a dangerous situation that needs urgent action",
        };
        description.to_string()
    }

    pub fn prompt_phrases() -> Vec<String> {
        Self::ALL.iter().map(|s| s.prompt_phrase()).collect()
    }
}
