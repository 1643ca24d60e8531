//! The scenario model shared by every input format.

use serde::{Deserialize, Serialize};
use tankflow_core::engine::Engine;
use tankflow_core::error::SimError;
use tankflow_core::tank::TankSpec;

use crate::format::Format;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Problems with the content of a scenario, independent of where it came from.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    #[error("empty input")]
    Empty,
    #[error("invalid header '{header}': expected '<count> <flow_rate>'")]
    InvalidHeader { header: String },
    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },
    #[error("declared {declared} tanks but found {found}")]
    CountMismatch { declared: usize, found: usize },
    #[error("tank {index} has no flow rate and no shared flow rate is set")]
    MissingFlowRate { index: usize },
    #[error("{format} syntax error: {detail}")]
    Syntax { format: Format, detail: String },
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// An ordered list of tanks ready to simulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub tanks: Vec<TankSpec>,
}

impl Scenario {
    pub fn new(tanks: Vec<TankSpec>) -> Self {
        Self { tanks }
    }

    /// Every tank shares `flow_rate`.
    pub fn uniform(flow_rate: f64, capacities: &[f64]) -> Self {
        Self::new(
            capacities
                .iter()
                .map(|&capacity| TankSpec::new(capacity, flow_rate))
                .collect(),
        )
    }

    pub fn tank_specs(&self) -> &[TankSpec] {
        &self.tanks
    }

    pub fn len(&self) -> usize {
        self.tanks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty()
    }

    /// Build a fresh engine for this scenario.
    pub fn engine(&self) -> Result<Engine, SimError> {
        Engine::new(self.tanks.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Structured documents
// ---------------------------------------------------------------------------

/// On-disk shape of a RON/JSON/TOML scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Flow rate for tanks that do not set their own.
    #[serde(default)]
    pub flow_rate: Option<f64>,
    /// Expected number of tanks, checked against `tanks`.
    #[serde(default)]
    pub count: Option<usize>,
    pub tanks: Vec<TankEntry>,
}

/// One tank in a structured document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TankEntry {
    pub capacity: f64,
    #[serde(default)]
    pub flow_rate: Option<f64>,
}

impl ScenarioFile {
    /// Resolve per-tank flow rates and check the declared count.
    pub fn resolve(self) -> Result<Scenario, ScenarioError> {
        if let Some(declared) = self.count {
            if declared != self.tanks.len() {
                return Err(ScenarioError::CountMismatch {
                    declared,
                    found: self.tanks.len(),
                });
            }
        }
        if self.tanks.is_empty() {
            return Err(ScenarioError::Empty);
        }
        let shared = self.flow_rate;
        let tanks = self
            .tanks
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .flow_rate
                    .or(shared)
                    .map(|flow_rate| TankSpec::new(entry.capacity, flow_rate))
                    .ok_or(ScenarioError::MissingFlowRate { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Scenario::new(tanks))
    }
}

/// Parse a RON, JSON, or TOML scenario document.
pub fn parse_structured(content: &str, format: Format) -> Result<Scenario, ScenarioError> {
    let syntax = |detail: String| ScenarioError::Syntax { format, detail };
    let file: ScenarioFile = match format {
        Format::Ron => ron::from_str(content).map_err(|e| syntax(e.to_string()))?,
        Format::Json => serde_json::from_str(content).map_err(|e| syntax(e.to_string()))?,
        Format::Toml => toml::from_str(content).map_err(|e| syntax(e.to_string()))?,
        Format::Plain => return Err(syntax("plain text is not a structured format".into())),
    };
    file.resolve()
}

/// Parse scenario text in any supported format.
pub fn parse_scenario(content: &str, format: Format) -> Result<Scenario, ScenarioError> {
    match format {
        Format::Plain => crate::plain::parse_plain(content),
        _ => parse_structured(content, format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_with_shared_flow_rate() {
        let content = r#"
            flow_rate = 1.0
            count = 3

            [[tanks]]
            capacity = 2.0

            [[tanks]]
            capacity = 4.0

            [[tanks]]
            capacity = 8.0
        "#;
        let scenario = parse_structured(content, Format::Toml).unwrap();
        assert_eq!(scenario, Scenario::uniform(1.0, &[2.0, 4.0, 8.0]));
    }

    #[test]
    fn json_per_tank_override() {
        let content = r#"{
            "flow_rate": 1.0,
            "tanks": [
                {"capacity": 6.0, "flow_rate": 3.0},
                {"capacity": 6.0}
            ]
        }"#;
        let scenario = parse_structured(content, Format::Json).unwrap();
        assert_eq!(
            scenario.tank_specs(),
            &[TankSpec::new(6.0, 3.0), TankSpec::new(6.0, 1.0)]
        );
    }

    #[test]
    fn ron_document() {
        let content = r#"(
            flow_rate: Some(2.0),
            tanks: [
                (capacity: 10.0),
                (capacity: 5.0, flow_rate: Some(1.0)),
            ],
        )"#;
        let scenario = parse_structured(content, Format::Ron).unwrap();
        assert_eq!(
            scenario.tank_specs(),
            &[TankSpec::new(10.0, 2.0), TankSpec::new(5.0, 1.0)]
        );
    }

    #[test]
    fn missing_flow_rate_reports_index() {
        let content = r#"{"tanks": [{"capacity": 1.0, "flow_rate": 1.0}, {"capacity": 2.0}]}"#;
        assert_eq!(
            parse_structured(content, Format::Json).unwrap_err(),
            ScenarioError::MissingFlowRate { index: 1 }
        );
    }

    #[test]
    fn declared_count_must_match() {
        let content = r#"{"flow_rate": 1.0, "count": 4, "tanks": [{"capacity": 1.0}]}"#;
        assert_eq!(
            parse_structured(content, Format::Json).unwrap_err(),
            ScenarioError::CountMismatch {
                declared: 4,
                found: 1
            }
        );
    }

    #[test]
    fn empty_tank_list_rejected() {
        let content = r#"{"flow_rate": 1.0, "tanks": []}"#;
        assert_eq!(
            parse_structured(content, Format::Json).unwrap_err(),
            ScenarioError::Empty
        );
    }

    #[test]
    fn unknown_field_is_syntax_error() {
        let content = r#"{"flow_rate": 1.0, "tanks": [], "speed": 3}"#;
        assert!(matches!(
            parse_structured(content, Format::Json),
            Err(ScenarioError::Syntax {
                format: Format::Json,
                ..
            })
        ));
    }

    #[test]
    fn scenario_builds_engine() {
        let scenario = Scenario::uniform(1.0, &[2.0, 4.0, 8.0]);
        let mut engine = scenario.engine().unwrap();
        let report = engine.run().unwrap();
        assert_eq!(report.overflow_times().to_string(), "4 4");
    }
}
