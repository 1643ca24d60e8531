//! The plain scenario format.
//!
//! ```text
//! 3 1
//! 2
//! 4
//! 8
//! ```
//!
//! The first line holds the tank count and the flow rate every tank starts
//! with. Each following line holds one capacity. Blank lines are ignored.

use crate::scenario::{Scenario, ScenarioError};

/// Parse plain scenario text.
pub fn parse_plain(content: &str) -> Result<Scenario, ScenarioError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines.next().ok_or(ScenarioError::Empty)?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [count, flow_rate] = fields.as_slice() else {
        return Err(ScenarioError::InvalidHeader {
            header: header.to_string(),
        });
    };
    let declared: usize = parse_number(header_line, count)?;
    let flow_rate: f64 = parse_number(header_line, flow_rate)?;

    let capacities = lines
        .map(|(line, value)| parse_number::<f64>(line, value))
        .collect::<Result<Vec<_>, _>>()?;

    if capacities.len() != declared {
        return Err(ScenarioError::CountMismatch {
            declared,
            found: capacities.len(),
        });
    }

    tracing::debug!(tanks = declared, flow_rate, "parsed plain scenario");
    Ok(Scenario::uniform(flow_rate, &capacities))
}

fn parse_number<T: std::str::FromStr>(line: usize, value: &str) -> Result<T, ScenarioError> {
    value.parse().map_err(|_| ScenarioError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}
