use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;

use serde_json::{Map, Value};

use crate::solver::UNKNOWN_TRAIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_puzzle_snapshot(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    validate_puzzle_json(&raw).map_err(|err| format!("'{path}': {err}"))
}

/// Checks a raw puzzle document without building solver types, so every
/// problem is reported rather than the first one.
pub fn validate_puzzle_json(raw: &str) -> Result<ValidationReport, String> {
    let payload: Value =
        serde_json::from_str(raw).map_err(|err| format!("unable to parse json: {err}"))?;
    let object = payload
        .as_object()
        .ok_or_else(|| "expected top-level JSON object { id, nodes, traits }".to_string())?;

    let mut report = ValidationReport::default();

    match object.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => {}
        _ => report.push(ValidationSeverity::Error, "id", "missing non-empty 'id'"),
    }

    let instances = validate_traits(&mut report, object);

    let Some(nodes) = object.get("nodes").and_then(Value::as_array) else {
        report.push(ValidationSeverity::Error, "nodes", "missing 'nodes' array");
        return Ok(report);
    };

    let mut seen_indexes = HashSet::new();
    let mut used: HashMap<String, usize> = HashMap::new();
    for (position, node) in nodes.iter().enumerate() {
        let context = format!("nodes[{position}]");
        let Some(node) = node.as_object() else {
            report.push(ValidationSeverity::Error, context, "node is not an object");
            continue;
        };
        match node.get("index").and_then(Value::as_u64) {
            Some(index) => {
                if !seen_indexes.insert(index) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.index"),
                        format!("duplicate node index {index}"),
                    );
                }
            }
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.index"),
                "missing non-negative integer 'index'",
            ),
        }
        validate_node(&mut report, &context, node, &instances, &mut used);
    }

    let mut overused: Vec<_> = used
        .iter()
        .filter_map(|(id, count)| {
            instances
                .get(id)
                .filter(|available| *count > **available)
                .map(|available| (id, *count, *available))
        })
        .collect();
    overused.sort();
    for (id, count, available) in overused {
        report.push(
            ValidationSeverity::Warning,
            "traits",
            format!("trait '{id}' is confirmed {count} time(s) but has {available} instance(s)"),
        );
    }

    Ok(report)
}

fn validate_traits(report: &mut ValidationReport, object: &Map<String, Value>) -> HashMap<String, usize> {
    let mut instances = HashMap::new();
    let Some(traits) = object.get("traits") else {
        report.push(
            ValidationSeverity::Warning,
            "traits",
            "no trait pool; every node will have zero possible traits",
        );
        return instances;
    };
    let Some(traits) = traits.as_array() else {
        report.push(ValidationSeverity::Error, "traits", "expected array");
        return instances;
    };

    for (position, entry) in traits.iter().enumerate() {
        let context = format!("traits[{position}]");
        let Some(id) = entry.get("trait").and_then(Value::as_str) else {
            report.push(ValidationSeverity::Error, context, "missing non-empty 'trait'");
            continue;
        };
        if id.trim().is_empty() {
            report.push(ValidationSeverity::Error, context, "missing non-empty 'trait'");
            continue;
        }
        let count = match entry.get("instances") {
            None => 1,
            Some(value) => match value.as_u64() {
                Some(count) => count as usize,
                None => {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}.instances"),
                        "expected non-negative integer",
                    );
                    continue;
                }
            },
        };
        if count == 0 {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.instances"),
                format!("trait '{id}' has zero instances and can never be possible"),
            );
        }
        if let Some(total) = instances.get_mut(id) {
            *total += count;
            report.push(
                ValidationSeverity::Warning,
                context,
                format!("duplicate trait '{id}'; instances are summed"),
            );
        } else {
            instances.insert(id.to_string(), count);
        }
    }
    instances
}

fn string_array(
    report: &mut ValidationReport,
    context: String,
    value: Option<&Value>,
) -> Option<Vec<String>> {
    let items = value?.as_array();
    let Some(items) = items else {
        report.push(ValidationSeverity::Error, context, "expected array of strings");
        return None;
    };
    let mut strings = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(s) => strings.push(s.to_string()),
            None => {
                report.push(ValidationSeverity::Error, context, "expected array of strings");
                return None;
            }
        }
    }
    Some(strings)
}

fn validate_node(
    report: &mut ValidationReport,
    context: &str,
    node: &Map<String, Value>,
    instances: &HashMap<String, usize>,
    used: &mut HashMap<String, usize>,
) {
    let given = string_array(report, format!("{context}.traitsKnown"), node.get("traitsKnown"))
        .unwrap_or_default();
    let solve = string_array(report, format!("{context}.solve"), node.get("solve"));
    let hidden_left = node.get("hiddenLeft").map(Value::as_u64);

    let unknown = match (&solve, hidden_left) {
        (_, Some(None)) => {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.hiddenLeft"),
                "expected non-negative integer",
            );
            return;
        }
        (Some(solve), Some(Some(hidden_left))) => {
            let unknown = solve
                .iter()
                .filter(|slot| slot.as_str() == UNKNOWN_TRAIT || slot.trim().is_empty())
                .count();
            if unknown as u64 != hidden_left {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.hiddenLeft"),
                    format!("hiddenLeft {hidden_left} disagrees with {unknown} unknown solve slot(s)"),
                );
            }
            unknown
        }
        (Some(solve), None) => solve
            .iter()
            .filter(|slot| slot.as_str() == UNKNOWN_TRAIT || slot.trim().is_empty())
            .count(),
        (None, Some(Some(hidden_left))) => hidden_left as usize,
        (None, None) => {
            report.push(
                ValidationSeverity::Error,
                context.to_string(),
                "needs either 'solve' or 'hiddenLeft'",
            );
            return;
        }
    };

    for confirmed in solve.iter().flatten() {
        if confirmed == UNKNOWN_TRAIT || confirmed.trim().is_empty() {
            continue;
        }
        *used.entry(confirmed.clone()).or_default() += 1;
        if !instances.contains_key(confirmed) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.solve"),
                format!("confirmed trait '{confirmed}' is not in the trait pool"),
            );
        }
        if given.contains(confirmed) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.solve"),
                format!("confirmed trait '{confirmed}' is also a given trait"),
            );
        }
    }

    let alpha_test = node.get("alphaTest").and_then(Value::as_str).unwrap_or("");
    if unknown > 0 && alpha_test.trim().is_empty() {
        report.push(
            ValidationSeverity::Info,
            format!("{context}.alphaTest"),
            "no alpha test; alpha exception rule is off for this node",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_snapshot_has_no_errors() {
        let report = validate_puzzle_json(
            r#"{"id":"c","nodes":[{"index":0,"traitsKnown":["a"],"hiddenLeft":1,"alphaTest":"m"}],
                "traits":[{"trait":"b"}]}"#,
        )
        .unwrap();
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn reports_every_problem() {
        let report = validate_puzzle_json(
            r#"{"id":"c","nodes":[
                {"index":0,"solve":["b","?"],"hiddenLeft":2,"alphaTest":"m"},
                {"index":0,"hiddenLeft":1},
                {"index":1,"solve":["zz"],"alphaTest":"m"}
            ],"traits":[{"trait":"b","instances":0}]}"#,
        )
        .unwrap();
        assert!(report.has_errors());
        let messages: Vec<_> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("hiddenLeft 2 disagrees")));
        assert!(messages.iter().any(|m| m.contains("duplicate node index 0")));
        assert!(messages.iter().any(|m| m.contains("'zz' is not in the trait pool")));
        assert!(messages.iter().any(|m| m.contains("confirmed 1 time(s) but has 0")));
        assert_eq!(report.count(ValidationSeverity::Info), 1);
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(validate_puzzle_json("[]").is_err());
    }
}
