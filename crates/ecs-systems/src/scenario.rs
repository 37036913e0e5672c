//! Flat scenario records: `<KEY> <field> <value> <field> <value> ...`.
//!
//! Parsing is deliberately loose. A missing field leaves the component's
//! value untouched; unknown fields, malformed values and a dangling trailing
//! token are skipped.

use core::fmt;

use ecs_core::numeric::ensure_finite;
use tracing::debug;

/// Record keys written by the ECS components.
pub mod keys {
    pub const CABIN_PRESSURE_REGULATOR: &str = "CABINPRESSUREREGULATOR";
    pub const O2_DEMAND_REGULATOR: &str = "O2DEMANDREGULATOR";
    /// Followed by the valve's instance index.
    pub const CABIN_PRESSURE_RELIEF_VALVE: &str = "CABINPRESSURERELIEFVALVE";
    pub const SUIT_CIRCUIT_RETURN_VALVE: &str = "SUITCIRCUITRETURNVALVE";
    pub const O2_SM_SUPPLY: &str = "O2SMSUPPLY";
    pub const CREW_STATUS: &str = "CREWSTATUS";
}

/// One parsed scenario line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRecord<'a> {
    key: &'a str,
    fields: Vec<(&'a str, &'a str)>,
}

impl<'a> ScenarioRecord<'a> {
    /// Parse a line. Returns `None` for blank lines and `#` comments.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let mut tokens = line.split_whitespace();
        let key = tokens.next()?;
        let mut fields = Vec::new();
        loop {
            match (tokens.next(), tokens.next()) {
                (Some(name), Some(value)) => fields.push((name, value)),
                (Some(name), None) => {
                    debug!(record = key, token = name, "dangling scenario token ignored");
                    break;
                }
                _ => break,
            }
        }
        Some(Self { key, fields })
    }

    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn fields(&self) -> &[(&'a str, &'a str)] {
        &self.fields
    }

    /// Raw value of the last occurrence of `name` (case-insensitive).
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        let raw = self.raw(name)?;
        let parsed = match raw {
            "1" => Some(true),
            "0" => Some(false),
            _ if raw.eq_ignore_ascii_case("true") => Some(true),
            _ if raw.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        };
        self.note_malformed(name, raw, parsed)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        let raw = self.raw(name)?;
        self.note_malformed(name, raw, raw.parse().ok())
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        let raw = self.raw(name)?;
        let parsed = raw
            .parse::<f64>()
            .ok()
            .and_then(|v| ensure_finite(v, "scenario value").ok());
        self.note_malformed(name, raw, parsed)
    }

    fn note_malformed<T>(&self, name: &str, raw: &str, parsed: Option<T>) -> Option<T> {
        if parsed.is_none() {
            debug!(record = self.key, field = name, value = raw, "malformed scenario value ignored");
        }
        parsed
    }
}

/// A persisted field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Real(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", u8::from(*b)),
            FieldValue::Int(i) => write!(f, "{i}"),
            // Shortest representation that parses back to the same bits.
            FieldValue::Real(r) => write!(f, "{r}"),
        }
    }
}

/// Accumulates scenario lines.
#[derive(Debug, Clone, Default)]
pub struct ScenarioWriter {
    lines: Vec<String>,
}

impl ScenarioWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record line.
    pub fn record(&mut self, key: &str, fields: &[(&str, FieldValue)]) {
        let mut line = String::from(key);
        for (name, value) in fields {
            line.push(' ');
            line.push_str(name);
            line.push(' ');
            line.push_str(&value.to_string());
        }
        self.lines.push(line);
    }

    /// Append a raw line (section markers and the like).
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Join all lines with trailing newlines.
    pub fn into_string(self) -> String {
        let mut out = String::new();
        for line in self.lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
