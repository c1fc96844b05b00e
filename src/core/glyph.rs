//! G.L.Y.P.H.: a line-oriented emoji mini-syntax for small circuits.
//!
//! ```text
//! 🌌 2          allocate two qubits
//! 🌀 0          Hadamard
//! 🔗 0 1        CNOT control target
//! 🌗 1 pi/4     RZ
//! 📏 0          measure
//! ✨ hello      message
//! ```
//!
//! `🔄 q` is X and `🔀 a b` is SWAP. `#` starts a comment; emoji
//! variation selectors are ignored.

use serde::Serialize;

use crate::core::error::{Result, SingularisError};
use crate::core::quantum::circuit::{Circuit, Gate, GateKind};
use crate::debug_log;

const VARIATION_SELECTORS: [char; 2] = ['\u{FE0E}', '\u{FE0F}'];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GlyphInstruction {
    Allocate { qubits: usize },
    Hadamard { qubit: usize },
    Flip { qubit: usize },
    Phase { qubit: usize, angle: f64 },
    Entangle { control: usize, target: usize },
    Swap { a: usize, b: usize },
    Measure { qubit: usize },
    Message { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphLine {
    pub line: usize,
    pub instruction: GlyphInstruction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlyphProgram {
    pub qubits: usize,
    pub lines: Vec<GlyphLine>,
}

impl GlyphProgram {
    pub fn to_circuit(&self) -> Circuit {
        let mut circuit = Circuit::new(self.qubits);
        for l in &self.lines {
            match &l.instruction {
                GlyphInstruction::Allocate { .. } | GlyphInstruction::Message { .. } => {}
                GlyphInstruction::Hadamard { qubit } => {
                    circuit.push(Gate::new(GateKind::H, vec![*qubit]));
                }
                GlyphInstruction::Flip { qubit } => {
                    circuit.push(Gate::new(GateKind::X, vec![*qubit]));
                }
                GlyphInstruction::Phase { qubit, angle } => {
                    circuit.push(Gate::rotation(GateKind::Rz, *qubit, *angle));
                }
                GlyphInstruction::Entangle { control, target } => {
                    circuit.push(Gate::new(GateKind::Cnot, vec![*control, *target]));
                }
                GlyphInstruction::Swap { a, b } => {
                    circuit.push(Gate::new(GateKind::Swap, vec![*a, *b]));
                }
                GlyphInstruction::Measure { qubit } => {
                    circuit.push(Gate::new(GateKind::Measure, vec![*qubit]));
                }
            }
        }
        circuit
    }

    pub fn messages(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match &l.instruction {
                GlyphInstruction::Message { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

pub fn parse_glyph(source: &str) -> Result<GlyphProgram> {
    let mut program = GlyphProgram::default();
    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let cleaned: String = raw.chars().filter(|c| !VARIATION_SELECTORS.contains(c)).collect();
        let line = cleaned.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut chars = line.chars();
        let glyph = match chars.next() {
            Some(g) => g,
            None => continue,
        };
        let rest = chars.as_str().trim();

        let instruction = if glyph == '✨' {
            GlyphInstruction::Message { text: rest.to_string() }
        } else {
            let args: Vec<&str> = strip_comment(rest).split_whitespace().collect();
            match glyph {
                '🌌' => {
                    if program.qubits > 0 {
                        return Err(SingularisError::glyph(line_no, "qubits already allocated"));
                    }
                    let [n] = expect_args::<1>(line_no, glyph, &args)?;
                    let qubits = parse_count(line_no, n)?;
                    if qubits == 0 {
                        return Err(SingularisError::glyph(line_no, "allocate at least one qubit"));
                    }
                    program.qubits = qubits;
                    GlyphInstruction::Allocate { qubits }
                }
                '🌀' => {
                    let [q] = expect_args::<1>(line_no, glyph, &args)?;
                    GlyphInstruction::Hadamard { qubit: qubit(line_no, &program, q)? }
                }
                '🔄' => {
                    let [q] = expect_args::<1>(line_no, glyph, &args)?;
                    GlyphInstruction::Flip { qubit: qubit(line_no, &program, q)? }
                }
                '🌗' => {
                    let [q, a] = expect_args::<2>(line_no, glyph, &args)?;
                    GlyphInstruction::Phase { qubit: qubit(line_no, &program, q)?, angle: parse_angle(line_no, a)? }
                }
                '🔗' => {
                    let [c, t] = expect_args::<2>(line_no, glyph, &args)?;
                    let (control, target) = (qubit(line_no, &program, c)?, qubit(line_no, &program, t)?);
                    if control == target {
                        return Err(SingularisError::glyph(line_no, "cannot entangle a qubit with itself"));
                    }
                    GlyphInstruction::Entangle { control, target }
                }
                '🔀' => {
                    let [a, b] = expect_args::<2>(line_no, glyph, &args)?;
                    let (a, b) = (qubit(line_no, &program, a)?, qubit(line_no, &program, b)?);
                    if a == b {
                        return Err(SingularisError::glyph(line_no, "cannot swap a qubit with itself"));
                    }
                    GlyphInstruction::Swap { a, b }
                }
                '📏' => {
                    let [q] = expect_args::<1>(line_no, glyph, &args)?;
                    GlyphInstruction::Measure { qubit: qubit(line_no, &program, q)? }
                }
                other => {
                    return Err(SingularisError::glyph(line_no, &format!("unknown glyph '{}'", other)));
                }
            }
        };
        program.lines.push(GlyphLine { line: line_no, instruction });
    }
    debug_log!("glyph: {} qubits, {} instructions", program.qubits, program.lines.len());
    Ok(program)
}

fn strip_comment(s: &str) -> &str {
    match s.find('#') {
        Some(i) => &s[..i],
        None => s,
    }
}

fn expect_args<'a, const N: usize>(line: usize, glyph: char, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&'a str; N]>::try_from(args).map_err(|_| {
        SingularisError::glyph(line, &format!("'{}' takes {} argument(s), got {}", glyph, N, args.len()))
    })
}

fn parse_count(line: usize, text: &str) -> Result<usize> {
    text.parse::<usize>()
        .map_err(|_| SingularisError::glyph(line, &format!("'{}' is not a qubit count", text)))
}

fn qubit(line: usize, program: &GlyphProgram, text: &str) -> Result<usize> {
    if program.qubits == 0 {
        return Err(SingularisError::glyph(line, "no qubits allocated (start with 🌌 N)"));
    }
    let q = text
        .strip_prefix('q')
        .unwrap_or(text)
        .parse::<usize>()
        .map_err(|_| SingularisError::glyph(line, &format!("'{}' is not a qubit index", text)))?;
    if q >= program.qubits {
        return Err(SingularisError::glyph(
            line,
            &format!("qubit {} out of range (allocated {})", q, program.qubits),
        ));
    }
    Ok(q)
}

/// Accepts plain numbers and `pi` forms: `pi`, `-pi`, `pi/4`, `2pi`, `3*pi/2`.
fn parse_angle(line: usize, text: &str) -> Result<f64> {
    let bad = || SingularisError::glyph(line, &format!("'{}' is not an angle", text));
    if let Ok(v) = text.parse::<f64>() {
        return if v.is_finite() { Ok(v) } else { Err(bad()) };
    }
    let lower = text.to_ascii_lowercase();
    let (numerator, denominator) = match lower.split_once('/') {
        Some((n, d)) => (n, Some(d)),
        None => (lower.as_str(), None),
    };
    let pi_at = numerator.find("pi").ok_or_else(bad)?;
    if pi_at + 2 != numerator.len() {
        return Err(bad());
    }
    let coeff = numerator[..pi_at].trim_end_matches('*');
    let coeff = match coeff {
        "" | "+" => 1.0,
        "-" => -1.0,
        c => c.parse::<f64>().map_err(|_| bad())?,
    };
    let divisor = match denominator {
        Some(d) => d.parse::<f64>().map_err(|_| bad())?,
        None => 1.0,
    };
    if divisor == 0.0 {
        return Err(bad());
    }
    Ok(coeff * std::f64::consts::PI / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn angles() {
        assert_eq!(parse_angle(1, "0.5").unwrap(), 0.5);
        assert!((parse_angle(1, "pi/4").unwrap() - PI / 4.0).abs() < 1e-12);
        assert!((parse_angle(1, "-pi").unwrap() + PI).abs() < 1e-12);
        assert!((parse_angle(1, "3*pi/2").unwrap() - 1.5 * PI).abs() < 1e-12);
        assert!(parse_angle(1, "tau").is_err());
        assert!(parse_angle(1, "pi/0").is_err());
    }

    #[test]
    fn variation_selectors_are_ignored() {
        let program = parse_glyph("🌌\u{FE0F} 1\n🔄\u{FE0F} 0").unwrap();
        assert_eq!(program.lines[1].instruction, GlyphInstruction::Flip { qubit: 0 });
    }

    #[test]
    fn comments_and_messages() {
        let program = parse_glyph("# header\n🌌 2 # two qubits\n✨ keep # this\n").unwrap();
        assert_eq!(program.qubits, 2);
        assert_eq!(program.messages(), vec!["keep # this"]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = parse_glyph("🌌 1\n\n🌀 3").unwrap_err();
        assert!(matches!(err, SingularisError::Glyph { line: 3, .. }));
        let err = parse_glyph("🌀 0").unwrap_err();
        assert!(matches!(err, SingularisError::Glyph { line: 1, .. }));
        let err = parse_glyph("🌌 2\n🦄 0").unwrap_err();
        assert_eq!(err.to_string(), "Glyph Error (line 2): unknown glyph '🦄'");
    }
}
