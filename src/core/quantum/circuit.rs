//! Mock circuit simulator.
//!
//! Every qubit is tracked as its own Bloch vector. Single-qubit gates are
//! exact rotations of that vector; two-qubit gates mix classically using the
//! control's excitation probability, so entanglement is only approximated.
//! The reported joint distribution is the product of the per-qubit
//! marginals.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SingularisError};
use crate::debug_log;

pub const DEFAULT_MAX_QUBITS: usize = 12;
/// Absolute ceiling regardless of configuration; the joint table has 2^n rows.
pub const HARD_QUBIT_LIMIT: usize = 16;
pub const MAX_SHOTS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    Rx,
    Ry,
    Rz,
    Cnot,
    Cz,
    Swap,
    Measure,
}

impl GateKind {
    pub fn arity(self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Cz | GateKind::Swap => 2,
            _ => 1,
        }
    }

    pub fn takes_angle(self) -> bool {
        matches!(self, GateKind::Rx | GateKind::Ry | GateKind::Rz)
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::Rx => "RX",
            GateKind::Ry => "RY",
            GateKind::Rz => "RZ",
            GateKind::Cnot => "CNOT",
            GateKind::Cz => "CZ",
            GateKind::Swap => "SWAP",
            GateKind::Measure => "MEASURE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GateSpec")]
pub struct Gate {
    #[serde(rename = "gate")]
    pub kind: GateKind,
    pub qubits: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

/// Wire form: either `qubits: [..]` or the designer's `control`/`target` pair.
#[derive(Deserialize)]
struct GateSpec {
    #[serde(alias = "type")]
    gate: GateKind,
    #[serde(default)]
    qubits: Vec<usize>,
    control: Option<usize>,
    target: Option<usize>,
    angle: Option<f64>,
}

impl From<GateSpec> for Gate {
    fn from(spec: GateSpec) -> Self {
        let qubits = if spec.qubits.is_empty() {
            spec.control.into_iter().chain(spec.target).collect()
        } else {
            spec.qubits
        };
        Gate { kind: spec.gate, qubits, angle: spec.angle }
    }
}

impl Gate {
    pub fn new(kind: GateKind, qubits: Vec<usize>) -> Self {
        Gate { kind, qubits, angle: None }
    }

    pub fn rotation(kind: GateKind, qubit: usize, angle: f64) -> Self {
        Gate { kind, qubits: vec![qubit], angle: Some(angle) }
    }
}

/// JSON shape: `{"qubits": 2, "gates": [{"gate": "H", "qubits": [0]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub qubits: usize,
    #[serde(default)]
    pub gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(qubits: usize) -> Self {
        Circuit { qubits, gates: Vec::new() }
    }

    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| SingularisError::Parse(format!("invalid circuit JSON: {}", e)))
    }

    pub fn validate(&self, max_qubits: usize) -> Result<()> {
        if self.qubits == 0 {
            return Err(SingularisError::simulation("circuit needs at least one qubit"));
        }
        let limit = max_qubits.min(HARD_QUBIT_LIMIT);
        if self.qubits > limit {
            return Err(SingularisError::simulation(&format!(
                "circuit uses {} qubits, limit is {}",
                self.qubits, limit
            )));
        }
        for (i, gate) in self.gates.iter().enumerate() {
            let fail = |msg: String| SingularisError::simulation(&format!("gate #{} ({}): {}", i, gate.kind, msg));
            if gate.qubits.len() != gate.kind.arity() {
                return Err(fail(format!(
                    "expects {} qubit(s), got {}",
                    gate.kind.arity(),
                    gate.qubits.len()
                )));
            }
            if let Some(&q) = gate.qubits.iter().find(|&&q| q >= self.qubits) {
                return Err(fail(format!("qubit {} out of range", q)));
            }
            if gate.kind.arity() == 2 && gate.qubits[0] == gate.qubits[1] {
                return Err(fail("control and target must differ".to_string()));
            }
            if gate.kind.takes_angle() {
                match gate.angle {
                    Some(a) if a.is_finite() => {}
                    _ => return Err(fail("missing or non-finite angle".to_string())),
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitResult {
    /// Bitstring (qubit 0 leftmost) to probability; zero rows omitted.
    pub probabilities: BTreeMap<String, f64>,
    pub counts: BTreeMap<String, usize>,
    /// Probability of reading 1 on each qubit.
    pub qubit_probabilities: Vec<f64>,
    pub bloch: Vec<[f64; 3]>,
    pub shots: usize,
}

pub fn simulate<R: Rng + ?Sized>(circuit: &Circuit, shots: usize, rng: &mut R) -> Result<CircuitResult> {
    circuit.validate(HARD_QUBIT_LIMIT)?;
    if shots > MAX_SHOTS {
        return Err(SingularisError::simulation(&format!("shots must be <= {}", MAX_SHOTS)));
    }

    let mut bloch = vec![[0.0, 0.0, 1.0]; circuit.qubits];
    for gate in &circuit.gates {
        apply_gate(&mut bloch, gate);
    }
    let marginals: Vec<f64> = bloch.iter().map(|r| excitation(*r)).collect();

    let n = circuit.qubits;
    let mut probabilities = BTreeMap::new();
    for index in 0..(1usize << n) {
        let mut p = 1.0;
        let mut bits = String::with_capacity(n);
        for (q, &p1) in marginals.iter().enumerate() {
            if (index >> (n - 1 - q)) & 1 == 1 {
                p *= p1;
                bits.push('1');
            } else {
                p *= 1.0 - p1;
                bits.push('0');
            }
        }
        if p > 1e-15 {
            probabilities.insert(bits, p);
        }
    }

    let mut counts = BTreeMap::new();
    for _ in 0..shots {
        let bits: String = marginals
            .iter()
            .map(|&p1| if rng.gen::<f64>() < p1 { '1' } else { '0' })
            .collect();
        *counts.entry(bits).or_insert(0) += 1;
    }
    debug_log!(
        "circuit: {} qubits, {} gates, {} nonzero outcomes, {} shots",
        n,
        circuit.gates.len(),
        probabilities.len(),
        shots
    );

    Ok(CircuitResult { probabilities, counts, qubit_probabilities: marginals, bloch, shots })
}

fn excitation(r: [f64; 3]) -> f64 {
    ((1.0 - r[2]) / 2.0).clamp(0.0, 1.0)
}

fn rotate_x(r: [f64; 3], theta: f64) -> [f64; 3] {
    let (s, c) = theta.sin_cos();
    [r[0], r[1] * c - r[2] * s, r[1] * s + r[2] * c]
}

fn rotate_y(r: [f64; 3], theta: f64) -> [f64; 3] {
    let (s, c) = theta.sin_cos();
    [r[0] * c + r[2] * s, r[1], -r[0] * s + r[2] * c]
}

fn rotate_z(r: [f64; 3], theta: f64) -> [f64; 3] {
    let (s, c) = theta.sin_cos();
    [r[0] * c - r[1] * s, r[0] * s + r[1] * c, r[2]]
}

fn apply_gate(bloch: &mut [[f64; 3]], gate: &Gate) {
    let q = gate.qubits[0];
    let angle = gate.angle.unwrap_or(0.0);
    match gate.kind {
        GateKind::H => {
            let [x, y, z] = bloch[q];
            bloch[q] = [z, -y, x];
        }
        GateKind::X => bloch[q] = [bloch[q][0], -bloch[q][1], -bloch[q][2]],
        GateKind::Y => bloch[q] = [-bloch[q][0], bloch[q][1], -bloch[q][2]],
        GateKind::Z => bloch[q] = [-bloch[q][0], -bloch[q][1], bloch[q][2]],
        GateKind::S => bloch[q] = rotate_z(bloch[q], FRAC_PI_2),
        GateKind::T => bloch[q] = rotate_z(bloch[q], FRAC_PI_4),
        GateKind::Rx => bloch[q] = rotate_x(bloch[q], angle),
        GateKind::Ry => bloch[q] = rotate_y(bloch[q], angle),
        GateKind::Rz => bloch[q] = rotate_z(bloch[q], angle),
        GateKind::Cnot => {
            let (c, t) = (q, gate.qubits[1]);
            let (rc, rt) = (bloch[c], bloch[t]);
            let p = excitation(rc);
            // target: mixture of itself and its X image
            bloch[t] = [rt[0], (1.0 - 2.0 * p) * rt[1], (1.0 - 2.0 * p) * rt[2]];
            // control coherence survives only as far as the target is an X eigenstate
            bloch[c] = [rc[0] * rt[0], rc[1] * rt[0], rc[2]];
        }
        GateKind::Cz => {
            let (a, b) = (q, gate.qubits[1]);
            let (ra, rb) = (bloch[a], bloch[b]);
            let (pa, pb) = (excitation(ra), excitation(rb));
            bloch[a] = [ra[0] * (1.0 - 2.0 * pb), ra[1] * (1.0 - 2.0 * pb), ra[2]];
            bloch[b] = [rb[0] * (1.0 - 2.0 * pa), rb[1] * (1.0 - 2.0 * pa), rb[2]];
        }
        GateKind::Swap => bloch.swap(q, gate.qubits[1]),
        GateKind::Measure => bloch[q] = [0.0, 0.0, bloch[q][2]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn run(circuit: &Circuit) -> CircuitResult {
        let mut rng = StdRng::seed_from_u64(1);
        simulate(circuit, 200, &mut rng).unwrap()
    }

    #[test]
    fn fresh_register_reads_zero() {
        let r = run(&Circuit::new(3));
        assert_eq!(r.probabilities.len(), 1);
        assert!((r.probabilities["000"] - 1.0).abs() < 1e-12);
        assert_eq!(r.counts["000"], 200);
    }

    #[test]
    fn hadamard_is_even() {
        let mut c = Circuit::new(1);
        c.push(Gate::new(GateKind::H, vec![0]));
        let r = run(&c);
        assert!((r.probabilities["0"] - 0.5).abs() < 1e-12);
        assert!((r.probabilities["1"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn x_then_swap_moves_excitation() {
        let mut c = Circuit::new(2);
        c.push(Gate::new(GateKind::X, vec![0])).push(Gate::new(GateKind::Swap, vec![0, 1]));
        let r = run(&c);
        assert!((r.probabilities["01"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cnot_on_excited_control_flips_target() {
        let mut c = Circuit::new(2);
        c.push(Gate::new(GateKind::X, vec![0])).push(Gate::new(GateKind::Cnot, vec![0, 1]));
        let r = run(&c);
        assert!((r.probabilities["11"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ry_pi_excites() {
        let mut c = Circuit::new(1);
        c.push(Gate::rotation(GateKind::Ry, 0, std::f64::consts::PI));
        let r = run(&c);
        assert!((r.qubit_probabilities[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_bad_gates() {
        let mut c = Circuit::new(2);
        c.push(Gate::new(GateKind::Cnot, vec![1, 1]));
        assert!(c.validate(12).is_err());
        let mut c = Circuit::new(2);
        c.push(Gate::new(GateKind::Rx, vec![0]));
        assert!(c.validate(12).is_err());
        assert!(Circuit::new(13).validate(12).is_err());
        assert!(Circuit::new(0).validate(12).is_err());
    }

    #[test]
    fn json_gate_names_are_uppercase() {
        let c = Circuit::from_json(r#"{"qubits":2,"gates":[{"gate":"H","qubits":[0]},{"gate":"CNOT","qubits":[0,1]},{"gate":"RZ","qubits":[1],"angle":0.5}]}"#).unwrap();
        assert_eq!(c.gates[1].kind, GateKind::Cnot);
        assert_eq!(c.gates[2].angle, Some(0.5));
        assert!(Circuit::from_json(r#"{"qubits":1,"gates":[{"gate":"FOO","qubits":[0]}]}"#).is_err());
    }
}
