//! Qudit mock: a d-level state kept as parallel amplitude/phase arrays.
//!
//! Amplitudes are non-negative magnitudes; phases are radians in [0, 2π).
//! Every transform is pure and returns a re-normalized copy. This is a
//! demonstration model, not a simulator.

use std::f64::consts::{PI, TAU};
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

use crate::core::error::{Result, SingularisError};
use crate::core::quantum::math::{measure_state, normalize_state, shannon_entropy, sum_of_squares};
use crate::debug_log;

pub const MAX_DIMENSION: usize = 4096;

/// `n` equal amplitudes of `1/sqrt(n)`; empty for `n == 0`.
pub fn generate_initial_state(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / (n as f64).sqrt(); n]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuditTransform {
    /// Generalized Hadamard (discrete Fourier transform over the levels).
    Fourier,
    /// Cyclic level shift `|j⟩ → |j+k mod d⟩`.
    Shift { k: usize },
    /// Clock operator: phase `2πj/d` on level `j`.
    Clock,
    Phase { level: usize, angle: f64 },
    /// Givens rotation mixing the magnitudes of two levels.
    Rotation { a: usize, b: usize, angle: f64 },
    /// Mixes the probabilities toward uniform by `p`.
    Depolarize { p: f64 },
}

impl FromStr for QuditTransform {
    type Err = SingularisError;

    /// `fourier`, `clock`, `shift:K`, `phase:LEVEL:ANGLE`,
    /// `rotate:A:B:ANGLE`, `noise:P`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let bad = || SingularisError::invalid_operation(&format!("unrecognized transform '{}'", s));
        let num = |idx: usize| -> Result<f64> {
            parts.get(idx).and_then(|p| p.parse::<f64>().ok()).ok_or_else(bad)
        };
        let index = |idx: usize| -> Result<usize> {
            parts.get(idx).and_then(|p| p.parse::<usize>().ok()).ok_or_else(bad)
        };
        match parts[0].to_ascii_lowercase().as_str() {
            "fourier" | "hadamard" | "h" => Ok(QuditTransform::Fourier),
            "clock" | "z" => Ok(QuditTransform::Clock),
            "shift" | "x" => Ok(QuditTransform::Shift { k: if parts.len() > 1 { index(1)? } else { 1 } }),
            "phase" => Ok(QuditTransform::Phase { level: index(1)?, angle: num(2)? }),
            "rotate" | "rotation" => Ok(QuditTransform::Rotation { a: index(1)?, b: index(2)?, angle: num(3)? }),
            "noise" | "depolarize" => Ok(QuditTransform::Depolarize { p: num(1)? }),
            _ => Err(bad()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qudit {
    dimension: usize,
    amplitudes: Vec<f64>,
    phases: Vec<f64>,
}

impl Qudit {
    /// Uniform superposition over `dimension` levels.
    pub fn new(dimension: usize) -> Result<Self> {
        check_dimension(dimension)?;
        Ok(Self {
            dimension,
            amplitudes: generate_initial_state(dimension),
            phases: vec![0.0; dimension],
        })
    }

    pub fn basis(dimension: usize, level: usize) -> Result<Self> {
        check_dimension(dimension)?;
        check_level(dimension, level)?;
        let mut amplitudes = vec![0.0; dimension];
        amplitudes[level] = 1.0;
        Ok(Self { dimension, amplitudes, phases: vec![0.0; dimension] })
    }

    /// Builds from raw magnitudes, re-normalizing them.
    pub fn from_amplitudes(amplitudes: &[f64], phases: Option<&[f64]>) -> Result<Self> {
        let dimension = amplitudes.len();
        check_dimension(dimension)?;
        let phases = match phases {
            Some(p) if p.len() != dimension => {
                return Err(SingularisError::invalid_operation(&format!(
                    "{} phases for {} amplitudes",
                    p.len(),
                    dimension
                )))
            }
            Some(p) => p.iter().map(|&x| wrap_phase(x)).collect(),
            None => vec![0.0; dimension],
        };
        let magnitudes: Vec<f64> = amplitudes.iter().map(|a| a.abs()).collect();
        Ok(Self { dimension, amplitudes: normalize_state(&magnitudes)?, phases })
    }

    pub fn dimension(&self) -> usize { self.dimension }
    pub fn amplitudes(&self) -> &[f64] { &self.amplitudes }
    pub fn phases(&self) -> &[f64] { &self.phases }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a * a).collect()
    }

    pub fn norm_squared(&self) -> f64 {
        sum_of_squares(&self.amplitudes)
    }

    pub fn entropy(&self) -> f64 {
        shannon_entropy(&self.probabilities())
    }

    pub fn apply(&self, transform: &QuditTransform) -> Result<Qudit> {
        let d = self.dimension;
        let (mut amplitudes, mut phases) = (self.amplitudes.clone(), self.phases.clone());
        match *transform {
            QuditTransform::Fourier => {
                let scale = 1.0 / (d as f64).sqrt();
                for k in 0..d {
                    let (mut re, mut im) = (0.0, 0.0);
                    for j in 0..d {
                        let theta = self.phases[j] + TAU * (j * k) as f64 / d as f64;
                        re += self.amplitudes[j] * theta.cos();
                        im += self.amplitudes[j] * theta.sin();
                    }
                    amplitudes[k] = scale * re.hypot(im);
                    phases[k] = if amplitudes[k] > 1e-12 { wrap_phase(im.atan2(re)) } else { 0.0 };
                }
            }
            QuditTransform::Shift { k } => {
                let k = k % d;
                for j in 0..d {
                    amplitudes[(j + k) % d] = self.amplitudes[j];
                    phases[(j + k) % d] = self.phases[j];
                }
            }
            QuditTransform::Clock => {
                for (j, phase) in phases.iter_mut().enumerate() {
                    *phase = wrap_phase(*phase + TAU * j as f64 / d as f64);
                }
            }
            QuditTransform::Phase { level, angle } => {
                check_level(d, level)?;
                phases[level] = wrap_phase(phases[level] + angle);
            }
            QuditTransform::Rotation { a, b, angle } => {
                check_level(d, a)?;
                check_level(d, b)?;
                if a == b {
                    return Err(SingularisError::invalid_operation("rotation needs two distinct levels"));
                }
                let (c, s) = (angle.cos(), angle.sin());
                let (xa, xb) = (self.amplitudes[a], self.amplitudes[b]);
                for (level, value) in [(a, c * xa - s * xb), (b, s * xa + c * xb)] {
                    amplitudes[level] = value.abs();
                    if value < 0.0 {
                        phases[level] = wrap_phase(phases[level] + PI);
                    }
                }
            }
            QuditTransform::Depolarize { p } => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(SingularisError::invalid_operation(&format!("noise level {} outside [0, 1]", p)));
                }
                for amp in amplitudes.iter_mut() {
                    *amp = ((1.0 - p) * *amp * *amp + p / d as f64).sqrt();
                }
            }
        }
        let amplitudes = normalize_state(&amplitudes)?;
        debug_log!("qudit: {:?} on d={}", transform, d);
        Ok(Qudit { dimension: d, amplitudes, phases })
    }

    pub fn apply_all(&self, transforms: &[QuditTransform]) -> Result<Qudit> {
        transforms.iter().try_fold(self.clone(), |q, t| q.apply(t))
    }

    /// Samples a level and returns it with the collapsed basis state.
    pub fn measure<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(usize, Qudit)> {
        let level = measure_state(&self.probabilities(), rng)?;
        Ok((level, Qudit::basis(self.dimension, level)?))
    }

    /// `|⟨self|other⟩|²` including phases.
    pub fn fidelity(&self, other: &Qudit) -> Result<f64> {
        if self.dimension != other.dimension {
            return Err(SingularisError::invalid_operation(&format!(
                "fidelity between d={} and d={}",
                self.dimension, other.dimension
            )));
        }
        let (mut re, mut im) = (0.0, 0.0);
        for j in 0..self.dimension {
            let m = self.amplitudes[j] * other.amplitudes[j];
            let dphi = other.phases[j] - self.phases[j];
            re += m * dphi.cos();
            im += m * dphi.sin();
        }
        Ok(re * re + im * im)
    }

    /// Product state of two qudits, level index `i * other.d + j`.
    pub fn tensor(&self, other: &Qudit) -> Result<Qudit> {
        let dimension = self.dimension * other.dimension;
        check_dimension(dimension)?;
        let mut amplitudes = Vec::with_capacity(dimension);
        let mut phases = Vec::with_capacity(dimension);
        for i in 0..self.dimension {
            for j in 0..other.dimension {
                amplitudes.push(self.amplitudes[i] * other.amplitudes[j]);
                phases.push(wrap_phase(self.phases[i] + other.phases[j]));
            }
        }
        Ok(Qudit { dimension, amplitudes: normalize_state(&amplitudes)?, phases })
    }
}

fn check_dimension(dimension: usize) -> Result<()> {
    if !(2..=MAX_DIMENSION).contains(&dimension) {
        return Err(SingularisError::invalid_operation(&format!(
            "qudit dimension must be in 2..={}, got {}",
            MAX_DIMENSION, dimension
        )));
    }
    Ok(())
}

fn check_level(dimension: usize, level: usize) -> Result<()> {
    if level >= dimension {
        return Err(SingularisError::invalid_operation(&format!(
            "level {} out of range for dimension {}",
            level, dimension
        )));
    }
    Ok(())
}

fn wrap_phase(phase: f64) -> f64 {
    phase.rem_euclid(TAU)
}
