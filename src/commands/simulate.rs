//! `qudit`, `magnetism` and `circuit` subcommands.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use super::{print_json, read_source, RunContext};
use crate::core::quantum::circuit::{simulate, Circuit, CircuitResult};
use crate::core::quantum::magnetism::{EvolutionParams, HamiltonianParams, LatticeKind, MagneticHamiltonian, Vec3};
use crate::core::quantum::qudit::{Qudit, QuditTransform};

#[derive(Serialize)]
struct QuditReport<'a> {
    state: &'a Qudit,
    probabilities: Vec<f64>,
    entropy: f64,
    measured: Option<usize>,
}

pub fn qudit(ctx: &RunContext, dimension: usize, transforms: &[String], measure: bool, seed: Option<u64>) -> Result<()> {
    let parsed = transforms
        .iter()
        .map(|t| t.parse::<QuditTransform>().with_context(|| format!("transform '{}'", t)))
        .collect::<Result<Vec<_>>>()?;
    let state = Qudit::new(dimension)?.apply_all(&parsed)?;

    let (state, measured) = if measure {
        let mut rng = ctx.config.rng(seed);
        let (level, collapsed) = state.measure(&mut rng)?;
        (collapsed, Some(level))
    } else {
        (state, None)
    };

    let report = QuditReport { probabilities: state.probabilities(), entropy: state.entropy(), state: &state, measured };
    if ctx.json {
        return print_json(&report);
    }
    println!("dimension {} after {} transform(s)", dimension, parsed.len());
    for (level, p) in report.probabilities.iter().enumerate() {
        println!("  |{}>  p={:.4}  phase={:.4}", level, p, state.phases()[level]);
    }
    println!("entropy {:.4} bits", report.entropy);
    if let Some(level) = measured {
        println!("measured |{}>", level);
    }
    Ok(())
}

pub struct MagnetismArgs {
    pub lattice: LatticeKind,
    pub width: usize,
    pub height: usize,
    pub periodic: bool,
    pub exchange: f64,
    pub anisotropy: f64,
    pub dm: f64,
    pub field: Option<String>,
    pub steps: usize,
    pub dt: f64,
    pub temperature: f64,
    pub seed: Option<u64>,
}

#[derive(Serialize)]
struct MagnetismReport<'a> {
    sites: usize,
    bonds: usize,
    terms: usize,
    times: &'a [f64],
    magnetization: &'a [Vec3],
    energy: &'a [f64],
    correlations: &'a [Vec<f64>],
}

pub fn parse_field(text: &str) -> Result<Vec3> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|_| anyhow!("field component '{}' is not a number", p.trim())))
        .collect::<Result<Vec<_>>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => bail!("field needs three components x,y,z (got {})", parts.len()),
    }
}

pub fn magnetism(ctx: &RunContext, args: MagnetismArgs) -> Result<()> {
    let field = match &args.field {
        Some(f) => parse_field(f)?,
        None => [0.0; 3],
    };
    let params = HamiltonianParams {
        lattice: args.lattice,
        width: args.width,
        height: args.height,
        periodic: args.periodic,
        exchange: args.exchange,
        anisotropy: args.anisotropy,
        dm_strength: args.dm,
        field,
    };
    let hamiltonian = MagneticHamiltonian::build(&params, ctx.config.simulation.max_sites)?;
    let evolution = EvolutionParams { steps: args.steps, dt: args.dt, temperature: args.temperature, ..Default::default() };
    let mut rng = ctx.config.rng(args.seed);
    let result = hamiltonian.evolve(&evolution, &mut rng)?;

    if ctx.json {
        return print_json(&MagnetismReport {
            sites: hamiltonian.lattice.len(),
            bonds: hamiltonian.lattice.bonds.len(),
            terms: hamiltonian.terms.len(),
            times: &result.times,
            magnetization: &result.magnetization,
            energy: &result.energy,
            correlations: &result.correlations,
        });
    }
    println!(
        "{:?} lattice {}x{}: {} sites, {} bonds, {} terms",
        params.lattice,
        hamiltonian.lattice.width,
        hamiltonian.lattice.height,
        hamiltonian.lattice.len(),
        hamiltonian.lattice.bonds.len(),
        hamiltonian.terms.len()
    );
    let stride = (result.times.len() / 10).max(1);
    println!("{:>8}  {:>8} {:>8} {:>8}  {:>10}", "t", "mx", "my", "mz", "energy");
    for i in (0..result.times.len()).step_by(stride).chain(std::iter::once(result.times.len() - 1)) {
        let m = result.magnetization[i];
        println!("{:>8.3}  {:>8.4} {:>8.4} {:>8.4}  {:>10.4}", result.times[i], m[0], m[1], m[2], result.energy[i]);
        if i == result.times.len() - 1 {
            break;
        }
    }
    Ok(())
}

pub fn circuit(ctx: &RunContext, input: &Path, shots: Option<usize>, seed: Option<u64>) -> Result<()> {
    let text = read_source(input)?;
    let circuit = Circuit::from_json(&text)?;
    run_circuit(ctx, &circuit, shots, seed)
}

pub(crate) fn run_circuit(ctx: &RunContext, circuit: &Circuit, shots: Option<usize>, seed: Option<u64>) -> Result<()> {
    circuit.validate(ctx.config.simulation.max_qubits)?;
    let shots = shots.unwrap_or(ctx.config.simulation.shots);
    let mut rng = ctx.config.rng(seed);
    let result = simulate(circuit, shots, &mut rng)?;
    if ctx.json {
        return print_json(&result);
    }
    print_circuit_result(&result);
    Ok(())
}

fn print_circuit_result(result: &CircuitResult) {
    println!("{:<16} {:>10} {:>8}", "outcome", "p", "count");
    for (bits, p) in &result.probabilities {
        let count = result.counts.get(bits).copied().unwrap_or(0);
        println!("{:<16} {:>10.4} {:>8}", bits, p, count);
    }
    println!("{} shots", result.shots);
}
