use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use super::simulate::run_circuit;
use super::{print_json, read_source, Reported, RunContext};
use crate::core::diagnostics::{print_error, Span};
use crate::core::error::SingularisError;
use crate::core::glyph::{parse_glyph, GlyphProgram};
use crate::core::quantum::circuit::{simulate, CircuitResult};

#[derive(Serialize)]
struct GlyphReport<'a> {
    program: &'a GlyphProgram,
    messages: Vec<&'a str>,
    result: Option<CircuitResult>,
}

pub fn glyph(ctx: &RunContext, input: &Path, shots: Option<usize>, seed: Option<u64>) -> Result<()> {
    let source = read_source(input)?;
    let program = match parse_glyph(&source) {
        Ok(p) => p,
        Err(SingularisError::Glyph { line, message }) if ctx.pretty_errors => {
            print_error(&input.display().to_string(), &source, &message, Span::single(line, 1));
            return Err(Reported(SingularisError::Glyph { line, message }.into()).into());
        }
        Err(e) => return Err(e.into()),
    };
    // a program of only ✨ lines has no register to simulate
    let circuit = (program.qubits > 0).then(|| program.to_circuit());

    if ctx.json {
        let result = match &circuit {
            Some(circuit) => {
                circuit.validate(ctx.config.simulation.max_qubits)?;
                let mut rng = ctx.config.rng(seed);
                Some(simulate(circuit, shots.unwrap_or(ctx.config.simulation.shots), &mut rng)?)
            }
            None => None,
        };
        return print_json(&GlyphReport { program: &program, messages: program.messages(), result });
    }

    for message in program.messages() {
        println!("{} {}", "✨".bright_magenta(), message);
    }
    match &circuit {
        Some(circuit) => run_circuit(ctx, circuit, shots, seed),
        None => Ok(()),
    }
}
