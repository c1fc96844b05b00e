use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::quantum::magnetism::LatticeKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LatticeArg {
    Chain,
    Square,
    Triangular,
    Honeycomb,
}

impl From<LatticeArg> for LatticeKind {
    fn from(arg: LatticeArg) -> Self {
        match arg {
            LatticeArg::Chain => LatticeKind::Chain,
            LatticeArg::Square => LatticeKind::Square,
            LatticeArg::Triangular => LatticeKind::Triangular,
            LatticeArg::Honeycomb => LatticeKind::Honeycomb,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "singularis",
    about = "Singularis Prime: parse, compile, and simulate .sp programs",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct SingularisCli {
    /// Global: pretty diagnostics
    #[arg(long = "pretty-errors", action = ArgAction::SetTrue, global = true)]
    pub pretty_errors: bool,

    /// Global: print results as JSON
    #[arg(long = "json", action = ArgAction::SetTrue, global = true)]
    pub json: bool,

    /// Global: path to config (TOML); default: ~/.singularis/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dump the token stream of a source file
    Tokens {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse a source file and print its declarations
    Parse {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Compile a source file to readable bytecode
    ///
    /// Examples:
    ///   singularis compile guard.sp -o guard.spb
    ///   singularis compile guard.sp --stdout
    Compile {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output file (short: -o). Defaults to the input with a .spb extension.
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
        /// Print bytecode instead of writing a file
        #[arg(long = "stdout", action = ArgAction::SetTrue)]
        stdout: bool,
    },

    /// Build a qudit and apply transforms
    ///
    /// Transforms: fourier, clock, shift[:K], phase:LEVEL:ANGLE,
    /// rotate:A:B:ANGLE, noise:P
    Qudit {
        #[arg(long = "dimension", short = 'd', value_name = "N")]
        dimension: usize,
        #[arg(long = "transform", short = 't', value_name = "T")]
        transforms: Vec<String>,
        /// Sample one outcome after the transforms
        #[arg(long = "measure", action = ArgAction::SetTrue)]
        measure: bool,
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,
    },

    /// Toy spin-lattice evolution
    Magnetism {
        #[arg(long = "lattice", value_enum, default_value_t = LatticeArg::Square)]
        lattice: LatticeArg,
        #[arg(long = "width", default_value_t = 4)]
        width: usize,
        #[arg(long = "height", default_value_t = 4)]
        height: usize,
        #[arg(long = "steps", default_value_t = 100)]
        steps: usize,
        #[arg(long = "dt", default_value_t = 0.05)]
        dt: f64,
        #[arg(long = "temperature", default_value_t = 0.0)]
        temperature: f64,
        #[arg(long = "exchange", default_value_t = 1.0, allow_hyphen_values = true)]
        exchange: f64,
        #[arg(long = "anisotropy", default_value_t = 0.0, allow_hyphen_values = true)]
        anisotropy: f64,
        #[arg(long = "dm", default_value_t = 0.0, allow_hyphen_values = true)]
        dm: f64,
        /// External field as x,y,z
        #[arg(long = "field", value_name = "X,Y,Z", allow_hyphen_values = true)]
        field: Option<String>,
        /// Open boundaries instead of periodic
        #[arg(long = "open", action = ArgAction::SetTrue)]
        open: bool,
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,
    },

    /// Simulate a JSON circuit description
    Circuit {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        #[arg(long = "shots", value_name = "N")]
        shots: Option<usize>,
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,
    },

    /// Run a G.L.Y.P.H. program
    Glyph {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        #[arg(long = "shots", value_name = "N")]
        shots: Option<usize>,
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,
    },

    /// AI helpers (fall back to local heuristics)
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum AiAction {
    /// Explain a source file
    Explain {
        #[arg(value_name = "FILE")]
        input: PathBuf,
        #[arg(long = "provider", value_name = "NAME")]
        provider: Option<String>,
    },
    /// Ask a question, optionally about a file
    Assist {
        #[arg(value_name = "QUESTION")]
        question: String,
        #[arg(long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
        #[arg(long = "provider", value_name = "NAME")]
        provider: Option<String>,
    },
    /// List available providers
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        SingularisCli::command().debug_assert();
    }

    #[test]
    fn repeated_transforms() {
        let cli = SingularisCli::parse_from(["singularis", "qudit", "-d", "3", "-t", "fourier", "-t", "shift:1"]);
        match cli.cmd {
            Command::Qudit { dimension, transforms, .. } => {
                assert_eq!(dimension, 3);
                assert_eq!(transforms, vec!["fourier", "shift:1"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
