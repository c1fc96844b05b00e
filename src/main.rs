/// Singularis Prime CLI: subcommand dispatch over the library crate.
use clap::Parser; // trait import enables SingularisCli::parse()
use colored::Colorize;

use singularis_prime::cli::{AiAction, Command, SingularisCli};
use singularis_prime::commands::{self, simulate::MagnetismArgs, RunContext};
use singularis_prime::config::SingularisConfig;
use singularis_prime::debug_log;

fn run(args: SingularisCli) -> anyhow::Result<()> {
    let config = SingularisConfig::load_resolved(&args.config)?;
    debug_log!("config: {:?}", config);
    let ctx = RunContext { config, json: args.json, pretty_errors: args.pretty_errors };

    match args.cmd {
        Command::Tokens { input } => commands::tokens::tokens(&ctx, &input),
        Command::Parse { input } => commands::tokens::parse(&ctx, &input),
        Command::Compile { input, out, stdout } => commands::compile::compile(&ctx, &input, out, stdout),
        Command::Qudit { dimension, transforms, measure, seed } => {
            commands::simulate::qudit(&ctx, dimension, &transforms, measure, seed)
        }
        Command::Magnetism {
            lattice,
            width,
            height,
            steps,
            dt,
            temperature,
            exchange,
            anisotropy,
            dm,
            field,
            open,
            seed,
        } => commands::simulate::magnetism(
            &ctx,
            MagnetismArgs {
                lattice: lattice.into(),
                width,
                height,
                periodic: !open,
                exchange,
                anisotropy,
                dm,
                field,
                steps,
                dt,
                temperature,
                seed,
            },
        ),
        Command::Circuit { input, shots, seed } => commands::simulate::circuit(&ctx, &input, shots, seed),
        Command::Glyph { input, shots, seed } => commands::glyph::glyph(&ctx, &input, shots, seed),
        Command::Ai { action } => match action {
            AiAction::Explain { input, provider } => commands::ai::explain(&ctx, &input, &provider),
            AiAction::Assist { question, file, provider } => {
                commands::ai::assist(&ctx, &question, file.as_deref(), &provider)
            }
            AiAction::List => commands::ai::list(&ctx),
        },
    }
}

fn main() {
    let args = SingularisCli::parse();
    if let Err(e) = run(args) {
        if e.downcast_ref::<commands::Reported>().is_none() {
            eprintln!("{} {:#}", "error:".bright_red().bold(), e);
        }
        std::process::exit(1);
    }
}
