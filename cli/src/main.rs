mod cli;
mod commands;

use clap::Parser;
use colored::Colorize;

use std::process::ExitCode;

use crate::cli::{Command, PaillierCli};

fn main() -> ExitCode {
    env_logger::init();

    let args = PaillierCli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {:#}", "error:".bright_red().bold(), error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: PaillierCli) -> anyhow::Result<()> {
    let settings = commands::load_settings(args.config.as_deref())?;
    log::trace!("settings: {:?}", settings);

    match args.cmd {
        Command::Keygen {
            p,
            q,
            out_dir,
            json,
        } => commands::keygen::run(p, q, &out_dir, json, &settings),
        Command::Encrypt {
            image,
            p,
            q,
            key,
            split,
            histogram_expansion,
            optimized_r,
            known_zero_bits,
            output,
        } => commands::encrypt::run(
            commands::encrypt::EncryptArgs {
                image,
                primes: p.zip(q),
                key,
                split,
                histogram_expansion,
                optimized_r,
                known_zero_bits,
                output,
            },
            &settings,
        ),
        Command::Decrypt {
            image,
            key,
            split,
            compressed,
            known_zero_bits,
            histogram_expansion,
            output,
        } => commands::decrypt::run(
            commands::decrypt::DecryptArgs {
                image,
                key,
                split,
                compressed,
                known_zero_bits,
                histogram_expansion,
                output,
            },
            &settings,
        ),
    }
}
