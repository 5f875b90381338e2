//! Factory scenario commands.

use atmos_config::{FACTORY_SCENARIO_NAMES, Scenario, find_scenario};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ScenariosArgs {
    #[command(subcommand)]
    command: ScenariosCommand,
}

#[derive(Subcommand)]
enum ScenariosCommand {
    /// List the factory scenarios
    List,

    /// Show the parameters of a factory scenario or scenario file
    Show {
        /// Scenario name or path to a TOML file
        name: String,
    },

    /// Write a factory scenario to a TOML file as a starting point
    Export {
        /// Factory scenario name
        name: String,

        /// Destination file
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: ScenariosArgs) -> anyhow::Result<()> {
    match args.command {
        ScenariosCommand::List => list(),
        ScenariosCommand::Show { name } => show(&name),
        ScenariosCommand::Export {
            name,
            output,
            force,
        } => export(&name, &output, force),
    }
}

fn list() -> anyhow::Result<()> {
    println!("Factory Scenarios\n");
    for name in FACTORY_SCENARIO_NAMES {
        if let Some(scenario) = find_scenario(name) {
            println!("  {:<12} {}", scenario.name, scenario.description);
        }
    }
    Ok(())
}

fn resolve(name: &str) -> anyhow::Result<Scenario> {
    if let Some(factory) = find_scenario(name) {
        return Ok(factory.to_scenario());
    }
    let path = PathBuf::from(name);
    if path.exists() {
        return Ok(Scenario::load(&path)?);
    }
    anyhow::bail!("Unknown scenario '{}'. Run `atmos scenarios list` to see the factory scenarios", name)
}

fn show(name: &str) -> anyhow::Result<()> {
    let scenario = resolve(name)?;
    let main = scenario.main_params();
    let ext = scenario.extended_params();

    println!("{}", scenario.name);
    if let Some(description) = &scenario.description {
        println!("  {}", description);
    }
    println!("\n  Main:");
    println!("    distance     {:>8.2} m", main.distance);
    println!("    room_size    {:>8.2}", main.room_size);
    println!("    brightness   {:>8.2}", main.brightness);
    println!("    width        {:>8.2}", main.width);
    println!("    dry_wet      {:>8.2}", main.dry_wet);
    println!("    intensity    {:>8.2}", main.intensity);
    println!("\n  Extended:");
    println!("    decay_time   {:>8.2} s", ext.decay_time);
    println!("    diffusion    {:>8.2}", ext.diffusion);
    println!("    lofi_amount  {:>8.2}", ext.lofi_amount);
    println!("    modulation   {:>8.2}", ext.modulation);
    Ok(())
}

fn export(name: &str, output: &Path, force: bool) -> anyhow::Result<()> {
    let Some(factory) = find_scenario(name) else {
        anyhow::bail!("Unknown factory scenario '{}'", name);
    };
    if output.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", output.display());
    }
    std::fs::write(output, factory.to_scenario().to_toml()?)?;
    println!("Wrote {} to {}", name, output.display());
    Ok(())
}
