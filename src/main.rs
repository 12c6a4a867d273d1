use galsim::{total_momentum, Scenario, ScenarioConfig};
use galsim::{bench_solvers, bench_step_curve};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file name under the scenarios/ directory
    #[arg(short, default_value = "galaxy.yaml")]
    file_name: String,

    /// Run the solver benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,

    /// Emit the fine-grained benchmark curve as CSV
    #[arg(long)]
    bench_curve: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("opening scenario {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig =
        serde_yaml::from_reader(reader).context("parsing scenario YAML")?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_solvers();
        return Ok(());
    }
    if args.bench_curve {
        bench_step_curve();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    let steps = (scenario.t_end / scenario.dt).ceil() as usize;
    println!(
        "{} bodies, {} steps of dt = {}",
        scenario.engine.bodies().len(),
        steps,
        scenario.dt
    );

    for step in 0..steps {
        scenario.engine.step(scenario.dt);

        if step % 60 == 0 {
            let bodies = scenario.engine.bodies();
            let p = total_momentum(bodies);
            println!(
                "t = {:9.3}  |p| = {:12.4}  tree nodes = {}",
                scenario.engine.time(),
                p.norm(),
                scenario.engine.nodes().len()
            );
        }
    }

    Ok(())
}
