//! aixi: CLI for the MC-AIXI agent.
//!
//! `aixi run --config <file.yaml>` drives the agent/environment interaction
//! loop: percept in, search (or explore), action out, one CSV record per
//! cycle, and a JSON summary at the end.

mod config;

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use aixi_agent::Agent;
use aixi_core::{AgentRng, EnvSpec, Environment};
use aixi_logging::{write_summary_atomic, CycleRecordV1, CycleWriter, RunSummaryV1};

use crate::config::RunConfig;

fn print_help() {
    eprintln!(
        r#"aixi - MC-AIXI-CTW reference agent

USAGE:
    aixi run --config <file.yaml> [--log <file.csv>] [--verbose]

COMMANDS:
    run                 Run the agent/environment interaction loop

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version
"#
    );
}

fn print_version() {
    println!("aixi {}", env!("CARGO_PKG_VERSION"));
}

fn cmd_run(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut log_path: Option<String> = None;
    let mut verbose = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"aixi run

USAGE:
    aixi run --config <file.yaml> [--log <file.csv>] [--verbose]

OPTIONS:
    --config PATH   Path to the YAML run configuration (required)
    --log PATH      Write per-cycle CSV records to PATH; a JSON summary
                    lands next to it
    --verbose       Print every cycle and the environment state
"#
                );
                return;
            }
            "--config" => {
                config_path = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            "--log" => {
                log_path = Some(args.get(i + 1).cloned().unwrap_or_default());
                i += 2;
            }
            "--verbose" => {
                verbose = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `aixi run`: {other}");
                eprintln!("Run `aixi run --help` for usage.");
                process::exit(1);
            }
        }
    }

    let config_path = config_path.unwrap_or_else(|| {
        eprintln!("Missing --config");
        process::exit(1);
    });
    let config = RunConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Failed to load config at {config_path}: {e}");
        process::exit(1);
    });

    let mut rng = AgentRng::seed_from_u64(config.random_seed);
    let mut env = aixi_env::build(&config.environment, &mut rng).unwrap_or_else(|e| {
        eprintln!("Failed to build environment: {e}");
        process::exit(1);
    });
    let mut agent = Agent::new(&config.agent, EnvSpec::of(env.as_ref())).unwrap_or_else(|e| {
        eprintln!("Invalid agent configuration: {e}");
        process::exit(1);
    });

    let mut writer = log_path.as_ref().map(|path| {
        CycleWriter::create_with_flush(path, 64).unwrap_or_else(|e| {
            eprintln!("Failed to create log at {path}: {e}");
            process::exit(1);
        })
    });

    run_loop(
        &config,
        env.as_mut(),
        &mut agent,
        &mut rng,
        writer.as_mut(),
        verbose,
    );

    if let Some(w) = writer.as_mut() {
        if let Err(e) = w.flush() {
            eprintln!("Failed to flush log: {e}");
        }
    }
    if let Some(path) = log_path {
        let summary_path = PathBuf::from(&path).with_extension("summary.json");
        let summary = RunSummaryV1 {
            environment: config.environment.name().to_string(),
            seed: config.random_seed,
            cycles: agent.age(),
            total_reward: agent.total_reward(),
            average_reward: agent.average_reward(),
            model_size: agent.model_size(),
        };
        if let Err(e) = write_summary_atomic(&summary_path, &summary) {
            eprintln!("Failed to write run summary: {e}");
        }
    }
}

/// The interaction loop: percept, explore-or-plan, action, log.
fn run_loop(
    config: &RunConfig,
    env: &mut dyn Environment,
    agent: &mut Agent,
    rng: &mut AgentRng,
    mut writer: Option<&mut CycleWriter>,
    verbose: bool,
) {
    let mut explore_rate = config.exploration;
    let mut explore = explore_rate > 0.0;

    let mut cycle: u64 = 1;
    while !env.is_finished() {
        if config.terminate_age > 0 && agent.age() > config.terminate_age {
            break;
        }
        let cycle_start = Instant::now();

        let observation = env.observation();
        let reward = env.reward();

        // Past the learning period the agent stops exploring too.
        let learning_period = config.agent.learning_period;
        if learning_period > 0 && cycle > learning_period {
            explore = false;
        }

        agent.model_update_percept(observation, reward);

        let explored = explore && rng.r01() < explore_rate;
        let action = if explored {
            agent.gen_random_action(rng)
        } else {
            agent.search(rng)
        };

        env.perform_action(action, rng);
        agent.model_update_action(action);

        if let Some(w) = writer.as_mut() {
            let record = CycleRecordV1 {
                cycle,
                observation,
                reward,
                action,
                explored,
                explore_rate,
                total_reward: agent.total_reward(),
                average_reward: agent.average_reward(),
                cycle_wall_time: cycle_start.elapsed().as_secs_f64(),
                model_size: agent.model_size(),
            };
            if let Err(e) = w.write_record(&record) {
                eprintln!("Failed to write cycle record: {e}");
                process::exit(1);
            }
        }

        if verbose || cycle.is_power_of_two() {
            println!("cycle: {cycle}");
            println!("average reward: {:.4}", agent.average_reward());
            if explore {
                println!("explore rate: {explore_rate:.4}");
            }
        }
        if verbose {
            println!("{}", env.describe());
        }

        if explore {
            explore_rate *= config.explore_decay;
        }
        cycle += 1;
    }

    println!();
    println!("SUMMARY");
    println!("agent age: {}", agent.age());
    println!("average reward: {:.4}", agent.average_reward());
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("run") => cmd_run(&args[1..]),
        Some("--help") | Some("-h") => print_help(),
        Some("--version") | Some("-V") => print_version(),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            print_help();
            process::exit(1);
        }
        None => {
            print_help();
            process::exit(1);
        }
    }
}
