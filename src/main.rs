use creature_battle::{run, CliOptions};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!("Usage: creature-battle [--rosters rosters.json] [--seed SEED] [--wild] [--max-turns N] [--json]");
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut rosters_path = PathBuf::from("rosters.json");
    let mut seed = 0u64;
    let mut wild = false;
    let mut max_turns = 100u32;
    let mut json = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rosters" => {
                rosters_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--rosters requires a path (e.g. --rosters rosters.json)")
                })?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = val.parse()?;
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max-turns requires a number"))?;
                max_turns = val.parse()?;
            }
            "--wild" => wild = true,
            "--json" => json = true,
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        rosters_path,
        seed,
        wild,
        max_turns,
        json,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = parse_args()?;
    run(opts)
}
