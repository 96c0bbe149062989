use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use ens_core::LaunchSettings;
use ens_gen::{as_jobs, build_manifest, to_canonical_json_bytes, Ensemble, EnsembleConfig};
use tracing::info;

#[derive(Args, Debug)]
pub struct MaterializeArgs {
    /// Ensemble description (`.json` is read as JSON, anything else as YAML).
    #[arg(long)]
    pub config: PathBuf,
    /// Master seed for randomized strategies.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Bind every member to this launcher; fails on an empty ensemble.
    #[arg(long)]
    pub launcher: Option<String>,
    /// Directory receiving `jobs.json`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &MaterializeArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let ensemble = Ensemble::new(config);
    let members = ensemble.materialize(args.seed)?;

    if let Some(launcher) = &args.launcher {
        let jobs = as_jobs(members.clone(), LaunchSettings::new(launcher.as_str()))
            .map_err(|err| err.with_context("ensemble", ensemble.config().name.clone()))?;
        info!(launcher = %launcher, jobs = jobs.len(), "bound members to launcher");
    }

    for member in &members {
        let mut line = member.name.clone();
        line.push(' ');
        line.push_str(&member.exe);
        for arg in member.command_args() {
            line.push(' ');
            line.push_str(&arg);
        }
        println!("{line}");
    }

    if let Some(out) = &args.out {
        fs::create_dir_all(out)?;
        let manifest = build_manifest(ensemble.config(), args.seed, members)?;
        let bytes = to_canonical_json_bytes(&manifest)?;
        fs::write(out.join("jobs.json"), bytes)?;
        info!(path = %out.join("jobs.json").display(), "wrote manifest");
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<EnsembleConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        EnsembleConfig::from_json_str(&text)?
    } else {
        EnsembleConfig::from_yaml_str(&text)?
    };
    Ok(config)
}
