// Thin demo driver: generate one replicate and optionally dump it as CSV.
// Experiment sweeps, estimator fitting and result aggregation live outside
// this crate; this binary only exercises the generation engine.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;

use causalgen::scenario::{gen_dlvm, gen_lrmf, DlvmConfig, FactorConfig, Generated, Pipeline};
use causalgen::types::{Dataset, Link, MeanImputer, ProxyDataset};

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    /// Linear low-rank factor model.
    Lrmf,
    /// Deep latent-variable model.
    Dlvm,
}

#[derive(Parser)]
#[clap(
    name = "causalgen",
    version,
    about = "Generate one synthetic causal-inference dataset."
)]
struct Args {
    /// Generative model for the observed covariates.
    #[clap(long, value_enum, default_value_t = Model::Lrmf)]
    model: Model,

    /// Sample count.
    #[clap(long, default_value_t = 1000)]
    n: usize,

    /// Latent dimension of the confounders Z.
    #[clap(long, default_value_t = 3)]
    d: usize,

    /// Observed dimension of the covariates X.
    #[clap(long, default_value_t = 100)]
    p: usize,

    /// Hidden dimension of the DLVM network (ignored for lrmf).
    #[clap(long, default_value_t = 5)]
    hidden: usize,

    /// True treatment effect.
    #[clap(long, default_value_t = 1.0)]
    tau: f64,

    /// Link for treatment and outcome: "linear" or "nonlinear".
    #[clap(long, default_value = "linear")]
    link: String,

    /// Replicate seed.
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Observation noise scale (lrmf only).
    #[clap(long, default_value_t = 1.0)]
    noise_sd: f64,

    /// Outcome noise scale.
    #[clap(long, default_value_t = 0.1)]
    outcome_sd: f64,

    /// Proportion of X entries to amputate. Nonzero routes through the
    /// missing-data pipeline with the built-in mean imputer.
    #[clap(long, default_value_t = 0.0)]
    prop_miss: f64,

    /// Write the generated tuple to this CSV file.
    #[clap(long)]
    out: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let link: Link = args.link.parse()?;
    let imputer = MeanImputer;
    let pipeline = if args.prop_miss > 0.0 {
        Pipeline::Proxy {
            prop_miss: args.prop_miss,
            imputer: &imputer,
        }
    } else {
        Pipeline::Oracle
    };

    let generated = match args.model {
        Model::Lrmf => gen_lrmf(
            &FactorConfig {
                n: args.n,
                d: args.d,
                p: args.p,
                tau: args.tau,
                link,
                seed: args.seed,
                noise_sd: args.noise_sd,
                outcome_sd: args.outcome_sd,
            },
            pipeline,
        )?,
        Model::Dlvm => gen_dlvm(
            &DlvmConfig {
                n: args.n,
                d: args.d,
                p: args.p,
                h: args.hidden,
                tau: args.tau,
                link,
                seed: args.seed,
                outcome_sd: args.outcome_sd,
            },
            pipeline,
        )?,
    };

    match &generated {
        Generated::Complete(data) => {
            log::info!(
                "generated n={} treated share={:.3} mean outcome={:.3}",
                data.w.len(),
                data.w.sum() / data.w.len() as f64,
                data.y.sum() / data.y.len() as f64,
            );
        }
        Generated::Proxied(data) => {
            log::info!(
                "generated (proxy pipeline) n={} treated share={:.3}",
                data.w.len(),
                data.w.sum() / data.w.len() as f64,
            );
        }
    }

    if let Some(path) = &args.out {
        match &generated {
            Generated::Complete(data) => write_complete_csv(path, data)?,
            Generated::Proxied(data) => write_proxied_csv(path, data)?,
        }
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn write_complete_csv(path: &PathBuf, data: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    let p = data.x.ncols();
    let mut header = vec!["w".to_string(), "y".to_string(), "ps".to_string()];
    header.extend((0..p).map(|j| format!("x{j}")));
    writer.write_record(&header)?;
    for i in 0..data.w.len() {
        let mut record = vec![
            data.w[i].to_string(),
            data.y[i].to_string(),
            data.ps[i].to_string(),
        ];
        record.extend(data.x.row(i).iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_proxied_csv(
    path: &PathBuf,
    data: &ProxyDataset,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["w", "y", "ps"])?;
    for i in 0..data.w.len() {
        writer.write_record([
            data.w[i].to_string(),
            data.y[i].to_string(),
            data.ps[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
