use std::process::ExitCode;
use std::sync::mpsc;

use ge_maxent::{GeConfig, InstanceList, KlGeEvaluator, MaxEnt, Result};

// Evaluates the KL GE criterion once and prints its diagnostics as JSON.
//   ge-maxent <instances.json> <config.json> [model.json]
// Without a model file the classifier starts from all-zero weights.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("usage: ge-maxent <instances.json> <config.json> [model.json]");
        return ExitCode::from(2);
    }
    match run(&args[0], &args[1], args.get(2).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ge-maxent: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(instances_path: &str, config_path: &str, model_path: Option<&str>) -> Result<()> {
    let instances = InstanceList::load_json(instances_path)?;
    let config = GeConfig::load_json(config_path)?;
    let model = match model_path {
        Some(path) => MaxEnt::load_json(path)?,
        None => MaxEnt::for_instances(&instances),
    };
    log::info!(
        "Loaded {} instances, {} constraints, {} labels",
        instances.len(),
        config.constraints.len(),
        instances.num_labels()
    );

    let (tx, rx) = mpsc::channel();
    let mut evaluator = KlGeEvaluator::new(config)?.with_progress(tx);
    let (value, _) = evaluator.evaluate(&model, &instances, 0.0)?;

    match rx.try_recv() {
        Ok(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
        // zero objective weight: nothing was recomputed
        Err(_) => println!("{{ \"value\": {value} }}"),
    }
    Ok(())
}
