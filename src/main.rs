use qcircuit::core::gates::HADAMARD;
use qcircuit::core::{CompositeState, Gate, Qubit};
use qcircuit::{CircuitDescription, CircuitRunner, QuantumError, RunConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("demo")           => { print_banner(); run_all_demos() }
        Some("run")                   => cli_run(&args[2..]),
        Some("help") | Some("--help") => { print_banner(); print_help() }
        Some(unknown) => {
            eprintln!("Unknown command '{}'. Run 'qcircuit help' for usage.", unknown);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── CLI ───────────────────────────────────────────────────────────────────

struct RunArgs {
    description: String,
    config: RunConfig,
    json: bool,
    shots: Option<usize>,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs, String> {
    let mut description = None;
    let mut config_path = None;
    let mut seed = None;
    let mut threshold = None;
    let mut json = false;
    let mut shots = None;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next().cloned().ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--seed"      => seed = Some(parse_flag::<u64>("--seed", &value("--seed")?)?),
            "--threshold" => threshold = Some(parse_flag::<f64>("--threshold", &value("--threshold")?)?),
            "--shots"     => shots = Some(parse_flag::<usize>("--shots", &value("--shots")?)?),
            "--config"    => config_path = Some(value("--config")?),
            "--json"      => json = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            positional => {
                if description.replace(positional.to_string()).is_some() {
                    return Err("expected a single circuit description".into());
                }
            }
        }
    }

    let description = description.ok_or("Usage: qcircuit run <description> [flags]")?;
    let mut config = match config_path {
        Some(path) => RunConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => RunConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold);
    }
    config.validate().map_err(|e| e.to_string())?;

    Ok(RunArgs { description, config, json, shots })
}

fn parse_flag<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("invalid value '{raw}' for {flag}"))
}

fn cli_run(args: &[String]) {
    let run_args = match parse_run_args(args) {
        Ok(a) => a,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };

    let description: CircuitDescription = match run_args.description.parse() {
        Ok(d) => d,
        Err(e) => { eprintln!("{e}"); std::process::exit(1); }
    };
    if let Err(e) = run_args.config.check_qubits(description.num_qubits) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let mut runner = CircuitRunner::new(run_args.config);
    let result = match runner.run_description(&description) {
        Ok(r) => r,
        Err(e) => { eprintln!("Runtime error: {e}"); std::process::exit(1); }
    };
    let counts = match run_args.shots.map(|k| runner.sample(&description, k)).transpose() {
        Ok(c) => c,
        Err(e) => { eprintln!("Runtime error: {e}"); std::process::exit(1); }
    };

    if run_args.json {
        let out = serde_json::json!({
            "description": description.to_string(),
            "num_qubits": result.num_qubits,
            "gate_count": result.gate_count,
            "probabilities": result.probabilities,
            "states": result.report(),
            "counts": counts,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => { eprintln!("Cannot encode result: {e}"); std::process::exit(1); }
        }
        return;
    }

    print_banner();
    println!("━━━ Circuit Runner ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Description: {description}\n");
    println!("Operations:");
    for (i, step) in description.steps.iter().enumerate() {
        let ops: Vec<String> = step.iter().map(ToString::to_string).collect();
        println!("  step {i:<3} {}", ops.join(" "));
    }
    println!();
    println!(
        "Circuit: {} gate(s) | {} step(s) | {} qubit(s)\n",
        result.gate_count, description.steps.len(), result.num_qubits
    );

    println!("Final state (threshold {}):", runner.config().reporting_threshold);
    for (label, prob) in result.report() {
        println!("  |{label}⟩  {prob:.6}");
    }

    if let Some(counts) = counts {
        let total: usize = counts.values().sum();
        println!();
        println!("Sampling {total} shot(s):");
        for (label, count) in counts {
            println!("  |{label}⟩  {count}");
        }
    }
}

fn print_banner() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║          qcircuit v{:<26}║", env!("CARGO_PKG_VERSION"));
    println!("║     State-Vector Quantum Circuit Runner      ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();
}

fn print_help() {
    println!("Usage: qcircuit [COMMAND] [ARGS]\n");
    println!("Commands:");
    println!("  demo                      Run built-in demonstration circuits");
    println!("  run <description>         Parse and run a circuit description");
    println!("  help                      Show this message\n");
    println!("Run flags:");
    println!("  --seed <n>                Fixed RNG seed for sampling");
    println!("  --threshold <p>           Reporting threshold (default 0.001)");
    println!("  --shots <k>               Also sample k measurements");
    println!("  --config <file.json>      Load RunConfig from JSON");
    println!("  --json                    Print the result as JSON\n");
    println!("Description format:  N:initialStates:operations");
    println!("  2:0-0:[H0]-[X1_0]         Bell pair");
    println!("  <Gate><q>                 Single-qubit gate on q");
    println!("  <Gate><t>_<c>             Gate on t controlled by c\n");
    let names: Vec<&str> = Gate::all().iter().map(Gate::name).collect();
    println!("Gates: {}", names.join(" "));
    println!("Logging: RUST_LOG=debug qcircuit run ...");
}

// ── Demos ─────────────────────────────────────────────────────────────────

fn run_all_demos() {
    demo_single_qubit();
    demo_bell_state();
    demo_ghz_state();
    demo_initial_states();
    demo_register_growth();
    demo_error_handling();
}

fn run_and_print(runner: &CircuitRunner, source: &str) {
    let result = source
        .parse::<CircuitDescription>()
        .and_then(|d| runner.run_description(&d));
    match result {
        Ok(r) => {
            for (label, prob) in r.report() {
                println!("  |{label}⟩  {prob:.4}");
            }
        }
        Err(e) => eprintln!("  Error: {e}"),
    }
}

fn demo_single_qubit() {
    println!("━━━ Demo 1: Single Qubit Basics ━━━━━━━━━━━━━━━━━");
    let runner = CircuitRunner::default();
    println!("Initial |0⟩:");
    run_and_print(&runner, "1:0:");
    println!("After H (superposition):");
    run_and_print(&runner, "1:0:[H0]");
    println!("After H·Z·H = X (should be |1⟩):");
    run_and_print(&runner, "1:0:[H0]-[Z0]-[H0]");
    println!();
}

fn demo_bell_state() {
    println!("━━━ Demo 2: Bell State |Φ+⟩ ━━━━━━━━━━━━━━━━━━━━━");
    let mut runner = CircuitRunner::new(RunConfig::default().with_seed(2024));
    let source = "2:0-0:[H0]-[X1_0]";
    run_and_print(&runner, source);

    if let Ok(d) = source.parse::<CircuitDescription>() {
        match runner.sample(&d, 1000) {
            Ok(counts) => println!(
                "Sampling 1000 shots:  |00⟩={} |11⟩={}",
                counts.get("00").unwrap_or(&0),
                counts.get("11").unwrap_or(&0)
            ),
            Err(e) => eprintln!("  Error: {e}"),
        }
    }
    println!();
}

fn demo_ghz_state() {
    println!("━━━ Demo 3: GHZ State (3 qubits) ━━━━━━━━━━━━━━━━");
    run_and_print(&CircuitRunner::default(), "3:0-0-0:[H0]-[X1_0]-[X2_1]");
    println!();
}

fn demo_initial_states() {
    println!("━━━ Demo 4: Custom Initial States ━━━━━━━━━━━━━━━");
    println!("Qubit 0 starts in |1⟩; SWAP moves it to qubit 1:");
    run_and_print(&CircuitRunner::default(), "2:1-0:[SWAP1_0]");
    println!();
}

fn demo_register_growth() {
    println!("━━━ Demo 5: Tensor Product & Measurement ━━━━━━━━━");
    let mut rng = StdRng::seed_from_u64(7);
    let mut demo = || -> Result<(), QuantumError> {
        let mut q = Qubit::new();
        q.apply_gate(&HADAMARD)?;
        let mut state = CompositeState::from_qubits(&[q])?;
        state.add_qubit(&Qubit::from_bit(1)?)?;
        print!("{state}");
        let outcome = state.measure_qubit(0, &mut rng)?;
        println!("Measured qubit 0 → {outcome}");
        print!("{state}");
        Ok(())
    };
    if let Err(e) = demo() {
        eprintln!("  Error: {e}");
    }
    println!();
}

fn demo_error_handling() {
    println!("━━━ Demo 6: Error Reporting ━━━━━━━━━━━━━━━━━━━━━");
    let runner = CircuitRunner::default();
    for source in ["6:0-0-0-0-0-0:[Q5]", "2:0:[H0]", "2:0-0:[X1_1]"] {
        println!("  {source}");
        run_and_print(&runner, source);
    }
    println!();
}
