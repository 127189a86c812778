// Solow Trace Runner — headless frame-loop replay
// Seedable frame timing, parameter schedules, per-frame JSONL audit trail
//
// Usage:
//   cargo run --release --bin trace                     # Run all scenarios
//   cargo run --release --bin trace -- PAUSE_BURST      # Filter by name
//   cargo run --release --bin trace -- --time-series    # Enable JSONL output
//   cargo run --release --bin trace -- --seed 42        # Custom base seed
//
// Set RUST_LOG=debug to see catch-up bursts and fault warnings.

mod frames;
mod report;
mod scenarios;
mod time_series;

use frames::FrameTimer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use report::*;
use scenarios::*;
use solow_engine::{steady_state, GrowthSimulation, SimConfig};
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use time_series::TimeSeriesRecorder;

/// Page-load offset so the first frame timestamp is not zero.
const ORIGIN_MS: f64 = 1_250.0;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    seed: u64,
    time_series: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        seed: 0,
        time_series: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Scenario Execution ─────────────────────────────────────────────────────

fn run_scenario(scenario: &Scenario, seed: u64, ts_dir: Option<&Path>) -> TraceResult {
    let start = Instant::now();
    let config = SimConfig { initial_params: scenario.params, ..SimConfig::default() };
    let dt = config.dt;
    let max_points = config.max_points;
    let window = config.window_size;

    let mut sim = match GrowthSimulation::from_config(config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("{}: invalid config: {}", scenario.name, e);
            return failed_result(scenario, seed, start);
        }
    };

    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut timer = FrameTimer::new(rng, scenario.frames, ORIGIN_MS);
    let mut recorder = ts_dir.map(|_| TimeSeriesRecorder::new());
    let end_ms = ORIGIN_MS + scenario.seconds * 1000.0;
    let mut last_ts = ORIGIN_MS;
    let mut window_violations = 0u64;

    loop {
        let ts = timer.next_frame();
        if ts > end_ms {
            break;
        }
        if let Some(curve) = scenario.param_curve {
            sim.set_params(curve((ts - ORIGIN_MS) / 1000.0));
        }

        let frame = sim.frame_core(ts);
        last_ts = ts;

        let history = sim.history();
        if history.len() > max_points || history.span() > window + 1e-9 {
            window_violations += 1;
        }
        if frame.series.is_some() {
            if let Some(rec) = recorder.as_mut() {
                rec.record(ts, &frame, &sim);
            }
        }
    }

    if let (Some(dir), Some(rec)) = (ts_dir, recorder.as_ref()) {
        let path = dir.join(format!("{}.jsonl", scenario.name.to_lowercase()));
        match rec.write_jsonl(&path) {
            Ok(()) => log::info!("{}: wrote {} frames to {}", scenario.name, rec.len(), path.display()),
            Err(e) => log::warn!("{}: could not write {}: {}", scenario.name, path.display(), e),
        }
    }

    let stats = sim.stats();
    let wall_secs = (last_ts - ORIGIN_MS) / 1000.0;
    let expected_steps = (wall_secs / dt + 1e-9).floor() as u64;
    let params = sim.params();
    let k_star = steady_state(&params);
    let final_k = sim.state();

    let pass = stats.total_steps == expected_steps
        && window_violations == 0
        && stats.faults == 0
        && final_k.is_finite();

    TraceResult {
        scenario: scenario.name.to_string(),
        label: scenario.label.to_string(),
        seed,
        pass,
        frames: stats.frames,
        steps: stats.total_steps,
        expected_steps,
        sim_time: sim.time(),
        final_k,
        steady_state: k_star,
        gap_pct: TraceResult::gap_pct(final_k, k_star),
        retained: stats.retained,
        evicted: stats.evicted,
        max_burst: stats.max_steps_per_frame,
        faults: stats.faults,
        window_violations,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

fn failed_result(scenario: &Scenario, seed: u64, start: Instant) -> TraceResult {
    TraceResult {
        scenario: scenario.name.to_string(),
        label: scenario.label.to_string(),
        seed,
        pass: false,
        frames: 0,
        steps: 0,
        expected_steps: 0,
        sim_time: 0.0,
        final_k: f64::NAN,
        steady_state: None,
        gap_pct: None,
        retained: 0,
        evicted: 0,
        max_burst: 0,
        faults: 0,
        window_violations: 0,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = parse_args();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(Path::new("trace-results").to_path_buf())
    } else {
        None
    };

    println!("\n  Solow Trace Runner v0.1.0");
    println!("  PRNG: ChaCha8Rng | Base seed: {}", cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<40} {:>7} {:>9} {:>9} {:>8} {:>5} {:>6} {:>3} {:>7}",
        "Scenario", "Steps", "Final k", "k*", "Gap%", "Kept", "Burst", "Flt", "Time");
    println!("  {}", "-".repeat(104));

    let suite_start = Instant::now();
    let mut results = Vec::new();

    for scenario in &to_run {
        let result = run_scenario(scenario, cli.seed, ts_dir.as_deref());

        let k_star = result.steady_state.map(|k| format!("{:.4}", k)).unwrap_or_else(|| "-".into());
        let gap = result.gap_pct.map(|g| format!("{:.2}", g)).unwrap_or_else(|| "-".into());
        let status = if result.pass { "PASS" } else { "FAIL" };

        println!("  {:<40} {:>7} {:>9.4} {:>9} {:>8} {:>5} {:>6} {:>3} {:>5.1}ms  {}",
            result.label,
            result.steps,
            result.final_k,
            k_star,
            gap,
            result.retained,
            result.max_burst,
            result.faults,
            result.elapsed_ms,
            status,
        );

        if result.steps != result.expected_steps {
            println!("      step count {} != expected {}", result.steps, result.expected_steps);
        }
        if result.window_violations > 0 {
            println!("      window bound exceeded on {} frame(s)", result.window_violations);
        }

        results.push(result);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(104));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let timestamp = format!("{}", ts);

    let report = TraceReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        base_seed: cli.seed,
        summary: Summary { total, passed, failed },
        scenarios: results,
    };

    let dir = Path::new("trace-results");
    let path = dir.join(format!("trace-{}.json", timestamp));
    let written = std::fs::create_dir_all(dir)
        .and_then(|_| {
            serde_json::to_string_pretty(&report)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
        })
        .and_then(|json| std::fs::write(&path, json));
    match written {
        Ok(()) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => eprintln!("  Failed to write {}: {}\n", path.display(), e),
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
