use signline_world::{Scenario, ScenarioReport};

pub fn run(scenarios: Vec<String>, json_output: bool) {
    let mut reports: Vec<ScenarioReport> = Vec::with_capacity(scenarios.len());
    for path in &scenarios {
        let scenario = Scenario::load(path).unwrap_or_else(|err| {
            tracing::error!(%path, "scenario could not be loaded");
            eprintln!("error: {err}");
            std::process::exit(1);
        });
        tracing::debug!(
            %path,
            name = %scenario.name,
            steps = scenario.steps.len(),
            "running scenario"
        );
        let report = scenario.run().unwrap_or_else(|err| {
            tracing::error!(
                %path,
                name = %scenario.name,
                "scenario stopped before its last step"
            );
            eprintln!("error: scenario {:?} at {path}: {err}", scenario.name);
            std::process::exit(1);
        });
        reports.push(report);
    }

    let passed = reports.iter().all(ScenarioReport::passed);

    if json_output {
        let rendered = serde_json::to_string_pretty(&reports).unwrap_or_else(|err| {
            eprintln!("error: failed to render run payload: {err}");
            std::process::exit(2);
        });
        println!("{rendered}");
    } else {
        println!("signline run");
        for report in &reports {
            let failed = report.failures().count();
            let verdict = if failed == 0 { "passed" } else { "FAILED" };
            println!("  {}: {verdict}", report.name);
            println!("    Steps: {} ({failed} failed)", report.steps.len());
            println!(
                "    Commits: {} extended, {} legacy ({} extended attempts)",
                report.stats.extended, report.stats.legacy, report.stats.extended_attempts
            );
            for step in report.failures() {
                println!(
                    "    - step {}: {} got {:?}",
                    step.index, step.description, step.outcome
                );
            }
        }
    }

    if !passed {
        let failed = reports.iter().filter(|report| !report.passed()).count();
        tracing::warn!(failed, total = reports.len(), "scenarios failed");
        std::process::exit(1);
    }
}
