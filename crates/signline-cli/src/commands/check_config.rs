use serde::Serialize;
use signline_kernel::BindingTable;

#[derive(Serialize)]
struct BindingVerdict {
    binding: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct CheckConfigReport {
    bindings: String,
    lifecycle: bool,
    result: &'static str,
    verdicts: Vec<BindingVerdict>,
}

pub fn run(bindings: String, lifecycle: bool, json_output: bool) {
    let input = std::fs::read_to_string(&bindings).unwrap_or_else(|err| {
        eprintln!("error: failed to read bindings at {bindings}: {err}");
        std::process::exit(1);
    });
    let table = BindingTable::from_toml_str(&input).unwrap_or_else(|err| {
        eprintln!("error: failed to parse bindings at {bindings}: {err}");
        std::process::exit(1);
    });

    let verdicts: Vec<BindingVerdict> = table
        .bindings
        .iter()
        .map(|binding| {
            let error = binding.validate(lifecycle).err().map(|err| err.to_string());
            if let Some(error) = &error {
                tracing::debug!(binding = %binding.label(), %error, "binding rejected");
            }
            BindingVerdict {
                binding: binding.label(),
                accepted: error.is_none(),
                error,
            }
        })
        .collect();

    let accepted = verdicts.iter().all(|verdict| verdict.accepted);
    let report = CheckConfigReport {
        bindings,
        lifecycle,
        result: if accepted { "accepted" } else { "rejected" },
        verdicts,
    };

    if json_output {
        let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|err| {
            eprintln!("error: failed to render check-config payload: {err}");
            std::process::exit(2);
        });
        println!("{rendered}");
    } else {
        println!("signline check-config");
        println!("  Bindings: {}", report.bindings);
        println!("  Lifecycle event: {}", report.lifecycle);
        println!("  Result: {}", report.result);
        for verdict in &report.verdicts {
            match &verdict.error {
                None => println!("  - {}: ok", verdict.binding),
                Some(error) => println!("  - {}: {error}", verdict.binding),
            }
        }
    }

    if !accepted {
        tracing::warn!(bindings = %report.bindings, "binding configuration rejected");
        std::process::exit(1);
    }
}
