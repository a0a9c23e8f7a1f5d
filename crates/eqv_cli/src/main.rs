//! Command-line front end.
//!
//! Takes two LaTeX expressions, runs the configured backend, and
//! prints the comparison result as JSON on stdout. Logging goes to
//! stderr and is controlled by `RUST_LOG`.

use eqv_api_models::BackendKind;
use eqv_checker::CheckerConfig;
use std::process::ExitCode;

const USAGE: &str =
    "usage: eqv_cli <latex1> <latex2> [--backend local|remote] [--endpoint URL]";

struct Cli {
    latex1: String,
    latex2: String,
    backend: Option<BackendKind>,
    endpoint: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut positional: Vec<String> = Vec::new();
    let mut backend = None;
    let mut endpoint = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--backend" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--backend needs a value".to_string())?;
                backend = Some(value.parse::<BackendKind>()?);
            }
            "--endpoint" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--endpoint needs a value".to_string())?;
                endpoint = Some(value.clone());
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown flag '{}'", other));
            }
            _ => positional.push(arg.clone()),
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([latex1, latex2]) => Ok(Cli {
            latex1,
            latex2,
            backend,
            endpoint,
        }),
        Err(_) => Err("expected exactly two expressions".to_string()),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let mut config = CheckerConfig::from_env();
    if let Some(kind) = cli.backend {
        config.backend = kind;
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    tracing::debug!(target: "cli", backend = %config.backend, "comparing expressions");
    let result = config.backend().compare(&cli.latex1, &cli.latex2);

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize result: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn two_positionals_parse() {
        let cli = parse_args(&args(&["x+1", "1+x"])).unwrap();
        assert_eq!(cli.latex1, "x+1");
        assert_eq!(cli.latex2, "1+x");
        assert!(cli.backend.is_none());
    }

    #[test]
    fn backend_flag_parses() {
        let cli = parse_args(&args(&["a", "b", "--backend", "remote"])).unwrap();
        assert_eq!(cli.backend, Some(BackendKind::Remote));
    }

    #[test]
    fn endpoint_flag_parses() {
        let cli =
            parse_args(&args(&["a", "b", "--endpoint", "http://localhost:8080/latex"])).unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:8080/latex"));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(parse_args(&args(&["only-one"])).is_err());
        assert!(parse_args(&args(&["a", "b", "c"])).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse_args(&args(&["a", "b", "--verbose"])).is_err());
    }
}
