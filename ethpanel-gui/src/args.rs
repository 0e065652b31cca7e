//! Command-line argument parsing.

use std::{error::Error, fmt::Display, path::PathBuf, process};

use crate::dir::EthpanelDirectory;

/// Parsed command-line argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    DatadirPath(EthpanelDirectory),
    /// URL of the JSON-RPC endpoint of the wallet provider.
    Provider(String),
}

/// Parse command-line arguments.
///
/// `args` includes the program name at `args[0]`, `version` is displayed on `--version`.
pub fn parse_args(args: Vec<String>, version: impl Display) -> Result<Vec<Arg>, Box<dyn Error>> {
    let mut res = Vec::new();

    let app_name = args
        .first()
        .and_then(|a| std::path::Path::new(a).file_name())
        .and_then(|s| s.to_str())
        // This should never happen
        .unwrap_or("ethpanel");

    if args.len() > 1 && (args[1] == "--version" || args[1] == "-v") {
        eprintln!("{}", version);
        process::exit(0);
    }

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        eprintln!(
            r#"
Usage: {app_name} [OPTIONS]

Options:
    --datadir <PATH>    Path of ethpanel datadir
    --provider <URL>    JSON-RPC endpoint of the wallet provider
    -v, --version       Display {app_name} version
    -h, --help          Print help
        "#
        );
        process::exit(0);
    }

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--datadir" => {
                let a = iter.next().ok_or("missing arg to --datadir")?;
                res.push(Arg::DatadirPath(EthpanelDirectory::new(PathBuf::from(a))));
            }
            "--provider" => {
                let a = iter.next().ok_or("missing arg to --provider")?;
                if !a.starts_with("http://") && !a.starts_with("https://") {
                    return Err(format!("provider url must be http(s): {}", a).into());
                }
                res.push(Arg::Provider(a.clone()));
            }
            _ => return Err(format!("unknown argument {}", arg).into()),
        }
    }

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION: &str = "1.0.0";

    fn args(s: &str) -> Vec<String> {
        s.split(' ').map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(parse_args(args("app --meth"), VERSION).is_err());
        assert!(parse_args(args("app --datadir"), VERSION).is_err());
        assert!(parse_args(args("app --provider"), VERSION).is_err());
        assert!(parse_args(args("app --provider localhost:8545"), VERSION).is_err());
        assert_eq!(Some(vec![]), parse_args(args("app"), VERSION).ok());
        assert_eq!(
            Some(vec![
                Arg::DatadirPath(EthpanelDirectory::new(PathBuf::from("hello"))),
                Arg::Provider("http://127.0.0.1:1248".to_string()),
            ]),
            parse_args(
                args("app --datadir hello --provider http://127.0.0.1:1248"),
                VERSION
            )
            .ok()
        );
        assert_eq!(
            Some(vec![
                Arg::Provider("https://wallet.local".to_string()),
                Arg::DatadirPath(EthpanelDirectory::new(PathBuf::from("hello"))),
            ]),
            parse_args(
                args("app --provider https://wallet.local --datadir hello"),
                VERSION
            )
            .ok()
        );
    }
}
