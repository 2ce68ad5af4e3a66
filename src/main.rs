// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Algoflow CLI entrypoint.
//!
//! By default this serves the HTTP API at `http://127.0.0.1:<port>/`.
//!
//! `--convert <text>` runs one conversion and prints the diagram; `--repair` repairs Mermaid
//! source read from stdin without calling the model.

use std::error::Error;
use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use algoflow::config::AppConfig;
use algoflow::convert::Converter;
use algoflow::format::mermaid::{check_flowchart, repair};
use algoflow::generate::GeminiClient;
use algoflow::model::{AlgorithmText, ValidationError};
use algoflow::server::{self, AppState};
use algoflow::session::SessionController;
use log::{info, warn, LevelFilter};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--port <port>] [--log-level <level>]\n  {program} --convert <text> [--log-level <level>]\n  {program} --repair [--check] [--log-level <level>]\n\nServe mode (default) listens on `http://127.0.0.1:<port>/`.\n--port selects the port (0 = ephemeral; default from ALGOFLOW_HTTP_PORT, else {}).\n\n--convert prints the repaired diagram for one description.\n--repair reads Mermaid source from stdin and prints the repaired source;\n--check additionally fails when the result does not pass the strict flowchart check.\n\nGEMINI_API_KEY provides the model credential. --log-level defaults to `info`.",
        algoflow::config::DEFAULT_HTTP_PORT
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    convert: Option<String>,
    repair: bool,
    check: bool,
    port: Option<u16>,
    log_level: Option<LevelFilter>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--convert" => {
                if options.convert.is_some() {
                    return Err(());
                }
                let text = args.next().ok_or(())?;
                options.convert = Some(text);
            }
            "--repair" => {
                if options.repair {
                    return Err(());
                }
                options.repair = true;
            }
            "--check" => {
                if options.check {
                    return Err(());
                }
                options.check = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--log-level" => {
                if options.log_level.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.log_level = Some(LevelFilter::from_str(&raw).map_err(|_| ())?);
            }
            _ => return Err(()),
        }
    }

    if options.convert.is_some() && options.repair {
        return Err(());
    }

    if options.check && !options.repair {
        return Err(());
    }

    if options.port.is_some() && (options.convert.is_some() || options.repair) {
        return Err(());
    }

    Ok(options)
}

fn run_repair(check: bool) -> Result<(), Box<dyn Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let diagram = repair(&input);
    println!("{diagram}");

    if check {
        let summary = check_flowchart(diagram.as_str())?;
        info!(nodes = summary.nodes.len(), edges = summary.edges.len(); "strict check passed");
    }
    Ok(())
}

fn run_convert(config: AppConfig, text: String) -> Result<(), Box<dyn Error>> {
    let text = AlgorithmText::new(text)?;
    if !config.classifier().classify(text.as_str()).is_algorithm() {
        return Err(ValidationError::NotAnAlgorithm.into());
    }

    let converter = Converter::new(Arc::new(GeminiClient::new(config.gemini)?));
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let conversion = runtime.block_on(converter.convert(&text));

    if let Some(kind) = conversion.fallback {
        warn!(fallback:% = kind; "printing fallback diagram");
    }
    println!("{}", conversion.diagram);
    Ok(())
}

fn run_server(config: AppConfig, port: Option<u16>) -> Result<(), Box<dyn Error>> {
    let port = port.unwrap_or(config.http_port);
    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, every conversion will use a fallback diagram");
    }

    let classifier = config.classifier();
    let converter = Converter::new(Arc::new(GeminiClient::new(config.gemini)?));
    let state = AppState {
        controller: SessionController::new(converter.clone(), classifier),
        converter,
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async move {
        let listener = server::bind(port).await?;
        let shutdown = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(err:err; "failed to listen for ctrl-c");
            }
        };
        server::serve(listener, state, shutdown).await
    })?;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "algoflow".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(options.log_level.unwrap_or(LevelFilter::Info))
            .init();

        if options.repair {
            return run_repair(options.check);
        }

        let config = AppConfig::from_env()?;
        match options.convert {
            Some(text) => run_convert(config, text),
            None => run_server(config, options.port),
        }
    })();

    if let Err(err) = result {
        eprintln!("algoflow: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{parse_options, CliOptions};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_port_and_log_level() {
        let options = parse(&["--log-level", "debug", "--port", "0"]).expect("parse options");
        assert_eq!(options.port, Some(0));
        assert_eq!(options.log_level, Some(LevelFilter::Debug));
        assert!(!options.repair);
    }

    #[test]
    fn parses_convert_text() {
        let options = parse(&["--convert", "sort the list"]).expect("parse options");
        assert_eq!(options.convert.as_deref(), Some("sort the list"));
    }

    #[test]
    fn parses_repair_with_check_in_any_order() {
        let options = parse(&["--check", "--repair"]).expect("parse options");
        assert!(options.repair);
        assert!(options.check);
    }

    #[test]
    fn rejects_conflicting_modes() {
        parse(&["--repair", "--convert", "x"]).unwrap_err();
        parse(&["--check"]).unwrap_err();
        parse(&["--repair", "--port", "80"]).unwrap_err();
        parse(&["--convert", "x", "--port", "80"]).unwrap_err();
    }

    #[test]
    fn rejects_bad_values_and_unknown_args() {
        parse(&["--port", "http"]).unwrap_err();
        parse(&["--log-level", "loud"]).unwrap_err();
        parse(&["--convert"]).unwrap_err();
        parse(&["sort the list"]).unwrap_err();
        parse(&["--nope"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--repair", "--repair"]).unwrap_err();
        parse(&["--port", "1", "--port", "2"]).unwrap_err();
        parse(&["--log-level", "info", "--log-level", "warn"]).unwrap_err();
    }
}
