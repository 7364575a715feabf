use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use platedraw::processing::{run_batch, ProcessOptions, TracingSink};
use platedraw::RawRecord;

const USAGE: &str = "Usage: platedraw <parts.json> [output-dir] [--pdf-only | --dxf-only]";

fn main() -> ExitCode {
    if let Err(err) = platedraw::init_logging() {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(success) => {
            if success {
                println!("Processing completed successfully.");
                ExitCode::SUCCESS
            } else {
                eprintln!("Processing finished with errors.");
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<bool> {
    let (input, options) = parse_args(std::env::args().skip(1))?;

    let data = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let records: Vec<RawRecord> = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON array of part records", input.display()))?;

    let outcome = run_batch(&records, &options, &TracingSink);
    if let Some(Err(err)) = &outcome.pdf {
        eprintln!("PDF generation failed: {err}");
    }
    if let Some(Err(err)) = &outcome.dxf {
        eprintln!("DXF generation failed: {err}");
    }
    Ok(outcome.is_success())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<(PathBuf, ProcessOptions)> {
    let mut input: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut pdf_only = false;
    let mut dxf_only = false;

    for arg in args {
        match arg.as_str() {
            "--pdf-only" => pdf_only = true,
            "--dxf-only" => dxf_only = true,
            "--help" | "-h" => bail!("{USAGE}"),
            flag if flag.starts_with('-') => bail!("unknown flag '{flag}'\n{USAGE}"),
            positional => {
                if input.is_none() {
                    input = Some(PathBuf::from(positional));
                } else if output_dir.is_none() {
                    output_dir = Some(PathBuf::from(positional));
                } else {
                    bail!("unexpected argument '{positional}'\n{USAGE}");
                }
            }
        }
    }

    let Some(input) = input else {
        bail!("{USAGE}");
    };
    if pdf_only && dxf_only {
        bail!("--pdf-only and --dxf-only are mutually exclusive");
    }

    let mut options = ProcessOptions::new(output_dir.unwrap_or_else(|| PathBuf::from(".")));
    if pdf_only {
        options = options.pdf_only();
    }
    if dxf_only {
        options = options.dxf_only();
    }
    Ok((input, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(list: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
        list.iter().map(|s| s.to_string())
    }

    #[test]
    fn test_parse_defaults() {
        let (input, options) = parse_args(args(&["parts.json"])).unwrap();
        assert_eq!(input, PathBuf::from("parts.json"));
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert!(options.generate_pdf && options.generate_dxf);
    }

    #[test]
    fn test_parse_output_dir_and_flag() {
        let (_, options) = parse_args(args(&["parts.json", "out", "--dxf-only"])).unwrap();
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert!(!options.generate_pdf);
        assert!(options.generate_dxf);
    }

    #[test]
    fn test_parse_rejects_conflicting_flags() {
        assert!(parse_args(args(&["parts.json", "--pdf-only", "--dxf-only"])).is_err());
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["parts.json", "--frobnicate"])).is_err());
    }
}
