//! docdef – command-line Markdown/HTML → document-definition converter.
//!
//! Usage:
//!   docdef [input.md] [output.json] [--html] [--compact]
//!
//! With no input file the built-in sample document is converted, so running
//! `docdef` with no arguments is a quick way to see the output shape.

use std::{env, fs, path::PathBuf, process};

use docdef::pipeline::{html_to_docdef, markdown_to_docdef, PipelineConfig};
use docdef::templates;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut html_input = false;
    let mut compact = false;
    let mut positional = 0usize;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--html" => html_input = true,
            "--compact" | "-c" => compact = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let source = match &input_path {
        Some(input) => match fs::read_to_string(input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading '{}': {e}", input.display());
                process::exit(1);
            }
        },
        None if html_input => templates::sample_html().to_string(),
        None => templates::sample_markdown().to_string(),
    };

    let config = PipelineConfig::default();
    let conversion = if html_input {
        html_to_docdef(&source, &config)
    } else {
        markdown_to_docdef(&source, &config)
    };

    for warning in &conversion.warnings {
        eprintln!("Warning: {warning}");
    }

    let json = if compact {
        conversion.to_json()
    } else {
        conversion.to_json_pretty()
    };
    let json = match json {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            process::exit(1);
        }
    };

    match output_path {
        Some(output) => {
            // Create output directory if necessary.
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = fs::create_dir_all(parent) {
                        eprintln!("Error creating output directory: {e}");
                        process::exit(1);
                    }
                }
            }
            if let Err(e) = fs::write(&output, &json) {
                eprintln!("Error writing '{}': {e}", output.display());
                process::exit(1);
            }
            let nodes = conversion.content.len();
            eprintln!(
                "Wrote '{}' ({} bytes, {} node{})",
                output.display(),
                json.len(),
                nodes,
                if nodes == 1 { "" } else { "s" }
            );
        }
        None => println!("{json}"),
    }
}

fn print_usage(prog: &str) {
    eprintln!("docdef – Markdown/HTML to document-definition converter");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} [input.md] [output.json] [--html] [--compact]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [input.md]     Markdown file to convert (default: built-in sample document)");
    eprintln!("  [output.json]  Output path (default: stdout)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --html         Treat the input as HTML instead of Markdown");
    eprintln!("  --compact, -c  Emit compact JSON instead of pretty-printed");
    eprintln!("  --help         Print this message");
}
