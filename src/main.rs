pub mod cli;

use clap::{Parser, ValueEnum};
use cli::{errors::MkcrxCliError, helpers::exit_with_error};
use mkcrx_rs::crx::{crx3::create_crx3, pack::create_file};
use std::{env, fs, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CrxFormat {
    /// Original header layout: pubkey and signature lengths in the header
    V2,
    /// Protobuf-headed layout used by current Chrome releases
    V3,
}

#[derive(Parser)]
#[command(name = "mkcrx-rs")]
#[command(version = "0.1")]
#[command(about = "Package a userscript payload into a signed CRX extension", long_about = None)]
#[command(next_line_help = true)]
struct Cli {
    /// JS payload to package
    filename: String,
    /// Manifest JSON file describing the extension
    #[arg(short, long)]
    manifest: String,
    /// Location of the PEM private key file
    #[arg(short, long)]
    pem: String,
    /// Loader asset injected alongside the payload
    #[arg(short, long, default_value = "wrapper.js")]
    wrapper: String,
    /// Output CRX location, defaults to the payload name with a .crx extension
    #[arg(short, long)]
    output: Option<String>,
    /// Container format to produce
    #[arg(short, long, value_enum, default_value = "v2")]
    format: CrxFormat,
}

fn require_existing(path: PathBuf) -> PathBuf {
    if !path.exists() {
        exit_with_error(MkcrxCliError::NotFound(
            path.to_string_lossy().to_string(),
        ));
    }
    path
}

#[tokio::main]
pub async fn main() {
    let cli = Cli::parse();

    if !cli.filename.ends_with(".js") {
        exit_with_error(MkcrxCliError::UnsupportedFileType);
    }

    let current_dir = env::current_dir().expect("Failed to get current directory");

    let code_path = require_existing(current_dir.join(&cli.filename));
    let manifest_path = require_existing(current_dir.join(&cli.manifest));
    let pem_path = require_existing(current_dir.join(&cli.pem));
    let wrapper_path = require_existing(current_dir.join(&cli.wrapper));

    let code = fs::read_to_string(&code_path).expect("Failed to read payload");

    let manifest: serde_json::Value = match fs::read_to_string(&manifest_path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(manifest) => manifest,
        Err(reason) => exit_with_error(MkcrxCliError::InvalidManifest(reason)),
    };

    let crx_path = match cli.output {
        Some(path) => current_dir.join(path),
        None => code_path.with_extension("crx"),
    };

    let result = match cli.format {
        CrxFormat::V2 => {
            let pem = fs::read_to_string(&pem_path).expect("Failed to read key file");
            create_file(&code, &manifest, &pem, &wrapper_path, &crx_path).await
        }
        CrxFormat::V3 => create_crx3(&code, &manifest, &pem_path, &crx_path, &wrapper_path).await,
    };

    match result {
        Ok(()) => println!(
            "Successfully packaged {} into {}",
            cli.filename,
            crx_path.display()
        ),
        Err(err) => {
            eprintln!("Packaging failed: {}", err);
            std::process::exit(1);
        }
    }
}
