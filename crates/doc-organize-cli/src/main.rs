mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use doc_organize::{
    Command, Document, HostEvent, JsonSettingsStore, LayerId, MemoryDocument, Report, Settings,
    SettingsStore, dispatch_command, dispatch_event, organize_document_async,
};
use log::LevelFilter;
use logger::StderrLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docorg", about = "Organize, number and index design documents", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DocumentArgs {
    /// Document JSON file
    #[arg(short, long)]
    document: PathBuf,

    /// Settings JSON file (defaults are used when absent)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Where to write the result (defaults to the document itself)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DocumentArgs {
    fn output_path(&self) -> &PathBuf {
        self.output.as_ref().unwrap_or(&self.document)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pack artboards, number pages, build the TOC, update callouts and round
    Organize {
        #[command(flatten)]
        args: DocumentArgs,
    },

    /// Change stored settings, then organize the document if one is given
    Settings {
        /// Settings JSON file to update
        #[arg(short, long)]
        settings: PathBuf,

        /// key=value pairs; values are read as JSON, falling back to text
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,

        /// Document to organize with the new settings
        #[arg(short, long)]
        document: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Renumber the callouts on one artboard
    Callouts {
        #[command(flatten)]
        args: DocumentArgs,

        /// Artboard id or name
        #[arg(short, long)]
        artboard: String,
    },

    /// Handle a document save
    Saved {
        #[command(flatten)]
        args: DocumentArgs,

        /// Treat the save as an autosave
        #[arg(long)]
        autosave: bool,
    },

    /// Handle a finished resize of a TOC or callout-list container
    Resized {
        #[command(flatten)]
        args: DocumentArgs,

        /// Resized layer id or name
        #[arg(short, long)]
        layer: String,
    },

    /// Print the effective settings
    ShowSettings {
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

async fn load_store(path: Option<&PathBuf>) -> Result<JsonSettingsStore> {
    match path {
        Some(path) => JsonSettingsStore::load(path)
            .await
            .with_context(|| format!("Failed to read settings {}", path.display())),
        None => Ok(JsonSettingsStore::new()),
    }
}

async fn load_document(path: &PathBuf) -> Result<MemoryDocument> {
    MemoryDocument::load(path)
        .await
        .with_context(|| format!("Failed to read document {}", path.display()))
}

/// Resolve `#12`, `12` or a layer name
fn resolve_layer(doc: &MemoryDocument, reference: &str) -> Result<LayerId> {
    let numeric = reference.strip_prefix('#').unwrap_or(reference);
    if let Ok(id) = numeric.parse::<u64>() {
        let id = LayerId(id);
        if doc.layer(id).is_some() {
            return Ok(id);
        }
    }
    match doc.find_by_name(reference) {
        Some(id) => Ok(id),
        None => bail!("No layer named or numbered {}", reference),
    }
}

fn parse_assignment(assignment: &str) -> Result<(String, serde_json::Value)> {
    let Some((key, raw)) = assignment.split_once('=') else {
        bail!("Expected KEY=VALUE, got {}", assignment);
    };
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.trim().to_string(), value))
}

fn print_report(report: &Report) {
    match report {
        Report::Summary(summary) => {
            let (successes, errors) = summary.partition();
            if let Some(successes) = successes {
                println!("{}", successes);
            }
            if let Some(errors) = errors {
                eprintln!("{}", errors);
            }
        }
        Report::Alert { title, message } => eprintln!("{}: {}", title, message),
        Report::Nothing => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    StderrLogger::new(level).init()?;

    let now = chrono::Local::now().naive_local();

    match cli.command {
        Commands::Organize { args } => {
            let doc = load_document(&args.document).await?;
            let store = load_store(args.settings.as_ref()).await?;
            let settings = Settings::from_store(&store)?;

            println!("Organizing document...");
            let (doc, summary) = organize_document_async(doc, settings, now).await?;
            print_report(&Report::from(summary));
            doc.save(args.output_path()).await?;
        }

        Commands::Settings {
            settings: settings_path,
            values,
            document,
            output,
        } => {
            let mut store = load_store(Some(&settings_path)).await?;
            for assignment in &values {
                let (key, value) = parse_assignment(assignment)?;
                if !doc_organize::SETTINGS_KEYS.contains(&key.as_str()) {
                    bail!("Unknown setting {}", key);
                }
                store.set_setting_for_key(&key, value);
            }
            let settings = Settings::from_store(&store)?;

            match document {
                Some(path) => {
                    let mut doc = load_document(&path).await?;
                    let report =
                        dispatch_command(&mut doc, &mut store, Command::Settings(Some(settings)), &now)?;
                    print_report(&report);
                    doc.save(output.as_ref().unwrap_or(&path)).await?;
                }
                None => settings.write_to(&mut store)?,
            }
            store.save(&settings_path).await?;
            log::info!("Settings saved to {}", settings_path.display());
        }

        Commands::Callouts { args, artboard } => {
            let mut doc = load_document(&args.document).await?;
            let mut store = load_store(args.settings.as_ref()).await?;
            let artboard = resolve_layer(&doc, &artboard)?;
            doc.select(artboard, false);

            let report =
                dispatch_command(&mut doc, &mut store, Command::UpdateCalloutsOnArtboard, &now)?;
            print_report(&report);
            doc.save(args.output_path()).await?;
        }

        Commands::Saved { args, autosave } => {
            let mut doc = load_document(&args.document).await?;
            let store = load_store(args.settings.as_ref()).await?;
            let event = HostEvent::DocumentSaved {
                autosaved: autosave,
            };
            let report = dispatch_event(&mut doc, &store, event, &now)?;
            print_report(&report);
            doc.save(args.output_path()).await?;
        }

        Commands::Resized { args, layer } => {
            let mut doc = load_document(&args.document).await?;
            let store = load_store(args.settings.as_ref()).await?;
            let layer = resolve_layer(&doc, &layer)?;
            let event = HostEvent::LayersResized {
                layers: vec![layer],
            };
            let report = dispatch_event(&mut doc, &store, event, &now)?;
            print_report(&report);
            doc.save(args.output_path()).await?;
        }

        Commands::ShowSettings { settings } => {
            let store = load_store(settings.as_ref()).await?;
            let settings = Settings::from_store(&store)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
