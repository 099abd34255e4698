//! CLI walkthrough entry point.
//!
//! # Responsibility
//! - Wire `markdesk_core` against the in-memory transport.
//! - Replay a short create/edit/save session and print what the views see.
//!
//! Usage: `markdesk_cli [--config <PATH>]`

use clap::Parser;
use markdesk_core::{
    core_version, AlwaysConfirm, AppConfig, AttrKey, Document, DocumentAttrs, DocumentRecord,
    EditorPresenter, ListingView, MemoryTransport, NavigationController, PreviewPipeline,
    UpdateMode,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Walkthrough command line arguments.
#[derive(Parser, Debug)]
#[command(name = "markdesk_cli")]
#[command(about = "Replays a markdesk editing session against an in-memory store")]
#[command(version)]
struct Args {
    /// JSON config file (log level, log directory, prompts)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Prints editor updates to stdout.
struct ConsoleEditor {
    preview: PreviewPipeline,
}

impl EditorPresenter for ConsoleEditor {
    fn show(&mut self, document: Option<&Document>) {
        match document {
            Some(doc) => println!(
                "editor: {} ({})",
                display_name(doc),
                if doc.is_new() { "new" } else { "saved" }
            ),
            None => println!("editor: disabled"),
        }
    }

    fn refresh(&mut self, document: &Document) {
        println!("preview: {}", self.preview.render(document.get(AttrKey::Content)));
    }

    fn show_error(&mut self, message: &str) {
        println!("error: {message}");
    }
}

fn display_name(document: &Document) -> &str {
    if document.name().is_empty() {
        "<untitled>"
    } else {
        document.name()
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let transport = MemoryTransport::with_records(vec![
        DocumentRecord::new(2, DocumentAttrs::new("Zebra", "# Stripes", "")),
        DocumentRecord::new(1, DocumentAttrs::new("Apple", "*crisp*", "")),
    ]);
    let listing = ListingView::new();
    let editor = ConsoleEditor {
        preview: PreviewPipeline::default(),
    };

    let mut controller =
        NavigationController::new(transport, Box::new(AlwaysConfirm), Box::new(editor))
            .with_prompts(config.prompts);
    controller.subscribe(Box::new(listing.clone()));

    controller.start("/").await?;
    println!("listing: {:?}", listing.names());

    controller.navigate("/documents/new");
    controller.update_field(AttrKey::Name, "Mango", UpdateMode::Quiet)?;
    controller.update_field(AttrKey::Content, "<b>ripe</b> & sweet", UpdateMode::Notify)?;
    let outcome = controller.save().await?;
    println!("saved: id={} route={}", outcome.id, outcome.route);
    println!("listing: {:?}", listing.names());

    controller.update_field(AttrKey::Content, "unsaved", UpdateMode::Quiet)?;
    controller.navigate("/documents/1");
    let reverted = controller
        .registry()
        .get(&outcome.id)
        .map(|doc| doc.get(AttrKey::Content).to_string())
        .unwrap_or_default();
    println!("after leaving: {reverted}");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    println!("markdesk_core version={}", core_version());

    let config = match args.config {
        Some(path) => AppConfig::load(&path),
        None => Ok(AppConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = config.init_logging() {
        eprintln!("logging: {err}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn config_flag_is_optional() {
        let args = Args::try_parse_from(["markdesk_cli"]).expect("no arguments");
        assert!(args.config.is_none());

        let args = Args::try_parse_from(["markdesk_cli", "--config", "/etc/markdesk.json"])
            .expect("config flag");
        assert_eq!(args.config, Some(PathBuf::from("/etc/markdesk.json")));
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(Args::try_parse_from(["markdesk_cli", "--bogus"]).is_err());
        assert!(Args::try_parse_from(["markdesk_cli", "extra.json"]).is_err());
    }
}
