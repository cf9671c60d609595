mod app;
mod hierarchy;
mod layout;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::{ViewOptions, WordTreeApp};
use crate::hierarchy::DatasetSource;

const DEFAULT_LOG_FILTER: &str = "word_tree=info";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with a node object or an array of nodes; the built-in sample is used when omitted.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Margin in pixels kept around the tree when fitting it to the window.
    #[arg(long, value_name = "PX", default_value_t = 120.0)]
    fit_padding: f32,

    /// Start with every node at this depth or deeper collapsed.
    #[arg(long, value_name = "N")]
    collapse_depth: Option<usize>,

    /// Tracing filter directive; overrides RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());

    let source = args
        .data
        .map(DatasetSource::File)
        .unwrap_or(DatasetSource::Builtin);
    let view_options = ViewOptions {
        fit_padding: args.fit_padding.max(0.0),
        collapse_depth: args.collapse_depth,
    };
    tracing::info!(source = %source.label(), ?view_options, "starting word-tree");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "word-tree",
        options,
        Box::new(move |cc| Ok(Box::new(WordTreeApp::new(cc, source, view_options)))),
    )
}
