mod walkthrough;

use std::path::Path;

use anyhow::Context as _;
use color_picker::PickerOptions;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

pub use walkthrough::{ScriptedDialog, WalkthroughReport, run_dialog, run_walkthrough};

/// Install the log subscriber. `RUST_LOG` is honored, picker events are traced.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("color_picker=trace".parse()?),
        )
        .try_init()?;
    Ok(())
}

/// Read picker options from a JSON file. Missing fields take their defaults.
pub fn load_options(path: impl AsRef<Path>) -> anyhow::Result<PickerOptions> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options from {}", path.display()))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse options in {}", path.display()))?;
    Ok(options)
}

/// The JSON schema of [`PickerOptions`], pretty printed.
pub fn options_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(PickerOptions);
    serde_json::to_string_pretty(&schema).context("failed to serialize options schema")
}
