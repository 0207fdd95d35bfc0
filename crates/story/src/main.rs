use color_picker::PickerOptions;
use color_picker_story::{init, load_options, options_schema, run_dialog, run_walkthrough};

fn main() -> anyhow::Result<()> {
    // `cargo run -- schema` or `cargo run -- [options.json]`
    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("schema") {
        println!("{}", options_schema()?);
        return Ok(());
    }

    init()?;

    let options = match arg {
        Some(path) => load_options(path)?,
        None => PickerOptions::default(),
    };

    let report = run_walkthrough(options)?;
    println!("{report}");

    match run_dialog()? {
        Some(color) => println!("dialog: ok, picked {color}"),
        None => println!("dialog: cancelled"),
    }
    Ok(())
}
