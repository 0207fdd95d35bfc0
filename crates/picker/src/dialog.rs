use crate::color::Color;
use crate::error::Result;
use crate::geometry::Size;
use crate::palette::SharedPalette;
use crate::picker::{ColorPicker, PickerOptions};

/// How a modal picker dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Ok,
    Cancel,
}

/// Dialog title, button texts and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogProps {
    pub(crate) title: String,
    pub(crate) ok_text: String,
    pub(crate) cancel_text: String,
    pub(crate) size: Size,
}

impl Default for DialogProps {
    fn default() -> Self {
        Self {
            title: "Color Picker".to_string(),
            ok_text: "Ok".to_string(),
            cancel_text: "Cancel".to_string(),
            size: Size::new(500, 350),
        }
    }
}

impl DialogProps {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the text of the OK button. Default is `Ok`.
    pub fn ok_text(mut self, ok_text: impl Into<String>) -> Self {
        self.ok_text = ok_text.into();
        self
    }

    /// Sets the text of the Cancel button. Default is `Cancel`.
    pub fn cancel_text(mut self, cancel_text: impl Into<String>) -> Self {
        self.cancel_text = cancel_text.into();
        self
    }

    /// Sets the preferred dialog size. Default is 500x350.
    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn ok_label(&self) -> &str {
        &self.ok_text
    }

    pub fn cancel_label(&self) -> &str {
        &self.cancel_text
    }

    pub fn preferred_size(&self) -> Size {
        self.size
    }
}

/// Presents a picker modally and reports how it was closed.
///
/// The host drives the picker (pointer, text, palette clicks) while the dialog is open
/// and returns once the user pressed one of the buttons.
pub trait DialogHost {
    fn run_modal(&mut self, props: &DialogProps, picker: &mut ColorPicker) -> DialogOutcome;
}

/// Show a picker dialog, returns the selected color on Ok and `None` on Cancel.
///
/// A missing `initial` color starts the picker on red.
pub fn show_dialog(
    host: &mut impl DialogHost,
    props: &DialogProps,
    initial: Option<Color>,
    shared: Option<SharedPalette>,
) -> Result<Option<Color>> {
    let options = PickerOptions {
        initial_color: initial.unwrap_or(Color::RED),
        ..Default::default()
    };
    run(host, props, options, shared)
}

/// Show a picker dialog without a palette. The value editor is optional.
pub fn show_simple_dialog(
    host: &mut impl DialogHost,
    title: impl Into<String>,
    initial: Option<Color>,
    show_values: bool,
) -> Result<Option<Color>> {
    let options = PickerOptions {
        initial_color: initial.unwrap_or(Color::RED),
        max_palette_colors: -1,
        show_values,
        show_palette: false,
        ..Default::default()
    };
    run(host, &DialogProps::new(title), options, None)
}

fn run(
    host: &mut impl DialogHost,
    props: &DialogProps,
    options: PickerOptions,
    shared: Option<SharedPalette>,
) -> Result<Option<Color>> {
    let mut picker = ColorPicker::new(options, shared)?;
    let outcome = host.run_modal(props, &mut picker);
    tracing::debug!(title = props.title(), ?outcome, color = %picker.color(), "dialog closed");

    Ok(match outcome {
        DialogOutcome::Ok => Some(picker.color()),
        DialogOutcome::Cancel => None,
    })
}
