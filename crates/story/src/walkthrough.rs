use std::cell::Cell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use color_picker::{
    Color, ColorPicker, DialogHost, DialogOutcome, DialogProps, PickerOptions, SharedPalette, Size,
    ValueMode, show_dialog,
};

/// What the scripted session ended with.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkthroughReport {
    pub color: Color,
    pub hue: f32,
    pub notifications: usize,
    pub rejected_keystrokes: usize,
    pub palette: Vec<Color>,
    pub mode: ValueMode,
    pub fields: Vec<String>,
}

impl Display for WalkthroughReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "color: {} (hue {:.3})", self.color, self.hue)?;
        writeln!(f, "notifications: {}", self.notifications)?;
        writeln!(f, "rejected keystrokes: {}", self.rejected_keystrokes)?;
        let palette: Vec<String> = self.palette.iter().map(|color| color.to_hex()).collect();
        writeln!(f, "palette: [{}]", palette.join(", "))?;
        write!(f, "{}: {}", self.mode, self.fields.join(" "))
    }
}

/// Drive a picker through every kind of interaction: a field drag, a hue sweep, typed
/// hex text, palette saves and clicks, and a resize.
pub fn run_walkthrough(options: PickerOptions) -> anyhow::Result<WalkthroughReport> {
    let shared = SharedPalette::default();
    let mut picker = ColorPicker::new(options, Some(shared.clone()))?;

    let notifications = Rc::new(Cell::new(0usize));
    let counter = notifications.clone();
    picker.add_color_listener(move |color| {
        counter.set(counter.get() + 1);
        tracing::info!(%color, "color changed");
    });

    let field = picker.field().size();
    let slider = picker.slider().size();

    picker.field_pointer_down(0, 0);
    for step in 1..=4 {
        picker.field_pointer_move(
            field.width as i32 * step / 8,
            field.height as i32 * step / 8,
        );
    }
    picker.field_pointer_up();
    picker.preview_swatch_clicked();

    let middle = slider.height as i32 / 2;
    picker.slider_pointer_down(0, middle);
    for step in 1..=3 {
        picker.slider_pointer_move(slider.width as i32 * step / 3, middle);
    }
    picker.slider_pointer_up();
    picker.preview_swatch_clicked();

    while picker.values().value_mode() != ValueMode::Hex {
        picker.cycle_value_mode();
    }
    let mut rejected_keystrokes = 0;
    for text in ["#1e9", "#1e90ff", "#1e90ffaa"] {
        if let Err(err) = picker.value_text_changed(0, text) {
            tracing::debug!(%err, "keystroke rejected");
            rejected_keystrokes += 1;
        }
    }
    picker.preview_swatch_clicked();

    picker.click_palette_item(0);
    picker.resize(Size::new(field.width / 2, field.height / 2), slider);
    picker.cycle_value_mode();

    tracing::debug!(shared = shared.len(), "walkthrough finished");
    Ok(WalkthroughReport {
        color: picker.color(),
        hue: picker.hue(),
        notifications: notifications.get(),
        rejected_keystrokes,
        palette: picker.palette_colors(),
        mode: picker.values().value_mode(),
        fields: picker.values().fields().to_vec(),
    })
}

/// A dialog host that types hex colors into the value editor, then closes.
pub struct ScriptedDialog {
    typed: Vec<String>,
    outcome: DialogOutcome,
}

impl ScriptedDialog {
    pub fn new(outcome: DialogOutcome) -> Self {
        Self {
            typed: Vec::new(),
            outcome,
        }
    }

    pub fn typing(mut self, text: impl Into<String>) -> Self {
        self.typed.push(text.into());
        self
    }
}

impl DialogHost for ScriptedDialog {
    fn run_modal(&mut self, props: &DialogProps, picker: &mut ColorPicker) -> DialogOutcome {
        tracing::info!(
            title = props.title(),
            ok = props.ok_label(),
            cancel = props.cancel_label(),
            size = ?props.preferred_size(),
            "dialog opened"
        );

        while picker.values().value_mode() != ValueMode::Hex {
            picker.cycle_value_mode();
        }
        for text in &self.typed {
            if let Err(err) = picker.value_text_changed(0, text) {
                tracing::debug!(%err, "keystroke rejected");
            }
        }
        self.outcome
    }
}

pub fn run_dialog() -> anyhow::Result<Option<Color>> {
    let mut host = ScriptedDialog::new(DialogOutcome::Ok).typing("#ff8800");
    let color = show_dialog(&mut host, &DialogProps::new("Pick a color"), None, None)?;
    Ok(color)
}
