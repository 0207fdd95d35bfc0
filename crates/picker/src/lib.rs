mod color;
mod dialog;
mod error;
mod field;
mod geometry;
mod marker;
mod palette;
mod picker;
mod pointer;
mod raster;
mod slider;
mod values;

pub use color::{
    Color, Hsb, HsvInts, color_from_hsb, hsb_to_hsv_ints, hsv_ints_to_hsb, hue_of, parse_hex,
    rgb_to_hsb, to_hex_string,
};
pub use dialog::{DialogHost, DialogOutcome, DialogProps, show_dialog, show_simple_dialog};
pub use error::{PickerError, Result};
pub use field::{FieldController, FieldEvent};
pub use geometry::{MarkerBounds, Size};
pub use marker::SelectionMarker;
pub use palette::{OverflowPolicy, PaletteCapacity, PaletteClick, PaletteStore, SharedPalette};
pub use picker::{ChangeOrigin, ColorPicker, Panels, PickerOptions, PreviewSwatch};
pub use pointer::{DEFAULT_REGEN_INTERVAL, PointerState, RegenThrottle};
pub use raster::{
    GradientSteps, RasterGrid, field_color_at, gradient_steps, render_field, render_hue_ramp,
    step_value,
};
pub use slider::{SliderChange, SliderController};
pub use values::{FieldTexts, UpdateSource, ValueChange, ValueEditorController, ValueMode};
