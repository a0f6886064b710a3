// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Camera geometry. The eye sits at the origin and looks down -Z at a
// viewport one unit away.
pub const CENTER_OFFSET: f64 = 0.0;
pub const VIEWPORT_DISTANCE: f64 = 1.0;

// Default Phong constants
pub const DEFAULT_AMBIENT: f64 = 0.1;
pub const DEFAULT_DIFFUSE: f64 = 1.0;
pub const DEFAULT_SPECULAR: f64 = 1.0;
pub const DEFAULT_SHININESS: f64 = 20.0;

// Every point light contributes at full intensity.
pub const LIGHT_CONTRIBUTION: f64 = 1.0;

// Maximum value of a PPM color channel
pub const PPM_MAX_VALUE: u8 = 255;

// Diagnostics
pub const INPUT_INVALID: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
