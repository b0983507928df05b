//! Built-in calibration recordings: five glove readings (A1..A4) for each of
//! seven gestures.

use super::GestureId;
use crate::sensor::sample::RawSample;

/// Gesture ids and display names
pub const GESTURE_NAMES: [(GestureId, &str); 7] = [
    (1, "OK"),
    (2, "You"),
    (3, "Thank you"),
    (4, "See you tomorrow"),
    (5, "Good"),
    (6, "Sorry"),
    (7, "Never mind"),
];

/// Recorded samples, `(gesture, [A1, A2, A3, A4])`
pub const TRAINING_SAMPLES: [(GestureId, [i32; 4]); 35] = [
    (1, [331, 303, 479, 959]),
    (1, [332, 310, 480, 960]),
    (1, [352, 328, 444, 979]),
    (1, [355, 333, 447, 979]),
    (1, [351, 326, 438, 978]),
    (2, [636, 865, 336, 973]),
    (2, [346, 855, 330, 927]),
    (2, [652, 893, 336, 976]),
    (2, [647, 889, 338, 974]),
    (2, [670, 902, 338, 975]),
    (3, [635, 835, 593, 975]),
    (3, [632, 834, 593, 975]),
    (3, [628, 830, 592, 975]),
    (3, [625, 831, 593, 976]),
    (3, [635, 835, 591, 975]),
    (4, [314, 272, 324, 346]),
    (4, [311, 271, 327, 346]),
    (4, [310, 269, 326, 345]),
    (4, [311, 268, 324, 345]),
    (4, [312, 269, 325, 346]),
    (5, [502, 822, 585, 346]),
    (5, [501, 819, 582, 345]),
    (5, [500, 820, 584, 346]),
    (5, [499, 817, 584, 347]),
    (5, [496, 820, 583, 345]),
    (6, [312, 793, 566, 969]),
    (6, [311, 781, 567, 970]),
    (6, [310, 791, 565, 971]),
    (6, [312, 785, 564, 971]),
    (6, [312, 783, 562, 972]),
    (7, [324, 339, 418, 975]),
    (7, [326, 339, 423, 975]),
    (7, [327, 338, 417, 975]),
    (7, [326, 342, 414, 977]),
    (7, [338, 338, 415, 977]),
];

/// Built-in samples as `(gesture, sample)` pairs
pub fn builtin_samples() -> Vec<(GestureId, RawSample)> {
    TRAINING_SAMPLES
        .iter()
        .map(|&(gesture, channels)| (gesture, RawSample::new(channels)))
        .collect()
}
