// LilyPond document template
// Fixed drum staff boilerplate wrapped around the rendered note body

use serde::{Deserialize, Serialize};
use std::fmt;

/// LilyPond version written when none is configured
pub const DEFAULT_LILYPOND_VERSION: &str = "2.18.2";

/// Fixed numeric time signature printed on the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::FOUR_FOUR
    }
}

impl TimeSignature {
    pub const FOUR_FOUR: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    /// Both terms non-zero and the denominator a power of two
    pub fn is_valid(&self) -> bool {
        self.numerator > 0 && self.denominator.is_power_of_two()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Document settings that are not part of the note body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub version: String,
    pub time_signature: TimeSignature,
}

impl Default for DocumentTemplate {
    fn default() -> Self {
        DocumentTemplate {
            version: DEFAULT_LILYPOND_VERSION.to_string(),
            time_signature: TimeSignature::default(),
        }
    }
}

impl DocumentTemplate {
    /// Wrap a rendered body in the drum staff document
    pub fn wrap(&self, body: &str) -> String {
        let mut ly = String::new();
        ly.push_str(&format!("\\version \"{}\"\n", self.version));
        ly.push('\n');
        ly.push_str("\\new DrumStaff {\n");
        ly.push_str("  \\drummode {\n");
        ly.push_str("    \\numericTimeSignature\n");
        ly.push_str(&format!("    \\time {}\n", self.time_signature));
        ly.push_str("    \\override Stem #'direction = #up\n");
        ly.push_str("    ");
        ly.push_str(body);
        ly.push('\n');
        ly.push_str("  }\n");
        ly.push_str("}\n");
        ly
    }
}
