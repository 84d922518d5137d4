// Process-wide constants

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Tag list limits: 10 tags, 19 visible characters each
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_CHARS: usize = 19;

// Suffix appended to the file renamed aside by rotation
pub const ROTATED_SUFFIX: &str = ".old";

// Field separator in rendered lines
pub const FIELD_SEP: &str = " | ";
