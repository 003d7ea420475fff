//! Session-wide constants and configuration defaults.

/// Detector id reserved for detector-independent ("general") quantities.
pub const GENERAL_DETECTOR_ID: u32 = 1;

/// Offset added to the numeric suffix of a per-detector record name.
pub const DEFAULT_DETECTOR_BASE: u32 = 1100;

/// Token that marks a record as per-detector (`zip1`, `ZIP12`, ...).
pub const DEFAULT_DETECTOR_TOKEN: &str = "zip";

/// First and last detector id of the default valid set (inclusive).
pub const DEFAULT_FIRST_DETECTOR: u32 = 1101;
pub const DEFAULT_LAST_DETECTOR: u32 = 1115;

/// Sub-collections of data files that hold calibration/configuration blobs, not fields.
pub const DEFAULT_DATA_SKIP_COLLECTIONS: &[&str] = &["calibInfoDir", "infoDir", "detectorConfigDir"];

/// Sub-collections of filter files that hold no queryable fields.
pub const DEFAULT_FILTER_SKIP_COLLECTIONS: &[&str] = &["cutInfoDir"];

/// Fields copied verbatim into several sub-collections of the same file.
pub const DEFAULT_DOUBLE_FIELDS: &[&str] = &["SeriesNumber", "EventNumber", "DetType", "Empty"];

/// Substring naming the sub-collection or record whose copy of a double field is kept.
pub const DEFAULT_CANONICAL_MARKER: &str = "calib";

/// Magic bytes at the start of a binary layout catalog.
pub const CATALOG_MAGIC: [u8; 4] = *b"FXC1";

/// Current binary layout catalog version.
pub const CATALOG_VERSION: u16 = 1;

/// Upper bound on the size of a layout file we are willing to load.
pub const MAX_LAYOUT_BYTES: u64 = 64 * 1024 * 1024;

/// Number of leading bytes handed to readers for format probing.
pub const MAGIC_PROBE_BYTES: usize = 8;
