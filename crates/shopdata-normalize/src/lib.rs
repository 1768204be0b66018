pub mod error;
pub mod extract;
pub mod fields;
pub mod report;
pub mod sink;
pub mod text;

pub use error::NormalizeError;
pub use extract::{extract_records, Extraction, ExtractedRecord, RawInput};
pub use fields::{
    format_timestamp, process_color_options, process_images, process_record, process_records,
    process_specifications, process_storage_options,
};
pub use report::{summarize, SummaryReport};
pub use sink::{read_json_value, read_products, strip_fields, write_csv, write_json, StripOutcome};
pub use text::{extract_hex_color, parse_price, slugify};
