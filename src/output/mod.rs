pub mod export;
pub mod formatter;

pub use export::{default_export_path, export_to_path, write_csv};
pub use formatter::{
    format_decimal, format_mark, format_plain, format_status, format_summary, format_table,
    should_use_colors,
};
