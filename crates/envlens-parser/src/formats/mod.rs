mod csv_table;
mod json_array;

pub use csv_table::CsvTableDecoder;
pub use json_array::JsonArrayDecoder;
