pub mod csv;
pub mod excel;

pub use self::csv::CsvGenerator;
pub use self::excel::ExcelGenerator;

pub const REPORT_HEADERS: [&str; 10] = [
    "type",
    "number",
    "date",
    "client",
    "payment_method",
    "status",
    "subtotal",
    "discount",
    "tax",
    "total",
];
