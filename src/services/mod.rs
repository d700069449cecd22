pub mod csv_import_service;
pub mod price_service;
