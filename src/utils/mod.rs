pub mod filename;
pub mod ip;

pub use filename::{barcode_filename, qr_filename};
pub use ip::{client_ip, debug_headers};
