//! SOAP 1.1 codec for the marketplace services.

pub mod envelope;
pub mod response;
pub mod xml;

pub use envelope::*;
pub use response::*;
pub use xml::*;
