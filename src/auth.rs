//! Auth-domain identifiers, credentials, token records, and out-of-band authorization helpers.

pub mod callback;
pub mod credentials;
pub mod id;
pub mod login;
pub mod source;
pub mod token;

pub use callback::*;
pub use credentials::*;
pub use id::*;
pub use login::*;
pub use source::*;
pub use token::{record::*, secret::*};
