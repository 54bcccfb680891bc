//! Auth-domain identifiers, scope sets, client credentials, and token models.

pub mod credentials;
pub mod id;
pub mod scope;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use id::*;
pub use scope::*;
pub use secret::*;
pub use token::{access::*, request::*, response::*};
