//! Verification of bearer tokens issued by the external identity provider.
//! The service never issues credentials itself; it only checks signatures,
//! issuer and audience, and maps the token identity onto a user row.

mod claims;
pub mod extractors;
pub mod jwt;

pub use claims::Claims;
pub use extractors::{AdminUser, CurrentUser};
