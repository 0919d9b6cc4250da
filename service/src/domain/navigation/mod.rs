//! Navigation state of the site and of the admin console.
//!
//! Both routers are plain values with a pure transition function; the root
//! application decides what to fetch once a transition happened.

pub mod address;
pub mod admin;
pub mod public;

pub use address::{ADMIN_PATH, AddressSync, SITE_PATH, StartLocation};
pub use admin::{AdminEvent, AdminRoute, AdminSection, EditorTarget};
pub use public::{Page, PublicEvent, PublicRoute};
