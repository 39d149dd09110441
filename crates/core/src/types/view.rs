//! Navigation targets.

use serde::{Deserialize, Serialize};

/// The view a caller should present after a store operation.
///
/// Rendering is not modelled; operations only report where the session
/// should go next (e.g. to `Auth` when a signed-in user is required).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Home,
    Products,
    ProductDetail,
    Orders,
    Profile,
    Admin,
    Auth,
}
