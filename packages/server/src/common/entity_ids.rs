//! Typed ID definitions for all domain entities.
//!
//! Type aliases over `Id<T>` give each entity an incompatible ID type, so
//! the compiler catches mixed-up arguments.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for retailer applications.
pub struct Retailer;

/// Marker type for deals.
pub struct Deal;

/// Marker type for catalog categories.
pub struct Category;

/// Marker type for user profiles (auth provider accounts).
pub struct UserProfile;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for retailer applications.
pub type RetailerId = Id<Retailer>;

/// Typed ID for deals.
pub type DealId = Id<Deal>;

/// Typed ID for catalog categories.
pub type CategoryId = Id<Category>;

/// Typed ID for user profiles.
pub type UserId = Id<UserProfile>;
