//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types used by the presenters and drivers
//! - `wire.rs`: Raw serde structs matching backend responses
//! - `convert.rs`: `From` conversions from wire to domain
//! - `state.rs`: State containers with update methods (where the UI keeps state)
//! - `client.rs`: Sub-client with HTTP methods

pub mod quote;
pub mod search;
