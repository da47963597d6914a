//! Route table, access guard, and the history stack the guard protects.
mod guard;
mod navigator;
mod routes;

pub use self::{
    guard::{evaluate, Decision},
    navigator::{NavigationError, Navigator},
    routes::{RouteDescriptor, RouteTable},
};
pub use crate::model::RouteName;
