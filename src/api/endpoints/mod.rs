//! Route handlers, one module per resource.

pub mod health;
pub mod hospital;
pub mod live;
pub mod shelter;
pub mod surplus;
