//! Component driver surface

pub mod driver;

pub use driver::{Backend, ComponentId, Publisher, Subscriber};
