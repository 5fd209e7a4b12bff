// Review module
// Author: kelexine (https://github.com/kelexine)

mod service;

pub use service::{ReviewService, ServiceStats};
