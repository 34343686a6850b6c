mod guards;

pub use guards::{Guard, GuardMiddlewareFactory, GuardMiddlewareService, RoleLookup};
