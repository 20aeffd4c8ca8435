// Domain layer: the application contract and the diagnostic body. Nothing here knows
// how applications are located or how the Lambda runtime drives us.

pub mod model;
pub mod ports;
