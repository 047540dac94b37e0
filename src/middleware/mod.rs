pub mod gate;

pub use gate::{
    AUTH_FAILED_INTERVAL, GateOutcome, GateRequest, MAX_AUTH_ATTEMPTS, SwaggerState, evaluate,
    swagger_gate,
};
