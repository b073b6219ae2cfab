pub mod payment_gateway_stripe;
pub mod signature;
mod wire;
