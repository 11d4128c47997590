mod common;
mod idempotency;
mod pricing;
mod window;
