pub mod fill;
pub mod traceback;
