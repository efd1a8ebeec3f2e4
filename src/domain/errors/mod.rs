mod invariant_errors;
mod storage_errors;

pub use invariant_errors::*;
pub use storage_errors::*;
