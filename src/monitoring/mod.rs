/*!
 * Monitoring
 * Structured logging and operation tracing
 */

mod tracer;

pub use tracer::{init_tracing, span_operation, OperationSpan};
