pub mod input;
pub mod object_or_raw;
pub mod operation_params;

pub use input::{is_read_only_method, InputError, RawParams};
pub use object_or_raw::{JsonObject, ObjectOrRaw};
pub use operation_params::OperationParams;
pub use sonic_rs;
