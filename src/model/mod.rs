pub mod field;
pub mod leave_record;

pub use field::{ColumnLabels, LeaveField};
pub use leave_record::{LeaveRecord, NewLeaveRecord};
