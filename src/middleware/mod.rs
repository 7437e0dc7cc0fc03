pub mod request_id;
pub mod response_time;

pub use request_id::{request_id, RequestId, REQUEST_ID_HEADER};
pub use response_time::{response_time, RESPONSE_TIME_HEADER};
