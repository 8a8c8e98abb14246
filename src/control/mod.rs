pub(crate) mod dispatch;
pub(crate) mod message;
