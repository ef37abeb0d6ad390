pub mod form;
pub mod logs;
pub mod report;
pub mod snapshots;
pub mod status;
