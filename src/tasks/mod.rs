pub mod schedule_refresher;
