pub mod envelope;
pub mod intent;
pub mod query;
pub mod record;
