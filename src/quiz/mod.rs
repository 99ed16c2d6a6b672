pub mod row;
pub mod synthesis;
pub mod table;
pub mod upsert;
